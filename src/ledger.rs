//! The ledger seam: typed queries and writes the engine needs from storage,
//! plus an in-memory implementation.
//!
//! The engine holds no locks. Callers serialize settlement runs per event.
//!
//! ```
//! use bookline::{Event, EventId, Ledger, MemoryLedger};
//!
//! let ledger = MemoryLedger::builder()
//!     .with_event(Event::new(EventId(1), "Lions", "Bears"))
//!     .build();
//! assert!(ledger.event(EventId(1)).is_some());
//! assert!(ledger.open_wagers(EventId(1)).is_empty());
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use crate::commission::{CommissionConfig, CommissionRecord};
use crate::error::LedgerError;
use crate::event::{Event, EventOutcome};
use crate::quote::{Quote, QuoteKey};
use crate::types::{EventId, QuoteId, RunnerId, WagerId};
use crate::wager::{Settlement, Wager, WagerStatus};

/// Storage the settlement engine reads from and writes back to.
///
/// Inserts assign identifiers: the `id` field of the record passed in is
/// ignored and the assigned id is returned.
pub trait Ledger {
    fn event(&self, id: EventId) -> Option<Event>;

    fn wager(&self, id: WagerId) -> Option<Wager>;

    /// Open wagers on an event, in ascending id order.
    fn open_wagers(&self, event: EventId) -> Vec<Wager>;

    /// All wagers on an event, in ascending id order.
    fn event_wagers(&self, event: EventId) -> Vec<Wager>;

    fn commission_config(&self, runner: RunnerId) -> Option<CommissionConfig>;

    fn has_commission(&self, wager: WagerId) -> bool;

    /// Most recently inserted quote for the selection.
    fn latest_quote(&self, key: &QuoteKey) -> Option<Quote>;

    fn insert_event(&mut self, event: Event) -> Result<EventId, LedgerError>;

    fn record_outcome(&mut self, event: EventId, outcome: EventOutcome) -> Result<(), LedgerError>;

    fn insert_quote(&mut self, quote: Quote) -> Result<QuoteId, LedgerError>;

    fn insert_wager(&mut self, wager: Wager) -> Result<WagerId, LedgerError>;

    /// Move an open wager to settled. Fails with `AlreadySettled` if it is not open.
    fn record_settlement(&mut self, wager: WagerId, settlement: Settlement)
        -> Result<(), LedgerError>;

    /// Fails with `DuplicateCommission` if one exists for the wager.
    fn insert_commission(&mut self, record: CommissionRecord) -> Result<(), LedgerError>;

    fn set_commission_config(
        &mut self,
        runner: RunnerId,
        config: CommissionConfig,
    ) -> Result<(), LedgerError>;
}

/// Builder for [`MemoryLedger`].
#[derive(Default)]
pub struct MemoryLedgerBuilder {
    events: Vec<Event>,
    wagers: Vec<Wager>,
    runners: Vec<(RunnerId, CommissionConfig)>,
    commissions: Vec<CommissionRecord>,
    failing_writes: Vec<WagerId>,
    failing_commissions: Vec<WagerId>,
}

impl MemoryLedgerBuilder {
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Add a wager, keeping its id.
    pub fn with_wager(mut self, wager: Wager) -> Self {
        self.wagers.push(wager);
        self
    }

    pub fn with_runner(mut self, runner: RunnerId, config: CommissionConfig) -> Self {
        self.runners.push((runner, config));
        self
    }

    pub fn with_commission(mut self, record: CommissionRecord) -> Self {
        self.commissions.push(record);
        self
    }

    /// Make settlement writes for `wager` fail, to exercise partial batches.
    pub fn failing_write(mut self, wager: WagerId) -> Self {
        self.failing_writes.push(wager);
        self
    }

    /// Make the next commission insert for `wager` fail; later inserts succeed.
    pub fn failing_commission_once(mut self, wager: WagerId) -> Self {
        self.failing_commissions.push(wager);
        self
    }

    pub fn build(self) -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        for event in self.events {
            ledger.next_event_id = ledger.next_event_id.max(event.id.0 + 1);
            ledger.events.insert(event.id, event);
        }
        for wager in self.wagers {
            ledger.next_wager_id = ledger.next_wager_id.max(wager.id.0 + 1);
            ledger.wagers.insert(wager.id, wager);
        }
        ledger.runners.extend(self.runners);
        for record in self.commissions {
            ledger.commissions.insert(record.wager_id, record);
        }
        ledger.failing_writes.extend(self.failing_writes);
        ledger.failing_commissions.extend(self.failing_commissions);
        ledger
    }
}

/// In-memory ledger backed by hash maps.
#[derive(Clone, Debug)]
pub struct MemoryLedger {
    pub(crate) events: FxHashMap<EventId, Event>,
    pub(crate) wagers: FxHashMap<WagerId, Wager>,
    pub(crate) quotes: Vec<Quote>,
    pub(crate) runners: FxHashMap<RunnerId, CommissionConfig>,
    pub(crate) commissions: FxHashMap<WagerId, CommissionRecord>,
    pub(crate) next_event_id: u64,
    pub(crate) next_wager_id: u64,
    pub(crate) next_quote_id: u64,
    failing_writes: FxHashSet<WagerId>,
    failing_commissions: FxHashSet<WagerId>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            events: FxHashMap::default(),
            wagers: FxHashMap::default(),
            quotes: Vec::new(),
            runners: FxHashMap::default(),
            commissions: FxHashMap::default(),
            next_event_id: 1,
            next_wager_id: 1,
            next_quote_id: 1,
            failing_writes: FxHashSet::default(),
            failing_commissions: FxHashSet::default(),
        }
    }

    pub fn builder() -> MemoryLedgerBuilder {
        MemoryLedgerBuilder::default()
    }

    /// Commission records, in wager id order.
    pub fn commissions(&self) -> Vec<CommissionRecord> {
        let mut records: Vec<_> = self.commissions.values().copied().collect();
        records.sort_by_key(|r| r.wager_id);
        records
    }

    pub fn commission(&self, wager: WagerId) -> Option<CommissionRecord> {
        self.commissions.get(&wager).copied()
    }

    /// Events, in id order.
    pub fn events(&self) -> Vec<Event> {
        let mut events: Vec<_> = self.events.values().cloned().collect();
        events.sort_by_key(|e| e.id);
        events
    }

    /// Runner commission settings, in runner id order.
    pub fn runners(&self) -> Vec<(RunnerId, CommissionConfig)> {
        let mut runners: Vec<_> = self.runners.iter().map(|(id, c)| (*id, *c)).collect();
        runners.sort_by_key(|(id, _)| *id);
        runners
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    fn collect_wagers(&self, event: EventId, open_only: bool) -> Vec<Wager> {
        let mut wagers: Vec<_> = self
            .wagers
            .values()
            .filter(|w| w.event_id == event && (!open_only || w.is_open()))
            .cloned()
            .collect();
        wagers.sort_by_key(|w| w.id);
        wagers
    }
}

impl Ledger for MemoryLedger {
    fn event(&self, id: EventId) -> Option<Event> {
        self.events.get(&id).cloned()
    }

    fn wager(&self, id: WagerId) -> Option<Wager> {
        self.wagers.get(&id).cloned()
    }

    fn open_wagers(&self, event: EventId) -> Vec<Wager> {
        self.collect_wagers(event, true)
    }

    fn event_wagers(&self, event: EventId) -> Vec<Wager> {
        self.collect_wagers(event, false)
    }

    fn commission_config(&self, runner: RunnerId) -> Option<CommissionConfig> {
        self.runners.get(&runner).copied()
    }

    fn has_commission(&self, wager: WagerId) -> bool {
        self.commissions.contains_key(&wager)
    }

    fn latest_quote(&self, key: &QuoteKey) -> Option<Quote> {
        self.quotes.iter().rev().find(|q| key.matches(q)).cloned()
    }

    fn insert_event(&mut self, mut event: Event) -> Result<EventId, LedgerError> {
        event.id = EventId(self.next_event_id);
        self.next_event_id += 1;
        let id = event.id;
        self.events.insert(id, event);
        Ok(id)
    }

    fn record_outcome(&mut self, event: EventId, outcome: EventOutcome) -> Result<(), LedgerError> {
        let entry = self
            .events
            .get_mut(&event)
            .ok_or(LedgerError::UnknownEvent(event))?;
        entry.outcome = outcome;
        Ok(())
    }

    fn insert_quote(&mut self, mut quote: Quote) -> Result<QuoteId, LedgerError> {
        quote.id = QuoteId(self.next_quote_id);
        self.next_quote_id += 1;
        let id = quote.id;
        self.quotes.push(quote);
        Ok(id)
    }

    fn insert_wager(&mut self, mut wager: Wager) -> Result<WagerId, LedgerError> {
        if !self.events.contains_key(&wager.event_id) {
            return Err(LedgerError::UnknownEvent(wager.event_id));
        }
        wager.id = WagerId(self.next_wager_id);
        self.next_wager_id += 1;
        let id = wager.id;
        self.wagers.insert(id, wager);
        Ok(id)
    }

    fn record_settlement(
        &mut self,
        wager: WagerId,
        settlement: Settlement,
    ) -> Result<(), LedgerError> {
        if self.failing_writes.contains(&wager) {
            return Err(LedgerError::Write(format!("injected failure for {wager}")));
        }
        let entry = self
            .wagers
            .get_mut(&wager)
            .ok_or(LedgerError::UnknownWager(wager))?;
        if !entry.is_open() {
            return Err(LedgerError::AlreadySettled(wager));
        }
        entry.status = WagerStatus::Settled(settlement);
        Ok(())
    }

    fn insert_commission(&mut self, record: CommissionRecord) -> Result<(), LedgerError> {
        if self.failing_commissions.remove(&record.wager_id) {
            return Err(LedgerError::Write(format!(
                "injected failure for commission on {}",
                record.wager_id
            )));
        }
        if self.commissions.contains_key(&record.wager_id) {
            return Err(LedgerError::DuplicateCommission(record.wager_id));
        }
        self.commissions.insert(record.wager_id, record);
        Ok(())
    }

    fn set_commission_config(
        &mut self,
        runner: RunnerId,
        config: CommissionConfig,
    ) -> Result<(), LedgerError> {
        self.runners.insert(runner, config);
        Ok(())
    }
}
