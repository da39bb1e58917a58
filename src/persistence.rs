//! File-based persistence for [`MemoryLedger`] as a single JSON document.
//!
//! The snapshot holds every table as a list sorted by id, plus the next ids
//! to assign, so a reloaded ledger keeps numbering where it left off.
//!
//! # Usage
//!
//! ```ignore
//! use bookline::MemoryLedger;
//! use std::path::Path;
//!
//! ledger.save(Path::new("book.json")).unwrap();
//! let ledger = MemoryLedger::load(Path::new("book.json")).unwrap();
//! ```

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::commission::{CommissionConfig, CommissionRecord};
use crate::event::Event;
use crate::ledger::MemoryLedger;
use crate::quote::Quote;
use crate::types::RunnerId;
use crate::wager::Wager;

/// Serialized form of a [`MemoryLedger`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub events: Vec<Event>,
    pub wagers: Vec<Wager>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub runners: Vec<RunnerEntry>,
    #[serde(default)]
    pub commissions: Vec<CommissionRecord>,
    pub next_event_id: u64,
    pub next_wager_id: u64,
    pub next_quote_id: u64,
}

/// A runner and its commission settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerEntry {
    pub runner_id: RunnerId,
    #[serde(flatten)]
    pub config: CommissionConfig,
}

impl From<&MemoryLedger> for LedgerSnapshot {
    fn from(ledger: &MemoryLedger) -> Self {
        let mut wagers: Vec<_> = ledger.wagers.values().cloned().collect();
        wagers.sort_by_key(|w| w.id);
        Self {
            events: ledger.events(),
            wagers,
            quotes: ledger.quotes.clone(),
            runners: ledger
                .runners()
                .into_iter()
                .map(|(runner_id, config)| RunnerEntry { runner_id, config })
                .collect(),
            commissions: ledger.commissions(),
            next_event_id: ledger.next_event_id,
            next_wager_id: ledger.next_wager_id,
            next_quote_id: ledger.next_quote_id,
        }
    }
}

impl From<LedgerSnapshot> for MemoryLedger {
    fn from(snapshot: LedgerSnapshot) -> Self {
        let mut ledger = MemoryLedger::new();
        ledger.events = snapshot.events.into_iter().map(|e| (e.id, e)).collect();
        ledger.wagers = snapshot.wagers.into_iter().map(|w| (w.id, w)).collect();
        ledger.quotes = snapshot.quotes;
        ledger.runners = snapshot
            .runners
            .into_iter()
            .map(|r| (r.runner_id, r.config))
            .collect();
        ledger.commissions = snapshot
            .commissions
            .into_iter()
            .map(|c| (c.wager_id, c))
            .collect();
        // Never hand out an id already present in the tables.
        let max_event = ledger.events.keys().map(|id| id.0).max().unwrap_or(0);
        let max_wager = ledger.wagers.keys().map(|id| id.0).max().unwrap_or(0);
        let max_quote = ledger.quotes.iter().map(|q| q.id.0).max().unwrap_or(0);
        ledger.next_event_id = snapshot.next_event_id.max(max_event + 1);
        ledger.next_wager_id = snapshot.next_wager_id.max(max_wager + 1);
        ledger.next_quote_id = snapshot.next_quote_id.max(max_quote + 1);
        ledger
    }
}

/// Write a snapshot as pretty-printed JSON.
pub fn save_snapshot(snapshot: &LedgerSnapshot, path: &Path) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot).map_err(io::Error::other)?;
    writeln!(writer)?;
    writer.flush()
}

/// Read a snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: &Path) -> io::Result<LedgerSnapshot> {
    let file = std::fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{}: {e}", path.display())))
}

impl MemoryLedger {
    /// Save the ledger to a JSON file.
    ///
    /// Requires the `persistence` feature.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        save_snapshot(&LedgerSnapshot::from(self), path)
    }

    /// Load a ledger from a JSON file written by [`MemoryLedger::save`].
    ///
    /// Requires the `persistence` feature.
    pub fn load(path: &Path) -> io::Result<Self> {
        load_snapshot(path).map(MemoryLedger::from)
    }

    /// Load from `path` if it exists, otherwise start empty.
    pub fn load_or_default(path: &Path) -> io::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::CommissionRate;
    use crate::grader::settle_event;
    use crate::intake::{create_event, record_score};
    use crate::ledger::Ledger;
    use crate::market::{MarketType, PickSide};
    use crate::odds::{Line, Odds};
    use crate::types::{EventId, WagerId};
    use std::path::PathBuf;

    fn test_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bookline_test_{}_{}.json", name, std::process::id()))
    }

    fn populated() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        let event = create_event(&mut ledger, "Lions", "Bears").unwrap();
        ledger
            .set_commission_config(RunnerId(1), CommissionConfig::net(CommissionRate(10_00)))
            .unwrap();
        let spread = Wager::new(
            WagerId(0),
            event,
            MarketType::Spread,
            PickSide::Home,
            Odds(1_9000),
            100_00,
        )
        .with_line(Line(-2_25))
        .with_asian(Line(-2_50), Odds(1_9500))
        .with_runner(RunnerId(1));
        ledger.insert_wager(spread).unwrap();
        ledger
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = test_path("round_trip");
        let mut ledger = populated();
        record_score(&mut ledger, EventId(1), 3, 1, true).unwrap();
        settle_event(&mut ledger, EventId(1), 42).unwrap();

        ledger.save(&path).unwrap();
        let loaded = MemoryLedger::load(&path).unwrap();

        assert_eq!(LedgerSnapshot::from(&loaded), LedgerSnapshot::from(&ledger));
        assert_eq!(loaded.wager(WagerId(1)), ledger.wager(WagerId(1)));
        assert_eq!(loaded.commission(WagerId(1)), ledger.commission(WagerId(1)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn loaded_ledger_continues_numbering() {
        let path = test_path("numbering");
        populated().save(&path).unwrap();
        let mut loaded = MemoryLedger::load(&path).unwrap();
        let id = create_event(&mut loaded, "Hawks", "Owls").unwrap();
        assert_eq!(id, EventId(2));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_nonexistent_file() {
        assert!(MemoryLedger::load(Path::new("nonexistent_ledger.json")).is_err());
        let empty = MemoryLedger::load_or_default(Path::new("nonexistent_ledger.json")).unwrap();
        assert!(empty.events().is_empty());
    }

    #[test]
    fn malformed_file_is_invalid_data() {
        let path = test_path("malformed");
        std::fs::write(&path, "{ not json").unwrap();
        let err = MemoryLedger::load(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let _ = std::fs::remove_file(&path);
    }
}
