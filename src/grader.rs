//! Bet grader: settles every open wager on a finalized event.
//!
//! A run is sequential and not transactional. A wager with malformed data is
//! recorded as failed and the run moves on; a ledger write failure halts the
//! run, leaving wagers written before it settled. Re-running is idempotent:
//! settled wagers are skipped and existing commission records are kept.

use std::fmt;

use log::{debug, info, warn};

use crate::commission::CommissionRecord;
use crate::comparator::{Score, compare};
use crate::error::{LedgerError, SettleError};
use crate::ledger::Ledger;
use crate::settlement::{LegResult, settle_leg};
use crate::types::{Cents, EventId, RunnerId, Timestamp, WagerId, format_cents};
use crate::wager::{Settlement, Wager, WagerResult, WagerStatus};

/// Grade a single wager against a final score.
///
/// Split wagers are graded leg by leg and the legs summed; the result label
/// comes from the summed profit.
///
/// ```
/// use bookline::{grade, EventId, MarketType, Odds, PickSide, Score, Wager, WagerId, WagerResult};
///
/// let wager = Wager::new(WagerId(1), EventId(1), MarketType::Moneyline, PickSide::Home, Odds(1_9100), 100_00);
/// let s = grade(&wager, Score::new(2, 1), 0).unwrap();
/// assert_eq!((s.payout_cents, s.profit_cents, s.result), (191_00, 91_00, WagerResult::Win));
/// ```
pub fn grade(wager: &Wager, score: Score, settled_at: Timestamp) -> Result<Settlement, SettleError> {
    let legs = wager.legs()?;
    let mut total = LegResult::default();
    for leg in legs.iter() {
        let cmp = compare(wager.market, wager.side, score, leg.line)?;
        total = total.combine(settle_leg(leg.stake_cents, leg.odds, cmp));
    }
    Ok(Settlement {
        result: WagerResult::from_profit(total.profit_cents),
        payout_cents: total.payout_cents,
        profit_cents: total.profit_cents,
        settled_at,
    })
}

/// A wager graded in a run, with the commission created for it (if any).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradedWager {
    pub wager_id: WagerId,
    pub runner_id: RunnerId,
    pub stake_cents: Cents,
    pub settlement: Settlement,
    pub commission: Option<CommissionRecord>,
}

/// A wager that could not be graded because of its own data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WagerFailure {
    pub wager_id: WagerId,
    pub error: SettleError,
}

impl fmt::Display for WagerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wager {}: {}", self.wager_id, self.error)
    }
}

/// Outcome of one settlement run over an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementRun {
    pub event_id: EventId,
    pub score: Score,
    pub graded: Vec<GradedWager>,
    /// Wagers already settled before this run.
    pub skipped: Vec<WagerId>,
    pub failed: Vec<WagerFailure>,
    /// Commissions missing from wagers settled by an earlier, interrupted run.
    pub recovered: Vec<CommissionRecord>,
}

fn saturating_sum(amounts: impl Iterator<Item = Cents>) -> Cents {
    amounts.fold(0, Cents::saturating_add)
}

impl SettlementRun {
    fn new(event_id: EventId, score: Score) -> Self {
        Self {
            event_id,
            score,
            graded: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            recovered: Vec::new(),
        }
    }

    /// True when the run graded, failed and recovered nothing.
    pub fn is_empty(&self) -> bool {
        self.graded.is_empty() && self.failed.is_empty() && self.recovered.is_empty()
    }

    pub fn total_stake(&self) -> Cents {
        saturating_sum(self.graded.iter().map(|g| g.stake_cents))
    }

    pub fn total_payout(&self) -> Cents {
        saturating_sum(self.graded.iter().map(|g| g.settlement.payout_cents))
    }

    /// Sum of bettor profit; the book's result is the negation.
    pub fn total_profit(&self) -> Cents {
        saturating_sum(self.graded.iter().map(|g| g.settlement.profit_cents))
    }

    /// Commission created by this run, recovered records included.
    pub fn total_commission(&self) -> Cents {
        let graded = self
            .graded
            .iter()
            .filter_map(|g| g.commission.as_ref())
            .map(|c| c.amount_cents);
        saturating_sum(graded.chain(self.recovered.iter().map(|c| c.amount_cents)))
    }
}

impl fmt::Display for SettlementRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SETTLEMENT {} (final {}):", self.event_id, self.score)?;
        writeln!(
            f,
            "  {:>8} {:>6} {:>12} {:>12} {:>12}",
            "Wager", "Result", "Payout", "Profit", "Commission"
        )?;
        for g in &self.graded {
            let commission = g
                .commission
                .as_ref()
                .map(|c| format_cents(c.amount_cents))
                .unwrap_or_else(|| "-".into());
            writeln!(
                f,
                "  {:>8} {:>6} {:>12} {:>12} {:>12}",
                g.wager_id.to_string(),
                g.settlement.result.to_string(),
                format_cents(g.settlement.payout_cents),
                format_cents(g.settlement.profit_cents),
                commission,
            )?;
        }
        for record in &self.recovered {
            writeln!(
                f,
                "  {:>8} {:>6} {:>12} {:>12} {:>12}",
                record.wager_id.to_string(),
                "-",
                "-",
                "-",
                format_cents(record.amount_cents),
            )?;
        }
        for failure in &self.failed {
            writeln!(f, "  FAILED {failure}")?;
        }
        writeln!(
            f,
            "\n  {} graded, {} skipped, {} failed. Book net {}, commission {}",
            self.graded.len(),
            self.skipped.len(),
            self.failed.len(),
            format_cents(-self.total_profit()),
            format_cents(self.total_commission()),
        )
    }
}

/// Load the event's score, refusing events that are unknown or not final.
fn final_score<L: Ledger + ?Sized>(ledger: &L, event_id: EventId) -> Result<Score, SettleError> {
    let event = ledger
        .event(event_id)
        .ok_or(SettleError::EventNotFound(event_id))?;
    if !event.is_final() {
        return Err(SettleError::EventNotFinal(event_id));
    }
    Ok(event.outcome.score)
}

/// Grade one wager and compute the commission it would create.
fn grade_with_commission<L: Ledger + ?Sized>(
    ledger: &L,
    wager: &Wager,
    score: Score,
    settled_at: Timestamp,
) -> Result<GradedWager, SettleError> {
    let settlement = grade(wager, score, settled_at)?;

    let commission = if ledger.has_commission(wager.id) {
        debug!("Commission for {} already recorded; leaving it", wager.id);
        None
    } else {
        match ledger.commission_config(wager.runner_id) {
            Some(config) => {
                let mut settled = wager.clone();
                settled.status = WagerStatus::Settled(settlement);
                CommissionRecord::for_wager(&settled, &config)
            }
            None => {
                debug!("Runner {} has no commission config", wager.runner_id);
                None
            }
        }
    };

    Ok(GradedWager {
        wager_id: wager.id,
        runner_id: wager.runner_id,
        stake_cents: wager.stake_cents,
        settlement,
        commission,
    })
}

/// Commission records owed on already-settled wagers of the event that have
/// none yet, e.g. when a previous run halted between the settlement write
/// and the commission insert.
fn missing_commissions<L: Ledger + ?Sized>(ledger: &L, event_id: EventId) -> Vec<CommissionRecord> {
    ledger
        .event_wagers(event_id)
        .iter()
        .filter(|w| !w.is_open() && !ledger.has_commission(w.id))
        .filter_map(|w| {
            let config = ledger.commission_config(w.runner_id)?;
            CommissionRecord::for_wager(w, &config)
        })
        .collect()
}

/// Grade every open wager on a finalized event without writing anything.
pub fn preview_event<L: Ledger + ?Sized>(
    ledger: &L,
    event_id: EventId,
    settled_at: Timestamp,
) -> Result<SettlementRun, SettleError> {
    let score = final_score(ledger, event_id)?;
    let mut run = SettlementRun::new(event_id, score);
    run.recovered = missing_commissions(ledger, event_id);

    for wager in ledger.open_wagers(event_id) {
        if !wager.is_open() {
            run.skipped.push(wager.id);
            continue;
        }
        match grade_with_commission(ledger, &wager, score, settled_at) {
            Ok(graded) => run.graded.push(graded),
            Err(error) => run.failed.push(WagerFailure {
                wager_id: wager.id,
                error,
            }),
        }
    }
    Ok(run)
}

/// Settle every open wager on a finalized event and create runner commissions.
///
/// Each wager is written back (and its commission inserted) before the next
/// one is graded. Commissions missing from wagers settled by an earlier run
/// are inserted first.
pub fn settle_event<L: Ledger + ?Sized>(
    ledger: &mut L,
    event_id: EventId,
    settled_at: Timestamp,
) -> Result<SettlementRun, SettleError> {
    let score = final_score(ledger, event_id)?;
    let wagers = ledger.open_wagers(event_id);
    info!(
        "Settling {} open wagers on {event_id} (final {score})",
        wagers.len()
    );

    let mut run = SettlementRun::new(event_id, score);

    for record in missing_commissions(ledger, event_id) {
        match ledger.insert_commission(record) {
            Ok(()) => {
                info!(
                    "Recovered commission {} for wager {}",
                    format_cents(record.amount_cents),
                    record.wager_id
                );
                run.recovered.push(record);
            }
            Err(LedgerError::DuplicateCommission(_)) => {}
            Err(source) => {
                return Err(SettleError::Persistence {
                    event: event_id,
                    wager: record.wager_id,
                    source,
                });
            }
        }
    }

    for wager in wagers {
        if !wager.is_open() {
            debug!("Wager {} already settled; skipping", wager.id);
            run.skipped.push(wager.id);
            continue;
        }

        let graded = match grade_with_commission(ledger, &wager, score, settled_at) {
            Ok(graded) => graded,
            Err(error) => {
                warn!("Cannot grade wager {} on {event_id}: {error}", wager.id);
                run.failed.push(WagerFailure {
                    wager_id: wager.id,
                    error,
                });
                continue;
            }
        };

        match ledger.record_settlement(wager.id, graded.settlement) {
            Ok(()) => {}
            Err(LedgerError::AlreadySettled(_)) => {
                debug!("Wager {} settled concurrently; skipping", wager.id);
                run.skipped.push(wager.id);
                continue;
            }
            Err(source) => {
                return Err(SettleError::Persistence {
                    event: event_id,
                    wager: wager.id,
                    source,
                });
            }
        }
        debug!(
            "Wager {} {}: payout {} profit {}",
            wager.id,
            graded.settlement.result,
            format_cents(graded.settlement.payout_cents),
            format_cents(graded.settlement.profit_cents),
        );

        let mut graded = graded;
        if let Some(record) = graded.commission {
            match ledger.insert_commission(record) {
                Ok(()) => {}
                Err(LedgerError::DuplicateCommission(_)) => graded.commission = None,
                Err(source) => {
                    return Err(SettleError::Persistence {
                        event: event_id,
                        wager: wager.id,
                        source,
                    });
                }
            }
        }
        run.graded.push(graded);
    }

    info!(
        "Settled {event_id}: {} graded, {} skipped, {} failed, {} commissions recovered",
        run.graded.len(),
        run.skipped.len(),
        run.failed.len(),
        run.recovered.len()
    );
    Ok(run)
}
