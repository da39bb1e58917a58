//! JSONL audit trail logging.
//!
//! Every state-changing command appends events to an audit.jsonl file, one
//! JSON object per line. Amounts are written as two-decimal strings.

use std::fs::{self, File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

use bookline::{
    CommissionRecord, EventId, GradedWager, QuoteId, Score, SettlementRun, Wager, WagerFailure,
    format_cents,
};
use bookline_risk::{ExposureReport, RiskReport};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;

/// One line of the trail: timestamp, event name, then the event's fields.
#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    ts: DateTime<Utc>,
    event: &'a str,
    #[serde(flatten)]
    data: &'a serde_json::Value,
}

/// Append-only audit trail. Each entry is flushed as soon as its line ends.
pub struct AuditLog {
    path: PathBuf,
    writer: LineWriter<File>,
}

impl AuditLog {
    /// Open the trail for appending, creating it and its directory if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: LineWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `event` with `data` flattened into the same object.
    pub fn log(&mut self, event: &str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEntry {
            ts: Utc::now(),
            event,
            data: &data,
        };
        serde_json::to_writer(&mut self.writer, &entry).map_err(io::Error::from)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

pub fn log_wager_placed(audit: &mut AuditLog, wager: &Wager) -> Result<()> {
    audit.log(
        "wager_placed",
        serde_json::json!({
            "wager": wager.id.0,
            "event_id": wager.event_id.0,
            "runner": wager.runner_id.0,
            "bettor": wager.bettor_id.0,
            "quote": wager.quote_id.map(|QuoteId(id)| id),
            "market": wager.market.as_str(),
            "side": wager.side.as_str(),
            "line": wager.line.map(|l| l.to_string()),
            "odds": wager.odds.to_string(),
            "stake": format_cents(wager.stake_cents),
            "asian": wager.asian,
        }),
    )
}

pub fn log_settlement_started(
    audit: &mut AuditLog,
    event: EventId,
    score: Score,
    open_wagers: usize,
) -> Result<()> {
    audit.log(
        "settlement_started",
        serde_json::json!({
            "event_id": event.0,
            "score": score.to_string(),
            "open_wagers": open_wagers,
        }),
    )
}

pub fn log_wager_settled(audit: &mut AuditLog, graded: &GradedWager) -> Result<()> {
    let s = &graded.settlement;
    audit.log(
        "wager_settled",
        serde_json::json!({
            "wager": graded.wager_id.0,
            "result": s.result.to_string(),
            "payout": format_cents(s.payout_cents),
            "profit": format_cents(s.profit_cents),
            "settled_at": s.settled_at,
        }),
    )
}

pub fn log_wager_failed(audit: &mut AuditLog, failure: &WagerFailure) -> Result<()> {
    audit.log(
        "wager_failed",
        serde_json::json!({
            "wager": failure.wager_id.0,
            "error": failure.error.to_string(),
        }),
    )
}

pub fn log_commission_created(audit: &mut AuditLog, record: &CommissionRecord) -> Result<()> {
    audit.log(
        "commission_created",
        serde_json::json!({
            "wager": record.wager_id.0,
            "runner": record.runner_id.0,
            "amount": format_cents(record.amount_cents),
            "scheme": record.scheme.to_string(),
            "rate": record.rate.to_string(),
        }),
    )
}

/// Log recovered commissions, each graded wager with its commission, each
/// failure, and the run totals.
pub fn log_settlement_run(audit: &mut AuditLog, run: &SettlementRun) -> Result<()> {
    for record in &run.recovered {
        log_commission_created(audit, record)?;
    }
    for graded in &run.graded {
        log_wager_settled(audit, graded)?;
        if let Some(record) = &graded.commission {
            log_commission_created(audit, record)?;
        }
    }
    for failure in &run.failed {
        log_wager_failed(audit, failure)?;
    }
    audit.log(
        "settlement_completed",
        serde_json::json!({
            "event_id": run.event_id.0,
            "graded": run.graded.len(),
            "skipped": run.skipped.len(),
            "failed": run.failed.len(),
            "recovered": run.recovered.len(),
            "book_net": format_cents(-run.total_profit()),
            "commission": format_cents(run.total_commission()),
        }),
    )
}

pub fn log_exposure_checked(
    audit: &mut AuditLog,
    event: EventId,
    exposure: &ExposureReport,
    report: &RiskReport,
) -> Result<()> {
    let buckets: Vec<_> = exposure
        .entries()
        .into_iter()
        .map(|(name, amount)| serde_json::json!({ "scenario": name, "exposure": amount }))
        .collect();
    let check_data: Vec<_> = report
        .checks
        .iter()
        .map(|c| {
            serde_json::json!({
                "name": c.name,
                "status": c.status.as_str(),
                "observed": format_cents(c.observed_cents),
                "limit": c.limit_cents.map(format_cents),
                "detail": c.detail,
            })
        })
        .collect();

    audit.log(
        "exposure_checked",
        serde_json::json!({
            "event_id": event.0,
            "handle": format_cents(exposure.handle_cents()),
            "buckets": buckets,
            "passed": !report.has_failures(),
            "checks": check_data,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookline::{MarketType, Odds, PickSide, WagerId};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn entries_flatten_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut log = AuditLog::open(&path).unwrap();
        log.log("score_recorded", serde_json::json!({ "event_id": 3, "final": true }))
            .unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["event"], "score_recorded");
        assert_eq!(lines[0]["event_id"], 3);
        assert!(lines[0]["ts"].is_string());
    }

    #[test]
    fn reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        AuditLog::open(&path).unwrap().log("first", serde_json::json!({})).unwrap();
        AuditLog::open(&path).unwrap().log("second", serde_json::json!({})).unwrap();
        let events: Vec<_> = read_lines(&path).into_iter().map(|v| v["event"].clone()).collect();
        assert_eq!(events, ["first", "second"]);
    }

    #[test]
    fn missing_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("2026").join("audit.jsonl");
        let log = AuditLog::open(&path).unwrap();
        assert_eq!(log.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn wager_placed_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let wager = Wager::new(
            WagerId(4),
            EventId(2),
            MarketType::Moneyline,
            PickSide::Away,
            Odds(2_1000),
            50_00,
        );
        log_wager_placed(&mut AuditLog::open(&path).unwrap(), &wager).unwrap();

        let line = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["event"], "wager_placed");
        assert_eq!(value["wager"], 4);
        assert_eq!(value["side"], "AWAY");
        assert_eq!(value["odds"], "2.10");
        assert_eq!(value["stake"], "50.00");
        assert!(value["quote"].is_null());
    }
}
