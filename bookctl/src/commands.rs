//! Command implementations: load the ledger, apply one operation, save it
//! back, and record what happened in the audit trail.

use bookline::intake::{self, WagerTicket};
use bookline::{
    CommissionConfig, EventId, IntakeError, Ledger, MemoryLedger, Quote, QuoteId, RunnerId,
    SettleError, SettlementRun, Timestamp, Wager, WagerId, WagerStatus, format_cents,
    preview_event, settle_event,
};
use bookline_risk::{ExposureReport, RiskEngine, RiskReport, compute_exposure};
use log::{info, warn};

use crate::audit::{self, AuditLog};
use crate::config::Config;
use crate::error::{Error, Result};

/// Options for a settlement run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettleOptions {
    pub dry_run: bool,
    pub force: bool,
}

fn now() -> Timestamp {
    chrono::Utc::now().timestamp()
}

/// Load the ledger snapshot, or start empty if none exists yet.
pub fn open_ledger(config: &Config) -> Result<MemoryLedger> {
    let path = config.store_path();
    MemoryLedger::load_or_default(&path).map_err(|source| Error::Store { path, source })
}

fn save_ledger(config: &Config, ledger: &MemoryLedger) -> Result<()> {
    let path = config.store_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Error::Store {
            path: path.clone(),
            source,
        })?;
    }
    ledger
        .save(&path)
        .map_err(|source| Error::Store { path, source })
}

fn risk_engine(config: &Config) -> Result<RiskEngine> {
    RiskEngine::try_new(config.risk_config()).map_err(Error::Config)
}

/// Create an event and print its id.
pub fn create_event(config: &Config, home: &str, away: &str) -> Result<EventId> {
    let mut ledger = open_ledger(config)?;
    let id = intake::create_event(&mut ledger, home, away)?;
    save_ledger(config, &ledger)?;
    AuditLog::open(&config.audit_path())?.log(
        "event_created",
        serde_json::json!({ "event_id": id.0, "home": home, "away": away }),
    )?;
    println!("Created {id}: {home} vs {away}");
    Ok(id)
}

/// Record an interim or final score.
pub fn record_score(
    config: &Config,
    event: EventId,
    home: u32,
    away: u32,
    finalize: bool,
) -> Result<()> {
    let mut ledger = open_ledger(config)?;
    intake::record_score(&mut ledger, event, home, away, finalize)?;
    save_ledger(config, &ledger)?;
    AuditLog::open(&config.audit_path())?.log(
        "score_recorded",
        serde_json::json!({
            "event_id": event.0,
            "score": format!("{home}-{away}"),
            "final": finalize,
        }),
    )?;
    println!(
        "{event} score {home}-{away}{}",
        if finalize { " (final)" } else { "" }
    );
    Ok(())
}

/// Set a runner's commission scheme and rate.
pub fn set_commission(config: &Config, runner: RunnerId, commission: CommissionConfig) -> Result<()> {
    let mut ledger = open_ledger(config)?;
    intake::configure_runner(&mut ledger, runner, commission)?;
    save_ledger(config, &ledger)?;
    AuditLog::open(&config.audit_path())?.log(
        "runner_configured",
        serde_json::json!({
            "runner": runner.0,
            "scheme": commission.scheme.to_string(),
            "rate": commission.rate.to_string(),
        }),
    )?;
    println!("{runner}: {} commission at {}", commission.scheme, commission.rate);
    Ok(())
}

/// Store a bookmaker quote.
pub fn add_quote(config: &Config, quote: Quote) -> Result<QuoteId> {
    let mut ledger = open_ledger(config)?;
    let quote = Quote {
        captured_at: now(),
        ..quote
    };
    let id = intake::add_quote(&mut ledger, quote)?;
    save_ledger(config, &ledger)?;
    println!("Stored quote {id}");
    Ok(id)
}

/// Place a wager, refusing it if accepting it would breach a risk limit.
pub fn place_bet(config: &Config, ticket: WagerTicket) -> Result<WagerId> {
    let mut ledger = open_ledger(config)?;
    let placed_at = now();

    if config.risk.check_on_place {
        let candidate = ticket
            .clone()
            .validated()
            .map_err(IntakeError::from)?
            .into_wager(None, placed_at);
        let open = ledger.open_wagers(ticket.event_id);
        let report = risk_engine(config)?.check_wager(&open, &candidate)?;
        if report.has_failures() {
            print!("{report}");
            return Err(Error::RiskFailed(format!(
                "wager on {} would breach exposure limits",
                ticket.event_id
            )));
        }
        if report.has_warnings() {
            print!("{report}");
        }
    }

    let id = intake::place_wager(&mut ledger, ticket, placed_at)?;
    save_ledger(config, &ledger)?;

    if let Some(wager) = ledger.wager(id) {
        audit::log_wager_placed(&mut AuditLog::open(&config.audit_path())?, &wager)?;
        let quote = wager
            .quote_id
            .map_or_else(|| "no quote".to_string(), |q| format!("quote {q}"));
        println!(
            "Placed {id}: {} {} @ {} for {} ({quote})",
            wager.market,
            wager.side,
            wager.odds,
            format_cents(wager.stake_cents)
        );
    }
    Ok(id)
}

/// Wagers on an event, optionally only the open ones, in id order.
pub fn list_bets(config: &Config, event: EventId, open_only: bool) -> Result<Vec<Wager>> {
    let ledger = open_ledger(config)?;
    if ledger.event(event).is_none() {
        return Err(SettleError::EventNotFound(event).into());
    }
    let wagers = if open_only {
        ledger.open_wagers(event)
    } else {
        ledger.event_wagers(event)
    };
    display_wagers(&wagers);
    Ok(wagers)
}

/// Settle a finalized event: preview, confirm, write back, audit.
///
/// Returns `None` when the run was a dry run or was declined. When there is
/// nothing to settle or recover, the empty preview is returned and nothing
/// is written.
pub fn settle(config: &Config, event: EventId, opts: SettleOptions) -> Result<Option<SettlementRun>> {
    let mut ledger = open_ledger(config)?;
    let settled_at = now();

    // Fails on unknown or unfinished events before anything is written.
    let plan = preview_event(&ledger, event, settled_at)?;
    if plan.is_empty() {
        println!("Nothing to settle on {event}.");
        return Ok(Some(plan));
    }
    print!("{plan}");

    if opts.dry_run {
        println!("\n[DRY RUN] No settlements written.");
        return Ok(None);
    }

    let mut audit = AuditLog::open(&config.audit_path())?;

    if config.settlement.confirm && !opts.force {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Settle {} wagers and recover {} commissions on {event}?",
                plan.graded.len(),
                plan.recovered.len()
            ))
            .default(false)
            .interact()
            .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))?;

        if !confirmed {
            println!("Aborted.");
            audit.log("user_confirmed", serde_json::json!({"approved": false}))?;
            return Ok(None);
        }
        audit.log("user_confirmed", serde_json::json!({"approved": true}))?;
    }

    audit::log_settlement_started(&mut audit, event, plan.score, plan.graded.len() + plan.failed.len())?;
    let result = settle_event(&mut ledger, event, settled_at);

    // Wagers written before a failure stay settled, so persist either way.
    save_ledger(config, &ledger)?;

    let run = match result {
        Ok(run) => run,
        Err(e) => {
            warn!("Settlement of {event} halted: {e}");
            audit.log(
                "settlement_halted",
                serde_json::json!({ "event_id": event.0, "error": e.to_string() }),
            )?;
            return Err(e.into());
        }
    };

    audit::log_settlement_run(&mut audit, &run)?;
    info!("Settlement of {event} logged to {}", config.audit_path().display());
    println!(
        "\n{} settled, {} skipped, {} failed. Book net {}, commission {}",
        run.graded.len(),
        run.skipped.len(),
        run.failed.len(),
        format_cents(-run.total_profit()),
        format_cents(run.total_commission()),
    );
    Ok(Some(run))
}

/// Exposure and limit checks for one event, or for every event with open wagers.
///
/// Fails with `RiskFailed` if any event breaches a hard limit.
pub fn exposure(
    config: &Config,
    event: Option<EventId>,
) -> Result<Vec<(EventId, ExposureReport, RiskReport)>> {
    let ledger = open_ledger(config)?;
    let engine = risk_engine(config)?;

    let events: Vec<EventId> = match event {
        Some(id) => {
            if ledger.event(id).is_none() {
                return Err(SettleError::EventNotFound(id).into());
            }
            vec![id]
        }
        // Final but unsettled events still carry open liability.
        None => ledger.events().into_iter().map(|e| e.id).collect(),
    };

    let mut audit = AuditLog::open(&config.audit_path())?;
    let mut results = Vec::with_capacity(events.len());
    for id in events {
        let open = ledger.open_wagers(id);
        if event.is_none() && open.is_empty() {
            continue;
        }
        let exposure = compute_exposure(&open)?;
        let report = engine.check_exposure(&exposure);
        println!("{id}:");
        print!("{exposure}");
        print!("{report}");
        audit::log_exposure_checked(&mut audit, id, &exposure, &report)?;
        results.push((id, exposure, report));
    }

    if results.is_empty() {
        println!("No open wagers.");
    }

    let breached: Vec<String> = results
        .iter()
        .filter(|(_, _, report)| report.has_failures())
        .map(|(id, _, _)| id.to_string())
        .collect();
    if !breached.is_empty() {
        return Err(Error::RiskFailed(format!(
            "exposure limits breached on {}",
            breached.join(", ")
        )));
    }
    Ok(results)
}

// === Helpers ===

fn display_wagers(wagers: &[Wager]) {
    if wagers.is_empty() {
        println!("No wagers.");
        return;
    }

    println!(
        "  {:>6} {:10} {:5} {:>7} {:>7} {:>10} {:>8} {:>10}",
        "Wager", "Market", "Side", "Line", "Odds", "Stake", "Status", "Payout"
    );
    for w in wagers {
        let line = match (w.line, w.is_split()) {
            (Some(line), true) => match w.line_b {
                Some(line_b) => format!("{line}/{line_b}"),
                None => format!("{line}/?"),
            },
            (Some(line), false) => line.to_string(),
            (None, _) => "-".into(),
        };
        let (status, payout) = match &w.status {
            WagerStatus::Open => ("open".to_string(), "-".to_string()),
            WagerStatus::Settled(s) => (s.result.to_string(), format_cents(s.payout_cents)),
        };
        println!(
            "  {:>6} {:10} {:5} {:>7} {:>7} {:>10} {:>8} {:>10}",
            w.id.to_string(),
            w.market.as_str(),
            w.side.as_str(),
            line,
            w.odds.to_string(),
            format_cents(w.stake_cents),
            status,
            payout,
        );
    }
}
