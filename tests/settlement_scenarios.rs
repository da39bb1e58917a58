// Allow our dollar.cents digit grouping convention (e.g., 100_00 = 100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Worked settlement and commission scenarios, end to end through the ledger.

use bookline::intake::{self, WagerTicket};
use bookline::{
    BettorId, BookmakerId, CommissionConfig, CommissionRate, CommissionScheme, EventId, Ledger,
    Line, MarketType, MemoryLedger, Odds, PickSide, RunnerId, WagerId, WagerResult, settle_event,
};

fn book() -> (MemoryLedger, EventId) {
    let mut ledger = MemoryLedger::new();
    let event = intake::create_event(&mut ledger, "Lions", "Bears").unwrap();
    (ledger, event)
}

fn ticket(event: EventId, market: MarketType, side: PickSide, odds: u32, stake: i64) -> WagerTicket {
    WagerTicket {
        event_id: event,
        bookmaker_id: BookmakerId(1),
        runner_id: RunnerId(1),
        bettor_id: BettorId(1),
        market,
        side,
        line: None,
        line_b: None,
        odds: Odds(odds),
        odds_b: None,
        stake_cents: stake,
        asian: false,
    }
}

fn settle_one(ledger: &mut MemoryLedger, event: EventId, home: u32, away: u32) {
    intake::record_score(ledger, event, home, away, true).unwrap();
    let run = settle_event(ledger, event, 1_700_000_000).unwrap();
    assert!(run.failed.is_empty());
}

// ============================================================================
// Grading
// ============================================================================

#[test]
fn moneyline_home_win() {
    let (mut ledger, event) = book();
    let t = ticket(event, MarketType::Moneyline, PickSide::Home, 1_9100, 100_00);
    let id = intake::place_wager(&mut ledger, t, 0).unwrap();
    settle_one(&mut ledger, event, 3, 1);

    let wager = ledger.wager(id).unwrap();
    let s = wager.settlement().unwrap();
    assert_eq!(s.payout_cents, 191_00);
    assert_eq!(s.profit_cents, 91_00);
    assert_eq!(s.result, WagerResult::Win);
    assert_eq!(s.settled_at, 1_700_000_000);
}

#[test]
fn whole_line_spread_push_even_when_asian() {
    let (mut ledger, event) = book();
    let t = WagerTicket {
        line: Some(Line(-3_00)),
        asian: true,
        line_b: Some(Line(-3_50)),
        odds_b: Some(Odds(1_9000)),
        ..ticket(event, MarketType::Spread, PickSide::Home, 1_9500, 200_00)
    };
    let id = intake::place_wager(&mut ledger, t, 0).unwrap();
    settle_one(&mut ledger, event, 24, 21);

    let wager = ledger.wager(id).unwrap();
    assert!(!wager.is_split());
    let s = wager.settlement().unwrap();
    assert_eq!(s.payout_cents, 200_00);
    assert_eq!(s.profit_cents, 0);
    assert_eq!(s.result, WagerResult::Push);
}

#[test]
fn half_point_total_splits_when_asian() {
    let (mut ledger, event) = book();
    let t = WagerTicket {
        line: Some(Line(44_50)),
        asian: true,
        line_b: Some(Line(45_00)),
        odds_b: Some(Odds(1_8000)),
        ..ticket(event, MarketType::Total, PickSide::Over, 1_9000, 100_00)
    };
    let id = intake::place_wager(&mut ledger, t, 0).unwrap();
    settle_one(&mut ledger, event, 24, 21);

    let wager = ledger.wager(id).unwrap();
    let legs = wager.legs().unwrap();
    assert_eq!(legs.first.stake_cents, 50_00);
    assert_eq!(legs.second.unwrap().stake_cents, 50_00);

    // 45 > 44.5 wins at 1.90; 45 == 45 pushes.
    let s = wager.settlement().unwrap();
    assert_eq!(s.payout_cents, 95_00 + 50_00);
    assert_eq!(s.profit_cents, 45_00);
    assert_eq!(s.result, WagerResult::Win);
}

#[test]
fn quarter_line_half_loss() {
    // HOME -0.25 graded as -0.25 and 0.0 legs on a 1-1 draw.
    let (mut ledger, event) = book();
    let t = WagerTicket {
        line: Some(Line(-25)),
        asian: true,
        line_b: Some(Line(0)),
        odds_b: Some(Odds(1_9000)),
        ..ticket(event, MarketType::Spread, PickSide::Home, 1_9000, 100_00)
    };
    let id = intake::place_wager(&mut ledger, t, 0).unwrap();
    settle_one(&mut ledger, event, 1, 1);

    let s = *ledger.wager(id).unwrap().settlement().unwrap();
    assert_eq!(s.payout_cents, 50_00);
    assert_eq!(s.profit_cents, -50_00);
    assert_eq!(s.result, WagerResult::Lose);
}

#[test]
fn threeway_draw_wins() {
    let (mut ledger, event) = book();
    let draw = ticket(event, MarketType::Threeway, PickSide::Draw, 3_2000, 10_00);
    let home = ticket(event, MarketType::Threeway, PickSide::Home, 2_5000, 10_00);
    let d = intake::place_wager(&mut ledger, draw, 0).unwrap();
    let h = intake::place_wager(&mut ledger, home, 0).unwrap();
    settle_one(&mut ledger, event, 0, 0);

    assert_eq!(ledger.wager(d).unwrap().settlement().unwrap().payout_cents, 32_00);
    assert_eq!(ledger.wager(h).unwrap().settlement().unwrap().result, WagerResult::Lose);
}

#[test]
fn moneyline_draw_pick_on_draw_wins() {
    let (mut ledger, event) = book();
    let t = ticket(event, MarketType::Moneyline, PickSide::Draw, 3_0000, 10_00);
    let id = intake::place_wager(&mut ledger, t, 0).unwrap();
    settle_one(&mut ledger, event, 2, 2);
    let s = *ledger.wager(id).unwrap().settlement().unwrap();
    assert_eq!(s.result, WagerResult::Win);
    assert_eq!(s.payout_cents, 30_00);
}

// ============================================================================
// Commission
// ============================================================================

#[test]
fn net_commission_on_book_win() {
    let (mut ledger, event) = book();
    intake::configure_runner(&mut ledger, RunnerId(1), CommissionConfig::net(CommissionRate(10_00)))
        .unwrap();
    let t = ticket(event, MarketType::Moneyline, PickSide::Away, 1_9100, 91_00);
    let id = intake::place_wager(&mut ledger, t, 0).unwrap();
    settle_one(&mut ledger, event, 2, 0);

    // Bettor profit -91.00, so the book netted 91.00.
    let record = ledger.commission(id).unwrap();
    assert_eq!(record.amount_cents, 9_10);
    assert_eq!(record.scheme, CommissionScheme::Net);
    assert_eq!(record.runner_id, RunnerId(1));
}

#[test]
fn net_commission_zero_on_book_loss() {
    let (mut ledger, event) = book();
    intake::configure_runner(&mut ledger, RunnerId(1), CommissionConfig::net(CommissionRate(10_00)))
        .unwrap();
    let t = ticket(event, MarketType::Moneyline, PickSide::Home, 1_9100, 100_00);
    let id = intake::place_wager(&mut ledger, t, 0).unwrap();
    settle_one(&mut ledger, event, 2, 0);
    assert_eq!(ledger.commission(id).unwrap().amount_cents, 0);
}

#[test]
fn handle_commission_ignores_result() {
    for (home, away) in [(3, 0), (0, 3)] {
        let (mut ledger, event) = book();
        intake::configure_runner(
            &mut ledger,
            RunnerId(1),
            CommissionConfig::handle(CommissionRate(5_00)),
        )
        .unwrap();
        let t = ticket(event, MarketType::Moneyline, PickSide::Home, 1_9100, 200_00);
        let id = intake::place_wager(&mut ledger, t, 0).unwrap();
        settle_one(&mut ledger, event, home, away);
        assert_eq!(ledger.commission(id).unwrap().amount_cents, 10_00);
    }
}

#[test]
fn commission_keeps_rate_in_force_at_settlement() {
    let (mut ledger, event) = book();
    intake::configure_runner(&mut ledger, RunnerId(1), CommissionConfig::handle(CommissionRate(5_00)))
        .unwrap();
    let t = ticket(event, MarketType::Moneyline, PickSide::Home, 1_9100, 100_00);
    let id = intake::place_wager(&mut ledger, t, 0).unwrap();
    settle_one(&mut ledger, event, 1, 0);

    intake::configure_runner(&mut ledger, RunnerId(1), CommissionConfig::handle(CommissionRate(50_00)))
        .unwrap();
    settle_event(&mut ledger, event, 0).unwrap();
    let record = ledger.commission(id).unwrap();
    assert_eq!(record.rate, CommissionRate(5_00));
    assert_eq!(record.amount_cents, 5_00);
}

#[test]
fn runner_without_config_earns_nothing() {
    let (mut ledger, event) = book();
    let t = WagerTicket {
        runner_id: RunnerId(9),
        ..ticket(event, MarketType::Moneyline, PickSide::Home, 1_9100, 100_00)
    };
    let id = intake::place_wager(&mut ledger, t, 0).unwrap();
    settle_one(&mut ledger, event, 0, 1);
    assert!(ledger.commission(id).is_none());
    assert!(!ledger.wager(id).unwrap().is_open());
}

#[test]
fn wagers_on_other_events_untouched() {
    let (mut ledger, event) = book();
    let other = intake::create_event(&mut ledger, "Hawks", "Owls").unwrap();
    let t = ticket(other, MarketType::Moneyline, PickSide::Home, 1_9100, 100_00);
    let id = intake::place_wager(&mut ledger, t, 0).unwrap();
    settle_one(&mut ledger, event, 1, 0);
    assert!(ledger.wager(id).unwrap().is_open());
    assert_eq!(ledger.wager(WagerId(id.0)).unwrap().event_id, other);
}
