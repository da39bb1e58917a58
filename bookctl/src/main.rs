//! CLI entry point for bookctl.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use bookline::intake::WagerTicket;
use bookline::{
    BettorId, BookmakerId, Cents, CommissionConfig, CommissionRate, CommissionScheme, EventId,
    Line, MarketType, Odds, PickSide, Quote, QuoteId, RunnerId, parse_cents,
};
use bookline_bookctl::commands::{self, SettleOptions};
use bookline_bookctl::config::Config;
use bookline_bookctl::error::Error;

#[derive(Parser)]
#[command(name = "bookctl")]
#[command(about = "Sportsbook bookkeeping: wagers, settlement, commission and exposure")]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults apply if it does not exist)
    #[arg(long, default_value = "bookctl.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create events and record scores
    #[command(subcommand)]
    Event(EventCommand),

    /// Configure runner commission
    #[command(subcommand)]
    Runner(RunnerCommand),

    /// Record bookmaker quotes
    #[command(subcommand)]
    Quote(QuoteCommand),

    /// Place and list wagers
    #[command(subcommand)]
    Bet(BetCommand),

    /// Grade all open wagers on a finalized event and create commissions
    Settle {
        /// Event id
        event: u64,

        /// Show the grading without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt (for automation/cron)
        #[arg(long)]
        force: bool,
    },

    /// Scenario exposure and risk limit checks over open wagers
    Exposure {
        /// Only this event (default: every event with open wagers)
        #[arg(long)]
        event: Option<u64>,
    },
}

#[derive(Subcommand)]
enum EventCommand {
    /// Create an event
    Create { home: String, away: String },

    /// Record a score; --final closes the event for wagering and allows settlement
    Score {
        event: u64,
        home: u32,
        away: u32,
        #[arg(long = "final")]
        finalize: bool,
    },
}

#[derive(Subcommand)]
enum RunnerCommand {
    /// Set a runner's commission scheme (net|handle) and rate in percent
    Commission {
        runner: u64,
        scheme: CommissionScheme,
        rate: CommissionRate,
    },
}

/// Selection and price shared by quotes and wagers.
#[derive(Args)]
struct Selection {
    /// Event id
    #[arg(long)]
    event: u64,

    /// Bookmaker id
    #[arg(long, default_value_t = 1)]
    bookmaker: u64,

    /// moneyline | threeway | spread | total
    #[arg(long)]
    market: MarketType,

    /// HOME | AWAY | DRAW | OVER | UNDER
    #[arg(long)]
    side: PickSide,

    /// Handicap or total line, e.g. -3.25 (spread/total only)
    #[arg(long, allow_hyphen_values = true)]
    line: Option<Line>,

    /// Decimal odds, e.g. 1.91
    #[arg(long)]
    odds: Odds,

    /// Asian handicap: second leg line
    #[arg(long, allow_hyphen_values = true)]
    line_b: Option<Line>,

    /// Asian handicap: second leg odds
    #[arg(long)]
    odds_b: Option<Odds>,

    /// Mark as Asian handicap
    #[arg(long)]
    asian: bool,
}

#[derive(Subcommand)]
enum QuoteCommand {
    /// Store a quote
    Add(Selection),
}

#[derive(Subcommand)]
enum BetCommand {
    /// Place a wager against the latest matching quote
    Place {
        #[command(flatten)]
        selection: Selection,

        /// Stake, e.g. 100 or 25.50
        #[arg(long, value_parser = parse_cents)]
        stake: Cents,

        /// Runner id (commission recipient)
        #[arg(long, default_value_t = 0)]
        runner: u64,

        /// Bettor id
        #[arg(long, default_value_t = 0)]
        bettor: u64,
    },

    /// List wagers on an event
    List {
        event: u64,

        /// Only open wagers
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = run(&config, cli.command);

    if let Err(e) = result {
        match &e {
            Error::RiskFailed(msg) => eprintln!("\nAborted: {msg}"),
            Error::Aborted(msg) => eprintln!("{msg}"),
            _ => eprintln!("Error: {e}"),
        }
        process::exit(e.exit_code());
    }
}

fn run(config: &Config, command: Command) -> Result<(), Error> {
    match command {
        Command::Event(EventCommand::Create { home, away }) => {
            commands::create_event(config, &home, &away).map(drop)
        }
        Command::Event(EventCommand::Score {
            event,
            home,
            away,
            finalize,
        }) => commands::record_score(config, EventId(event), home, away, finalize),
        Command::Runner(RunnerCommand::Commission {
            runner,
            scheme,
            rate,
        }) => commands::set_commission(config, RunnerId(runner), CommissionConfig { scheme, rate }),
        Command::Quote(QuoteCommand::Add(sel)) => {
            let quote = Quote {
                id: QuoteId::default(),
                event_id: EventId(sel.event),
                bookmaker_id: BookmakerId(sel.bookmaker),
                market: sel.market,
                side: sel.side,
                line: sel.line,
                asian: sel.asian,
                line_b: sel.line_b,
                odds: sel.odds,
                odds_b: sel.odds_b,
                captured_at: 0,
            };
            commands::add_quote(config, quote).map(drop)
        }
        Command::Bet(BetCommand::Place {
            selection: sel,
            stake,
            runner,
            bettor,
        }) => {
            let ticket = WagerTicket {
                event_id: EventId(sel.event),
                bookmaker_id: BookmakerId(sel.bookmaker),
                runner_id: RunnerId(runner),
                bettor_id: BettorId(bettor),
                market: sel.market,
                side: sel.side,
                line: sel.line,
                line_b: sel.line_b,
                odds: sel.odds,
                odds_b: sel.odds_b,
                stake_cents: stake,
                asian: sel.asian,
            };
            commands::place_bet(config, ticket).map(drop)
        }
        Command::Bet(BetCommand::List { event, open }) => {
            commands::list_bets(config, EventId(event), open).map(drop)
        }
        Command::Settle {
            event,
            dry_run,
            force,
        } => commands::settle(config, EventId(event), SettleOptions { dry_run, force }).map(drop),
        Command::Exposure { event } => commands::exposure(config, event.map(EventId)).map(drop),
    }
}
