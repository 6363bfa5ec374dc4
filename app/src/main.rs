// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Parser, Subcommand, ValueEnum};
use core_types::{BotState, Principal, Signal, TradeReceipt};
use engine::Engine;
use events::BotEvent;
use execution::InMemoryLedger;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod feed;
mod snapshot;

use crate::feed::PriceFeed;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "An SMA crossover trading bot.")]
struct Cli {
    /// Directory holding `base.toml` and the per-environment overrides.
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replays a price file through a fresh bot, trading on every new signal.
    Replay {
        /// Text file with one integer price per line.
        #[arg(long)]
        prices: PathBuf,

        /// Principal issuing the trades. Defaults to the configured admin.
        #[arg(long)]
        caller: Option<String>,

        /// Where to write the final bot record.
        #[arg(long)]
        state_out: Option<PathBuf>,
    },

    /// Creates a bot record and writes it to a snapshot file.
    Init {
        #[arg(long)]
        state: PathBuf,

        #[arg(long)]
        short: Option<u64>,

        #[arg(long)]
        long: Option<u64>,

        /// The new bot's admin. Defaults to the configured admin.
        #[arg(long)]
        caller: Option<String>,
    },

    /// Ingests one price and runs crossover detection.
    Tick {
        #[arg(long)]
        state: PathBuf,

        #[arg(long)]
        price: u64,
    },

    /// Changes the SMA windows (admin only).
    UpdatePeriods {
        #[arg(long)]
        state: PathBuf,

        #[arg(long)]
        short: u64,

        #[arg(long)]
        long: u64,

        #[arg(long)]
        caller: String,
    },

    /// Executes the pending signal against the simulated ledger (admin only).
    Execute {
        #[arg(long)]
        state: PathBuf,

        /// Ledger snapshot. Seeded from `ledger.balances` when missing.
        #[arg(long)]
        ledger: PathBuf,

        #[arg(long, value_enum)]
        signal: TradeSide,

        #[arg(long)]
        caller: String,
    },

    /// Hands the bot over to a new admin (admin only).
    TransferAdmin {
        #[arg(long)]
        state: PathBuf,

        #[arg(long)]
        new_admin: String,

        #[arg(long)]
        caller: String,
    },

    /// Prints a bot record as JSON.
    Show {
        #[arg(long)]
        state: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TradeSide {
    Buy,
    Sell,
}

impl From<TradeSide> for Signal {
    fn from(side: TradeSide) -> Self {
        match side {
            TradeSide::Buy => Signal::Buy,
            TradeSide::Sell => Signal::Sell,
        }
    }
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings(&cli.config_dir)
        .with_context(|| format!("Failed to load settings from {}", cli.config_dir.display()))?;
    init_tracing(&settings.app.log_level);
    tracing::info!(environment = %settings.app.environment, "Settings loaded.");

    // Every command works on a single engine; its events are drained by a
    // background task until the engine is dropped.
    let mut engine = Engine::new(settings.execution.clone())?;
    let event_log = spawn_event_logger(engine.subscribe());

    let outcome = run_command(cli.command, &settings, &mut engine);

    drop(engine);
    event_log.await.context("Event logger task panicked")?;
    print_json(&outcome?)
}

fn init_tracing(log_level: &str) {
    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Logs every published `BotEvent` as a JSON line until the channel closes.
fn spawn_event_logger(mut rx: broadcast::Receiver<BotEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => tracing::info!(target: "sma_bot::events", event = %json, "Bot event."),
                    Err(e) => tracing::warn!(error = %e, "Failed to serialize bot event."),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event logger fell behind; events dropped.");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Runs one subcommand and returns the JSON document it reports.
fn run_command(command: Commands, settings: &Settings, engine: &mut Engine) -> Result<Value> {
    match command {
        Commands::Replay {
            prices,
            caller,
            state_out,
        } => handle_replay(settings, engine, &prices, caller, state_out.as_deref()),
        Commands::Init {
            state,
            short,
            long,
            caller,
        } => {
            let short = short.unwrap_or(settings.bot.short_period);
            let long = long.unwrap_or(settings.bot.long_period);
            let caller = caller.map(Principal::new).unwrap_or_else(|| settings.bot.admin());
            let bot = engine.initialize(short, long, caller)?;
            let record = engine.state(bot)?;
            snapshot::save(&state, record)?;
            to_json(record)
        }
        Commands::Tick { state, price } => {
            let bot = engine.restore(snapshot::load(&state)?)?;
            let signal = engine.tick(bot, price)?;
            let record = engine.state(bot)?;
            snapshot::save(&state, record)?;
            Ok(json!({
                "signal": signal,
                "short_sma": record.short_sma(),
                "long_sma": record.long_sma(),
                "samples": record.history().len(),
            }))
        }
        Commands::UpdatePeriods {
            state,
            short,
            long,
            caller,
        } => {
            let bot = engine.restore(snapshot::load(&state)?)?;
            engine.update_periods(bot, short, long, &Principal::new(caller))?;
            snapshot::save(&state, engine.state(bot)?)?;
            to_json(engine.state(bot)?)
        }
        Commands::Execute {
            state,
            ledger,
            signal,
            caller,
        } => {
            let bot = engine.restore(snapshot::load(&state)?)?;
            let mut balances: InMemoryLedger = snapshot::load_or_else(&ledger, || settings.ledger.build())?;
            let receipt = engine.execute_trade(bot, signal.into(), &Principal::new(caller), &mut balances)?;
            snapshot::save(&state, engine.state(bot)?)?;
            snapshot::save(&ledger, &balances)?;
            to_json(&receipt)
        }
        Commands::TransferAdmin {
            state,
            new_admin,
            caller,
        } => {
            let bot = engine.restore(snapshot::load(&state)?)?;
            engine.transfer_admin(bot, Principal::new(new_admin), &Principal::new(caller))?;
            snapshot::save(&state, engine.state(bot)?)?;
            to_json(engine.state(bot)?)
        }
        Commands::Show { state } => {
            let record: BotState = snapshot::load(&state)?;
            to_json(&record)
        }
    }
}

// --- "Replay" Subcommand Logic ---

/// A crossover seen during a replay, keyed by its 1-based sample number.
#[derive(Serialize, Debug)]
struct DetectedSignal {
    sample: usize,
    signal: Signal,
    price: u64,
}

/// Feeds a whole price file through one bot, executing each new signal
/// against a ledger seeded from the settings.
fn handle_replay(
    settings: &Settings,
    engine: &mut Engine,
    prices: &Path,
    caller: Option<String>,
    state_out: Option<&Path>,
) -> Result<Value> {
    // --- 1. Initialization ---
    let feed = PriceFeed::from_path(prices)?;
    if feed.is_empty() {
        anyhow::bail!("Price file {} holds no prices", prices.display());
    }
    let periods = settings.bot.periods()?;
    let admin = settings.bot.admin();
    let caller = caller.map(Principal::new).unwrap_or_else(|| admin.clone());
    let mut ledger = settings.ledger.build();

    let bot = engine.initialize(periods.short(), periods.long(), admin)?;
    tracing::info!(bot = %bot, samples = feed.len(), "Starting replay.");

    // --- 2. The Tick-and-Trade Loop ---
    let mut receipts: Vec<TradeReceipt> = Vec::new();
    let mut signals: Vec<DetectedSignal> = Vec::new();
    let mut rejected = 0usize;
    for (index, price) in feed.into_iter().enumerate() {
        let signal = engine.tick(bot, price)?;
        if !signal.is_actionable() {
            continue;
        }
        signals.push(DetectedSignal {
            sample: index + 1,
            signal,
            price,
        });
        match engine.execute_trade(bot, signal, &caller, &mut ledger) {
            Ok(receipt) => receipts.push(receipt),
            Err(e) => {
                rejected += 1;
                tracing::warn!(bot = %bot, %signal, error = %e, "Replay trade rejected.");
            }
        }
    }

    // --- 3. Report ---
    let state = engine.state(bot)?;
    if let Some(path) = state_out {
        snapshot::save(path, state)?;
    }
    tracing::info!(
        bot = %bot,
        signals = signals.len(),
        trades = receipts.len(),
        rejected,
        "Replay finished."
    );

    Ok(json!({
        "bot": bot,
        "signals": signals,
        "rejected": rejected,
        "receipts": receipts,
        "balances": ledger.balances(),
        "state": state,
    }))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize output")
}

fn print_json(value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
