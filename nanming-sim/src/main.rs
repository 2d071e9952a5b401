use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use nanming_data::Catalog;
use nanming_sim::{
    run_headless, spawn_sim_thread, ChoicePolicy, HeadlessOptions, RunnerError, SimEvent,
};
use nanming_sim_core::{
    initial_state, ActionError, Command, ConsoleObserver, EventLogObserver, ExpenseModel,
    ObserverRegistry, PayScale, SimConfig, SimMetrics, SimState,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExpenseModelArg {
    /// Army maintenance only
    MaintenanceOnly,
    /// Maintenance plus a 50% surcharge for court, stipends and public works
    Itemized,
}

impl From<ExpenseModelArg> for ExpenseModel {
    fn from(arg: ExpenseModelArg) -> Self {
        match arg {
            ExpenseModelArg::MaintenanceOnly => ExpenseModel::MaintenanceOnly,
            ExpenseModelArg::Itemized => ExpenseModel::itemized(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Southern Ming court settlement simulation", long_about = None)]
struct Args {
    /// Number of months to settle
    #[arg(short, long, default_value_t = 12)]
    months: u32,

    /// Catalog JSON file (defaults to the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ExpenseModelArg::MaintenanceOnly)]
    expense_model: ExpenseModelArg,

    /// Option picked for every event: first, last, or an option id
    #[arg(long, default_value = "first")]
    choice: ChoicePolicy,

    /// Army pay scale: full, reduced, minimal, or 1.0 / 0.7 / 0.3
    #[arg(long)]
    pay_scale: Option<PayScale>,

    /// Troops to recruit before the first month
    #[arg(long)]
    recruit: Option<i64>,

    /// Write the JSONL chronicle to this file ("-" for stdout)
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Write the final state as JSON to this file
    #[arg(long)]
    snapshot_out: Option<PathBuf>,

    /// Drive the simulation thread on a wall-clock timer
    #[arg(long)]
    realtime: bool,

    /// Milliseconds per month in realtime mode
    #[arg(long, default_value_t = 4000)]
    tick_ms: u64,

    /// Seed for generated prefecture taxes
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print the catalog as JSON and exit
    #[arg(long)]
    list_catalog: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };

    if args.list_catalog {
        println!("{}", catalog.to_json_pretty()?);
        return Ok(());
    }

    let config = SimConfig {
        tick_interval: Duration::from_millis(args.tick_ms),
        expense_model: args.expense_model.into(),
        ..SimConfig::default()
    };
    log::info!(
        "Starting nanming-sim: {} months, {} expenses, choice {:?}",
        args.months,
        config.expense_model,
        args.choice
    );

    let mut observers = ObserverRegistry::new();
    observers.register(Box::new(ConsoleObserver::new()));
    if let Some(path) = &args.event_log {
        let observer = if path.as_os_str() == "-" {
            EventLogObserver::stdout()
        } else {
            EventLogObserver::file(path)
                .with_context(|| format!("Failed to create event log {}", path.display()))?
        };
        observers.register(Box::new(observer));
    }

    let state = initial_state(&catalog, args.seed);
    let options = HeadlessOptions {
        months: args.months,
        choice: args.choice.clone(),
        pay_scale: args.pay_scale,
        recruit: args.recruit,
    };

    let (state, metrics) = if args.realtime {
        run_realtime(state, catalog, config, &options, observers)?
    } else {
        let outcome = run_headless(state, &catalog, &config, &options, &observers)?;
        observers.shutdown();
        (outcome.state, outcome.metrics)
    };

    log::info!(
        "Settled {} months in {:.2?} ({:.3} ms/month)",
        metrics.total_ticks,
        metrics.total_time,
        metrics.tick_avg_ms()
    );

    print_summary(&state);

    if let Some(path) = &args.snapshot_out {
        let json = serde_json::to_string_pretty(&state)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
    }

    Ok(())
}

/// Drive the simulation thread until `options.months` months are settled.
fn run_realtime(
    state: SimState,
    catalog: Catalog,
    config: SimConfig,
    options: &HeadlessOptions,
    observers: ObserverRegistry,
) -> Result<(SimState, SimMetrics)> {
    let timeout = config.tick_interval * 4 + Duration::from_secs(1);
    let handle = spawn_sim_thread(state, catalog, config, observers);

    if let Some(scale) = options.pay_scale {
        handle.apply(Command::SetPayScale { scale })?;
    }
    if let Some(amount) = options.recruit {
        match handle.apply(Command::Recruit { amount }) {
            Err(RunnerError::Rejected(e @ ActionError::InsufficientFunds { .. })) => {
                log::warn!("Recruitment of {} refused: {}", amount, e)
            }
            other => {
                other?;
            }
        }
    }
    let current = handle.snapshot()?;
    if current.paused {
        handle.apply(Command::TogglePause)?;
    }
    let target = current.tick + u64::from(options.months);
    handle.start();

    let mut last = handle.snapshot()?;
    while last.tick < target {
        match handle.event_rx.recv_timeout(timeout) {
            Ok(SimEvent::Tick { state, .. }) => last = state,
            Ok(SimEvent::EventPending(id)) => {
                if last.tick >= target {
                    break;
                }
                let Some(event) = last.pending_event.as_ref().filter(|e| e.id == id) else {
                    continue;
                };
                let Some(option) = options.choice.choose(event) else {
                    bail!("Event '{}' offers no options", id);
                };
                last = handle.apply(Command::ResolveEvent {
                    option_id: option.id.clone(),
                })?;
            }
            Ok(SimEvent::Shutdown) => bail!("Simulation thread stopped unexpectedly"),
            Err(_) => bail!("No tick within {:?}", timeout),
        }
    }

    // The timer may settle another month before Stop lands; report the
    // snapshot at the target.
    handle.stop();
    handle.shutdown();
    let metrics = handle.join()?;
    Ok((last.as_ref().clone(), metrics))
}

fn print_summary(state: &SimState) {
    println!("=== {} ===", state.date);
    println!("Treasury:  {:.1}", state.treasury.to_f64());
    println!("Prestige:  {}", state.prestige);
    println!("Infamy:    {}", state.infamy);
    println!(
        "Army:      {} troops at {} pay",
        state.total_troops(),
        state.pay_scale
    );
    if let Some(event) = &state.pending_event {
        println!("Pending:   {} ({})", event.name, event.id);
    }
    println!("Chronicle:");
    for entry in state.history.iter() {
        println!("  {}", entry);
    }
}
