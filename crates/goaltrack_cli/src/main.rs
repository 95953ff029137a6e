//! `goaltrack` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, open the goal database, run the startup
//!   rollover check and dispatch one subcommand.
//! - Enforce presentation rules the core leaves to callers (expired goals
//!   cannot be toggled).

mod cli;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use goaltrack_core::db::open_db;
use goaltrack_core::{
    core_version, init_logging, GoalId, GoalStore, KvGoalPersistence, NewGoal, RolloverOutcome,
    RolloverScheduler, SqliteKeyValueStore, SystemClock, TrackerConfig,
};
use log::{info, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use terminal::{ensure_toggleable, render_goal, TerminalNotifier};

type CliStore = GoalStore<KvGoalPersistence<SqliteKeyValueStore>, TerminalNotifier, SystemClock>;

const MIN_ID_PREFIX_LEN: usize = 4;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        core_version()
    );

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let kv = SqliteKeyValueStore::try_new(conn)?;
    let mut store = GoalStore::open_with_policy(
        KvGoalPersistence::new(kv),
        TerminalNotifier,
        SystemClock,
        config.rollover_policy,
    );

    // Startup check; a failed save is retried by the next run.
    if let Err(err) = store.check_rollover() {
        warn!("event=rollover module=cli status=error error={}", err);
        eprintln!("warning: daily rollover failed: {err}");
    }

    match cli.command {
        Command::Add {
            title,
            description,
            end_date,
            daily,
        } => {
            let input = NewGoal::new(title, end_date)
                .description(description)
                .daily_reset(daily);
            let id = store.add_goal(input)?;
            println!("Added goal {id}");
        }
        Command::List => list_goals(&store),
        Command::Toggle { id } => {
            let id = resolve_id(&store, &id);
            let Some(view) = store.views().into_iter().find(|view| view.goal.id == id) else {
                println!("No goal matches {id}");
                return Ok(());
            };
            ensure_toggleable(&view)?;
            store.toggle_complete(&id)?;
            if let Some(goal) = store.get_goal(&id) {
                let state = if goal.is_completed_today { "done" } else { "not done" };
                println!("Marked \"{}\" {state} for today", goal.title);
            }
        }
        Command::Delete { id } => {
            let id = resolve_id(&store, &id);
            if store.delete_goal(&id)? {
                println!("Deleted goal {id}");
            } else {
                println!("No goal matches {id}");
            }
        }
        Command::Rollover => match store.check_rollover()? {
            RolloverOutcome::AlreadyApplied { date } => {
                println!("Rollover already applied for {date}");
            }
            RolloverOutcome::Applied {
                date,
                reset,
                reminded,
            } => println!("Rolled over to {date}: {reset} reset, {reminded} reminded"),
        },
        Command::Watch { interval_secs } => {
            let interval = interval_secs
                .map(Duration::from_secs)
                .unwrap_or(config.rollover_interval);
            watch(store, interval)?;
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<TrackerConfig> {
    let mut config = TrackerConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(policy) = cli.reset_scope {
        config.rollover_policy = policy;
    }
    Ok(config)
}

fn list_goals(store: &CliStore) {
    let views = store.views();
    if views.is_empty() {
        println!("No goals added yet. Start with `goaltrack add`.");
        return;
    }
    for view in &views {
        println!("{}", render_goal(view));
    }
}

/// Accepts a full id or an unambiguous prefix of at least four characters.
///
/// Unknown input is passed through unchanged so the store treats it as a
/// no-op.
fn resolve_id(store: &CliStore, raw: &str) -> GoalId {
    let raw = raw.trim();
    let exact = GoalId::from(raw);
    if store.get_goal(&exact).is_some() || raw.chars().count() < MIN_ID_PREFIX_LEN {
        return exact;
    }

    let mut matches = store
        .goals()
        .iter()
        .filter(|goal| goal.id.as_str().starts_with(raw));
    match (matches.next(), matches.next()) {
        (Some(goal), None) => goal.id.clone(),
        _ => exact,
    }
}

fn watch(store: CliStore, interval: Duration) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(async move {
        let store = Arc::new(Mutex::new(store));
        let scheduler = RolloverScheduler::new(interval);
        println!(
            "Watching for a new day every {}s; press Ctrl-C to stop",
            scheduler.interval().as_secs()
        );
        let handle = scheduler.start(store);

        let signal = tokio::signal::ctrl_c().await;
        handle.stop().await;
        signal.context("failed to listen for Ctrl-C")
    })
}
