//! Argument definitions for the `goaltrack` binary.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use goaltrack_core::config::parse_reset_scope;
use goaltrack_core::RolloverPolicy;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "goaltrack", version, about = "Track goals and daily completions")]
pub struct Cli {
    /// SQLite file holding goal state (overrides GOALTRACK_DB_PATH).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides GOALTRACK_LOG_DIR).
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides GOALTRACK_LOG_LEVEL).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Which goals a new day clears: `all` or `daily` (overrides GOALTRACK_RESET_SCOPE).
    #[arg(long, global = true, value_parser = parse_scope)]
    pub reset_scope: Option<RolloverPolicy>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new goal.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Last day of the goal, as YYYY-MM-DD.
        #[arg(long, value_parser = parse_date)]
        end_date: NaiveDate,
        /// Clear the completion flag every day.
        #[arg(long)]
        daily: bool,
    },
    /// List goals with days remaining.
    List,
    /// Mark a goal done for today, or undo it.
    Toggle {
        /// Goal id or a unique id prefix.
        id: String,
    },
    /// Delete a goal and its history.
    Delete {
        /// Goal id or a unique id prefix.
        id: String,
    },
    /// Run the daily rollover check once.
    Rollover,
    /// Keep running and check for a new day periodically.
    Watch {
        /// Seconds between checks (overrides GOALTRACK_ROLLOVER_SECS).
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn parse_scope(value: &str) -> Result<RolloverPolicy, String> {
    parse_reset_scope(value).ok_or_else(|| format!("unknown reset scope `{value}`; expected all|daily"))
}
