//! CLI module - Command-line interface for Kalendarr
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::dates::parse_date;

/// Kalendarr - Episode Release Calendar
/// Tracks weekly (or any cadence) releases of the series you follow
#[derive(Parser)]
#[command(name = "kalendarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn date_arg(text: &str) -> Result<NaiveDate, String> {
    parse_date(text).map_err(|e| e.to_string())
}

#[derive(Subcommand)]
pub enum Commands {
    /// Track a new series
    #[command(alias = "a")]
    Add {
        /// Source link; aniworld stream links prefill title, season and episode
        source_url: String,
        /// Display title
        #[arg(long)]
        title: Option<String>,
        /// Season number
        #[arg(long)]
        season: Option<u32>,
        /// Episode released on the start date
        #[arg(long)]
        episode_start: Option<u32>,
        /// Last episode of the series
        #[arg(long)]
        max_episodes: Option<u32>,
        /// Days between releases
        #[arg(long)]
        interval: Option<u32>,
        /// Date of the first tracked release (default: today)
        #[arg(long, value_parser = date_arg)]
        start_date: Option<NaiveDate>,
    },

    /// List all tracked series
    #[command(alias = "ls", alias = "l")]
    List,

    /// Change fields of a tracked series
    #[command(alias = "edit")]
    Update {
        /// Series ID (or unique prefix)
        id: String,
        #[arg(long, conflicts_with = "clear_title")]
        title: Option<String>,
        /// Remove the display title
        #[arg(long)]
        clear_title: bool,
        #[arg(long)]
        source_url: Option<String>,
        #[arg(long)]
        season: Option<u32>,
        #[arg(long)]
        episode_start: Option<u32>,
        #[arg(long, conflicts_with = "unbounded")]
        max_episodes: Option<u32>,
        /// Remove the episode cap
        #[arg(long)]
        unbounded: bool,
        #[arg(long)]
        interval: Option<u32>,
        #[arg(long, value_parser = date_arg)]
        start_date: Option<NaiveDate>,
    },

    /// Stop tracking a series
    #[command(alias = "rm", alias = "r")]
    Remove {
        /// Series ID (or unique prefix)
        id: String,
    },

    /// List upcoming and recent releases
    #[command(alias = "e")]
    Events {
        /// First day to include (default: configured window)
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,
        /// Last day to include (default: configured window)
        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,
        /// Hide releases already marked as watched
        #[arg(long)]
        unwatched: bool,
    },

    /// Show a month as a calendar grid
    #[command(alias = "cal")]
    Calendar {
        /// Year (default: current)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (default: current)
        #[arg(long)]
        month: Option<u32>,
    },

    /// Mark a release as watched
    #[command(alias = "w")]
    Watch {
        /// Event ID as printed by `events`
        event_id: String,
    },

    /// Remove the watched mark from a release
    Unwatch {
        /// Event ID as printed by `events`
        event_id: String,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
