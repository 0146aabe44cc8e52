//! Command line arguments

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(short, long)]
    pub ui: Option<Ui>,

    /// Seed for the deal and the bots, for reproducible games.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of games to play in auto mode.
    #[arg(short, long, default_value_t = 1)]
    pub games: u32,

    /// How long bots think before acting, in milliseconds.
    #[arg(long)]
    pub think_ms: Option<u64>,

    /// How long announcements stay up, in milliseconds.
    #[arg(long)]
    pub announce_ms: Option<u64>,

    /// Seconds each player has to bid.
    #[arg(long)]
    pub bid_timer: Option<u32>,

    /// Log filter, such as "debug" or "threespades=trace". Defaults to RUST_LOG, or "warn".
    #[arg(long)]
    pub log_level: Option<String>,

    /// Dump the final game state as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Ui {
    /// Play against three bots.
    #[default]
    Console,
    /// Watch bots play each other.
    Auto,
}
