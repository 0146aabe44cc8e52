use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod deck;
mod french;
mod spades;
use self::args::{Args, Ui};
use self::spades::{auto_main, cli_main};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.ui.unwrap_or_default() {
        Ui::Console => cli_main(&args),
        Ui::Auto => auto_main(&args),
    }
}
