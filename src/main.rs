use anyhow::{Context, Result};
use clap::Parser;
use langbase::cli::{self, Cli};
use langbase::{Config, LogLevel, Runtime};

fn main() -> Result<()> {
    let args = Cli::parse();

    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config (applied below).
    langbase::debug::init_log_bridge(args.log_level.map(LogLevel::to_level_filter));

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;
    langbase::debug::apply_config_level(config.log_level.to_level_filter());

    let runtime = Runtime::from_config(&config)?;
    let status = match cli::run(&runtime, &args.command, &mut std::io::stdout().lock()) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("langbase: error: {e:#}");
            1
        }
    };

    // Exit through the shutdown sequence; this only returns on a fatal hook error.
    match runtime.exit(status)? {}
}
