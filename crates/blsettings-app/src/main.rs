//! blade-settings command-line entry point.
//!
//! Validates property names, decodes theme color schemes and edits the
//! channel store. Run `blsettings help` for the command list.

mod commands;
mod config;

use std::io::{self, Write};

use anyhow::Result;

use blsettings_types::DebugDomains;
use commands::Invocation;
use config::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    let debug = DebugDomains::from_env() | DebugDomains::parse(&config.debug);

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = debug.log_filter() {
        logger.parse_filters(&filter);
    }
    logger.init();

    if !debug.is_empty() {
        log::debug!("Debug domains: {}", debug.names().join(", "));
    }
    log::debug!("Channel store: {}", config.store_path.display());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ctx = Invocation {
        config: &config,
        debug,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(&args, &ctx, &mut out)?;
    out.flush()?;
    Ok(())
}
