//! gradscan - Graduated Pump.fun token screener
//!
//! Aggregates GeckoTerminal and DexScreener into one cached snapshot.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use gradscan::adapters::cli::{self, CliApp};

#[tokio::main]
async fn main() -> Result<()> {
    let app = CliApp::parse();
    let config = cli::load_app_config(&app)?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    cli::execute(app, config).await
}

fn init_logging(verbose: bool, debug: bool, configured: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).init();
    Ok(())
}
