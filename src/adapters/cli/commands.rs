//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the gradscan screener.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use super::format::{format_currency, render_tiers};
use crate::adapters::web::{self, TokensApiResponse};
use crate::application::SnapshotService;
use crate::config::{load_or_default, Config};

/// gradscan - Graduated Pump.fun token screener
#[derive(Parser, Debug)]
#[command(
    name = "gradscan",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Graduated Pump.fun token screener",
    long_about = "gradscan aggregates recently graduated Pump.fun tokens from GeckoTerminal and \
                  DexScreener, merges duplicates, fills in missing images and serves a cached, \
                  market-cap sorted snapshot."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch one snapshot and print it grouped by tier
    Snapshot(SnapshotCmd),

    /// Serve the snapshot at GET /api/tokens
    Serve(ServeCmd),

    /// Print the configured market cap tiers
    Tiers,

    /// Load and validate the configuration
    CheckConfig,
}

/// Fetch and print one snapshot
#[derive(Parser, Debug)]
pub struct SnapshotCmd {
    /// Print the JSON envelope instead of tables
    #[arg(long)]
    pub json: bool,
}

/// Start the HTTP endpoint
#[derive(Parser, Debug)]
pub struct ServeCmd {
    /// Override bind host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Override bind port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,
}

/// Load the configuration named on the command line, or the defaults
pub fn load_app_config(app: &CliApp) -> Result<Config> {
    load_or_default(app.config.as_ref()).context("Failed to load configuration")
}

/// Execute the parsed command against a loaded configuration
pub async fn execute(app: CliApp, config: Config) -> Result<()> {
    match app.command {
        Command::Snapshot(cmd) => snapshot_command(&config, cmd).await,
        Command::Serve(cmd) => serve_command(&config, cmd).await,
        Command::Tiers => tiers_command(&config),
        Command::CheckConfig => check_config_command(&config, app.config.as_ref()),
    }
}

async fn snapshot_command(config: &Config, cmd: SnapshotCmd) -> Result<()> {
    let tiers = config.tier_table()?;
    let service = SnapshotService::from_config(config).context("Failed to create snapshot service")?;

    tracing::info!("Fetching graduated tokens...");
    let snapshot = service.get_snapshot().await.context("Failed to fetch token data")?;

    if cmd.json {
        let response = TokensApiResponse::success(snapshot.tokens.clone(), snapshot.computed_at.timestamp_millis());
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "{} graduated tokens as of {}",
        snapshot.tokens.len(),
        snapshot.computed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    print!("{}", render_tiers(&tiers.group(&snapshot.tokens), service.now()));
    Ok(())
}

async fn serve_command(config: &Config, cmd: ServeCmd) -> Result<()> {
    let mut server = config.server.clone();
    if let Some(host) = cmd.host {
        server.host = host;
    }
    if let Some(port) = cmd.port {
        server.port = port;
    }

    let service = Arc::new(SnapshotService::from_config(config).context("Failed to create snapshot service")?);
    web::serve(&server.bind_address(), service).await?;
    Ok(())
}

fn tiers_command(config: &Config) -> Result<()> {
    let tiers = config.tier_table()?;

    println!("{:<8} {:<16} {:>10} {:>10}  COLOR", "ID", "LABEL", "FROM", "TO");
    for tier in tiers.tiers() {
        let to = tier.max_cap.map_or_else(|| "-".to_string(), format_currency);
        println!(
            "{:<8} {:<16} {:>10} {:>10}  {}",
            tier.id,
            tier.label,
            format_currency(tier.min_cap),
            to,
            tier.color
        );
    }
    Ok(())
}

fn check_config_command(config: &Config, path: Option<&PathBuf>) -> Result<()> {
    config.validate()?;

    match path {
        Some(path) => println!("Configuration OK: {}", path.display()),
        None => println!("Configuration OK (built-in defaults)"),
    }
    println!(
        "  GeckoTerminal: {} trending + {} per-DEX x{} + {} new pool pages, {} ms apart",
        config.geckoterminal.trending_pages,
        config.geckoterminal.dex_pages,
        config.geckoterminal.dexes.len(),
        config.geckoterminal.new_pool_pages,
        config.geckoterminal.request_interval_ms
    );
    println!(
        "  DexScreener: {} boosts, {} search terms",
        config.dexscreener.boost_limit,
        config.dexscreener.search_terms.len()
    );
    println!(
        "  Eligibility: {} | {}-{} mcap | >= {} liquidity | {} days",
        config.eligibility.chain,
        format_currency(config.eligibility.min_market_cap),
        format_currency(config.eligibility.max_market_cap),
        format_currency(config.eligibility.min_liquidity),
        config.eligibility.max_age_days
    );
    println!("  Cache TTL: {}s", config.cache.ttl_secs);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot_json() {
        let app = CliApp::try_parse_from(["gradscan", "snapshot", "--json"]).unwrap();
        assert!(matches!(app.command, Command::Snapshot(SnapshotCmd { json: true })));
        assert!(app.config.is_none());
    }

    #[test]
    fn test_parse_serve_with_global_flags() {
        let app = CliApp::try_parse_from(["gradscan", "serve", "--port", "8080", "-c", "~/gradscan.toml", "--debug"])
            .unwrap();
        let Command::Serve(cmd) = app.command else {
            panic!("expected serve");
        };
        assert_eq!(cmd.port, Some(8080));
        assert!(cmd.host.is_none());
        assert_eq!(app.config, Some(PathBuf::from("~/gradscan.toml")));
        assert!(app.debug);
    }

    #[test]
    fn test_parse_check_config() {
        let app = CliApp::try_parse_from(["gradscan", "check-config"]).unwrap();
        assert!(matches!(app.command, Command::CheckConfig));
    }

    #[test]
    fn test_default_config_loads() {
        let app = CliApp::try_parse_from(["gradscan", "tiers"]).unwrap();
        let config = load_app_config(&app).unwrap();
        assert!(tiers_command(&config).is_ok());
    }
}
