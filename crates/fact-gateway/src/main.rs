//! fact-hub: FACT Competition Hub main binary
//!
//! Usage:
//!   fact-hub                      - Start server mode (HTTP API)
//!   fact-hub --cli                - Start interactive CLI mode
//!   fact-hub --calendar 2025-11   - Print one month and exit
//!   fact-hub --help               - Show help

mod cli;
mod render;

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use fact_calendar::MonthView;
use fact_core::{AppController, Catalog, Config, Hub, LlmClient, TeamBoard, TypingDelay};
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq, Eq)]
enum RunMode {
    /// Server mode (HTTP API)
    Server,
    /// Interactive CLI mode
    Cli,
    /// Print a month calendar
    Calendar(Option<MonthView>),
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = parse_args(&args)?;

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("fact-hub {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // env > fact-hub.toml > defaults
    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    let catalog = Catalog::load(config.catalog.path.as_deref().map(Path::new))
        .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?;

    tracing::info!("Starting fact-hub...");
    tracing::info!("Catalog: {} competitions", catalog.len());
    tracing::info!("Model: {} ({:?})", config.llm.model, config.llm.provider);

    let start_month = config.start_month()?;

    if let RunMode::Calendar(month) = mode {
        let controller = AppController::new(catalog, TeamBoard::new(), start_month);
        let grid = controller.calendar_for(month.unwrap_or(start_month));
        println!("{}", render::calendar(&grid, Local::now().date_naive()));
        return Ok(());
    }

    let client = LlmClient::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?;
    if !client.has_api_key() {
        tracing::warn!("No LLM API key configured; chat replies will use fallback messages");
    }

    let controller = AppController::new(catalog, TeamBoard::with_samples(), start_month);
    let hub = Hub::new(controller, Arc::new(client), TypingDelay::new(config.chat.clone()));

    match mode {
        RunMode::Cli => {
            tracing::info!("Running in CLI mode");
            cli::run_cli(hub).await
        }
        RunMode::Server => run_server(config, hub).await,
        _ => Ok(()),
    }
}

/// Parse command line arguments
fn parse_args(args: &[String]) -> anyhow::Result<RunMode> {
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--cli" | "-c" => return Ok(RunMode::Cli),
            "--help" | "-h" => return Ok(RunMode::Help),
            "--version" | "-v" => return Ok(RunMode::Version),
            "--calendar" => {
                let month = match iter.next() {
                    Some(value) => Some(
                        value
                            .parse::<MonthView>()
                            .map_err(|e| anyhow::anyhow!("--calendar: {}", e))?,
                    ),
                    None => None,
                };
                return Ok(RunMode::Calendar(month));
            }
            _ => {}
        }
    }

    Ok(RunMode::Server)
}

/// Print help message
fn print_help() {
    println!("fact-hub - FACT Competition Hub");
    println!();
    println!("Usage:");
    println!("  fact-hub                     Start server mode (HTTP API)");
    println!("  fact-hub --cli               Start interactive CLI mode");
    println!("  fact-hub --calendar YYYY-MM  Print the competitions of one month");
    println!("  fact-hub --help              Show this help message");
    println!("  fact-hub --version           Show version");
    println!();
    println!("Environment Variables:");
    println!("  LLM_API_KEY          API key (GEMINI_API_KEY also accepted)");
    println!("  LLM_MODEL            Model name (default: gemini-2.5-flash)");
    println!("  LLM_PROVIDER         Provider: gemini or openai (default: gemini)");
    println!("  LLM_BASE_URL         Custom API endpoint");
    println!("  API_HOST             HTTP API bind address (default: 127.0.0.1)");
    println!("  API_PORT             HTTP API port (default: 3000)");
    println!("  API_ALLOWED_ORIGINS  Comma separated CORS origins");
    println!("  CALENDAR_START       First month shown, YYYY-MM (default: 2025-10)");
    println!("  CATALOG_PATH         TOML file replacing the built-in catalog");
    println!("  CHAT_DELAYS          Set to false to disable typing delays");
}

/// Run server mode (HTTP API)
async fn run_server(config: Config, hub: Hub) -> anyhow::Result<()> {
    let api_port = config.api.port;

    let handle = tokio::spawn(async move {
        if let Err(e) = fact_api::start_server(config, hub).await {
            tracing::error!("HTTP API error: {}", e);
        }
    });
    tracing::info!("HTTP API server started on port {}", api_port);

    tracing::info!("fact-hub initialized successfully");
    tracing::info!("Press Ctrl+C to exit");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    handle.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(&args(&[])).unwrap(), RunMode::Server);
        assert_eq!(parse_args(&args(&["--cli"])).unwrap(), RunMode::Cli);
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), RunMode::Help);
        assert_eq!(parse_args(&args(&["--version"])).unwrap(), RunMode::Version);
        assert_eq!(
            parse_args(&args(&["--calendar", "2025-11"])).unwrap(),
            RunMode::Calendar(Some(MonthView::new(2025, 11).unwrap()))
        );
        assert_eq!(parse_args(&args(&["--calendar"])).unwrap(), RunMode::Calendar(None));
        assert!(parse_args(&args(&["--calendar", "Nov"])).is_err());
    }
}
