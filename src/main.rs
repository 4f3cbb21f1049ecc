use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Use the library instead of redeclaring modules
use inventory_intake::{
    config::Config,
    sheets::{MemorySink, RowSink, SheetsClient},
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "inventory-intake")]
#[command(version = "0.1.0")]
#[command(
    about = "A marketplace inventory intake service that normalizes listing text into spreadsheet rows"
)]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Log projected rows instead of appending to real destinations
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("inventory_intake={},tower_http=trace", cli.log_level)
    } else {
        format!("inventory_intake={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Inventory Intake Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration from specified file
    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    info!(
        "Configured destinations: {}",
        config
            .destinations
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let sink: Arc<dyn RowSink> = if cli.dry_run {
        info!("Dry-run mode: rows will be logged, not appended");
        Arc::new(MemorySink::new())
    } else {
        Arc::new(SheetsClient::new(
            config.sheets.api_base_url.clone(),
            config.sheets_token(),
            config.sheets.request_timeout_secs,
        )?)
    };

    let web_server = WebServer::new(config, sink).await?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
