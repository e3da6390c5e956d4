//! Battery relay entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use battery_relay::api::{self, AppState};
use battery_relay::config::Config;
use battery_relay::metrics;
use battery_relay::store::StatusStore;

/// Relay that keeps a phone's latest battery report and serves it over HTTP.
#[derive(Parser, Debug)]
#[command(name = "battery-relay")]
#[command(about = "Store a phone's latest battery report and serve it over HTTP")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Address to bind (overrides LISTEN_HOST).
    #[arg(long)]
    host: Option<String>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Address to bind (overrides LISTEN_HOST).
        #[arg(long)]
        host: Option<String>,

        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Serve { host, port }) => cmd_serve(args.verbose, host, port).await,
        None => cmd_serve(args.verbose, args.host, args.port).await,
    }
}

/// Initialize the tracing subscriber from configuration.
fn init_logging(config: &Config) {
    let filter = if config.verbose {
        EnvFilter::new("battery_relay=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let json = config.is_json_logging();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("BATTERY RELAY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen Address: {}", config.listen_addr());
    println!("  Timestamp Format: {}", config.timestamp_format);
    println!("  Log Level: {}", config.rust_log);
    println!("  Log Format: {}", config.log_format);
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server.
async fn cmd_serve(verbose: bool, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    // Override with CLI args if provided
    if let Some(host) = host {
        config.listen_host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config.verbose |= verbose;

    init_logging(&config);

    config.validate().map_err(|e| {
        error!("{}", e);
        e
    })?;

    let timestamp_format = config.timestamp_format()?;
    info!("Timestamp format: {}", timestamp_format);

    let mut state = AppState::new(StatusStore::new(timestamp_format));
    if config.metrics_enabled {
        let handle = metrics::install_prometheus()?;
        state = state.with_metrics(handle);
        info!("Metrics exposed on /metrics");
    }

    let listener = api::bind(&config.listen_host, config.port).await?;
    api::serve(listener, state).await?;

    Ok(())
}
