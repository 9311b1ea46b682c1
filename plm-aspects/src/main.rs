//! plm-aspects - category aspect requirement service
//!
//! `plm-aspects [serve]` runs the HTTP API (default 127.0.0.1:5740).
//! `plm-aspects clean-voltages` normalizes one coil voltage per input line
//! and writes JSON lines to stdout.
//! `plm-aspects set-token` stores the taxonomy bearer token in the config file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::info;

use plm_aspects::config::{
    load_service_config, resolve_taxonomy_token, store_taxonomy_token, TOKEN_ENV_VAR,
};
use plm_aspects::services::voltage_normalizer;
use plm_aspects::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "plm-aspects", version, about = "Category aspect requirement service")]
struct Cli {
    /// Config file (overrides PLM_CONFIG and the default location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bind address, overrides [server] bind_addr
    #[arg(long, env = "PLM_BIND_ADDR", global = true)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Normalize coil voltages, one per line
    CleanVoltages {
        /// Input file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Store the taxonomy bearer token in the config file
    SetToken {
        #[arg(long, env = TOKEN_ENV_VAR, hide_env_values = true)]
        token: String,
    },
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_service_config(cli.config.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(&loaded.config.logging.level);

    info!(
        "Starting plm-aspects v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("PLM_GIT_HASH"),
        env!("PLM_BUILD_TIMESTAMP"),
        env!("PLM_BUILD_PROFILE")
    );
    match &loaded.path {
        Some(path) => info!("Config: {}", path.display()),
        None => info!("Config: built-in defaults"),
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&loaded.config, cli.bind).await,
        Command::CleanVoltages { input } => clean_voltages(input),
        Command::SetToken { token } => {
            let path = loaded
                .path
                .context("No config file location; pass --config or set PLM_CONFIG")?;
            store_taxonomy_token(&token, &path)?;
            Ok(())
        }
    }
}

async fn serve(config: &plm_common::config::TomlConfig, bind: Option<String>) -> Result<()> {
    let token = resolve_taxonomy_token(config);
    let state = AppState::from_config(config, token)?;

    info!(
        "Taxonomy: {} (tree {}, marketplace {}), cache TTL {}h",
        config.taxonomy.base_url,
        config.taxonomy.category_tree_id,
        config.taxonomy.marketplace_id,
        config.cache.ttl_hours
    );

    let app = build_router(state);

    let bind_addr = bind.unwrap_or_else(|| config.server.bind_addr.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn clean_voltages(input: Option<PathBuf>) -> Result<()> {
    let reader: Box<dyn BufRead> = match &input {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let stdout = std::io::stdout();
    let report = voltage_normalizer::clean_lines(reader, stdout.lock())
        .context("Voltage cleaning failed")?;

    info!(
        total = report.results.len(),
        high = report.high_confidence,
        low = report.low_confidence,
        "Voltage cleaning complete"
    );

    Ok(())
}
