#![forbid(unsafe_code)]

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use verdant_cards::CardCache;
use verdant_core::{ExitCode, ENV_VERDANT_LOG};
use verdant_query::{FixtureData, FixtureSource};
use verdant_registry::Registry;
use verdant_server::{build_router, AppState, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "verdant-server", version, about = "Registry-driven entity graph service")]
struct Args {
    /// Registry bootstrap directory; repeat for multiple roots in
    /// precedence order.
    #[arg(long = "registry-dir", value_name = "DIR")]
    registry_dir: Vec<PathBuf>,

    /// Listen address, host:port.
    #[arg(long, value_name = "ADDR")]
    listen: Option<String>,

    /// JSON file of fixture instances to serve through the instance port.
    #[arg(long = "instance-fixtures", value_name = "FILE")]
    instance_fixtures: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_VERDANT_LOG)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_fixture_source(path: Option<&PathBuf>) -> Result<FixtureSource, String> {
    let Some(path) = path else {
        return Ok(FixtureSource::new());
    };
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let data: FixtureData = serde_json::from_str(&raw)
        .map_err(|e| format!("invalid fixture file {}: {e}", path.display()))?;
    Ok(FixtureSource::from_data(data))
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args = Args::parse();
    let mut config = ServerConfig::from_env();
    if !args.registry_dir.is_empty() {
        config.registry_dirs = args.registry_dir;
    }
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    if args.instance_fixtures.is_some() {
        config.instance_fixtures = args.instance_fixtures;
    }

    // Fail loud at boot: a registry problem must never produce a
    // half-ready process.
    let registry = match Registry::bootstrap(config.registry_dirs.clone()) {
        Ok(registry) => Arc::new(registry),
        Err(err) => {
            error!("registry bootstrap failed: {err}");
            process::exit(ExitCode::Validation as i32);
        }
    };
    let cards = match CardCache::build(&registry) {
        Ok(cards) => Arc::new(cards),
        Err(err) => {
            error!("entity card build failed: {err}");
            process::exit(ExitCode::Validation as i32);
        }
    };
    let source = match load_fixture_source(config.instance_fixtures.as_ref()) {
        Ok(source) => Arc::new(source),
        Err(message) => {
            error!("{message}");
            process::exit(ExitCode::Usage as i32);
        }
    };

    let state = AppState::new(registry, cards, source);
    let router = build_router(state);

    let listener = match TcpListener::bind(&config.listen).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("cannot bind {}: {err}", config.listen);
            process::exit(ExitCode::Internal as i32);
        }
    };
    info!(listen = %config.listen, "serving");
    if let Err(err) = axum::serve(listener, router).await {
        error!("server terminated: {err}");
        process::exit(ExitCode::Internal as i32);
    }
}
