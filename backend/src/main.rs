mod config;
mod routes;
mod services;

use anyhow::Context;
use rentledger::stat::{Estate, load_estate_json, save_estate_json};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::BackendConfig;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let config = BackendConfig::from_env()?;

    let estate = initial_estate(&config)?;
    info!(
        properties = estate.properties.len(),
        tenants = estate.tenants.len(),
        "estate ready"
    );
    let state = AppState::new(estate);
    let app = routes::app().with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(path) = &config.snapshot {
        let estate = state.estate.read().await;
        save_estate_json(path, &estate)
            .with_context(|| format!("saving snapshot to {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }
    Ok(())
}

fn initial_estate(config: &BackendConfig) -> anyhow::Result<Estate> {
    if let Some(path) = config.snapshot.as_ref().filter(|p| p.exists()) {
        return load_estate_json(path).with_context(|| format!("loading snapshot {}", path.display()));
    }
    if config.seed_demo {
        return Ok(Estate::build_demo_estate());
    }
    warn!("starting with an empty estate");
    Ok(Estate::with_landlord("Default Landlord"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
    }
    info!("shutting down");
}
