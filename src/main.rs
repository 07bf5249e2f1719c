use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use client::ApiClient;
use config::{Args, Config};
use metrics::CovidMetrics;
use refresh::Refresher;
use server::AppState;

mod client;
mod config;
mod constants;
mod disease;
mod error;
mod metrics;
mod refresh;
mod server;
mod vaccination;

#[cfg(test)]
mod testutil;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from(Args::parse());

    info!("starting prometheus COVID exporter v{}", env!("CARGO_PKG_VERSION"));
    info!("  - listen: {}", config.listen);
    info!("  - delay: {:?}", config.delay);
    info!("  - country: {} (national label {:?})", config.country, config.national_label);

    let metrics = Arc::new(CovidMetrics::new().context("failed to register metrics")?);
    let client = ApiClient::new(&config.disease_url, &config.vaccination_url);

    let refresher = Refresher::new(client.clone(), metrics.clone(), &config);
    refresher
        .refresh()
        .await
        .context("initial data refresh failed")?;
    info!("initial data refresh complete");

    let refresh_task = tokio::spawn(refresher.run(config.delay));
    let app_state = AppState { metrics, client };

    tokio::select! {
        served = server::serve(config.listen, app_state, shutdown_signal()) => {
            served.context("metrics server failed")?;
        }
        refreshed = refresh_task => {
            refreshed
                .context("refresh task aborted")?
                .context("data refresh failed")?;
        }
    }

    Ok(())
}
