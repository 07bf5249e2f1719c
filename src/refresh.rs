use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::metrics::CovidMetrics;

/// Pulls both upstream APIs and writes the results into the gauges.
pub(crate) struct Refresher {
    client: ApiClient,
    metrics: Arc<CovidMetrics>,
    country: String,
    allow_null: bool,
    national_label: String,
}

impl Refresher {
    pub(crate) fn new(client: ApiClient, metrics: Arc<CovidMetrics>, config: &Config) -> Self {
        Refresher {
            client,
            metrics,
            country: config.country.clone(),
            allow_null: config.allow_null,
            national_label: config.national_label.clone(),
        }
    }

    pub(crate) async fn refresh_disease(&self) -> Result<usize> {
        let rows = self
            .client
            .fetch_government_data(&self.country, self.allow_null)
            .await?;
        let updated = self.metrics.apply_disease(&rows, &self.national_label);
        debug!(regions = updated, "disease data refreshed");
        Ok(updated)
    }

    pub(crate) async fn refresh_vaccination(&self) -> Result<usize> {
        let data = self.client.fetch_vaccination_data().await?;
        let updated = self.metrics.apply_vaccination(&data, &self.national_label);
        debug!(regions = updated, "vaccination data refreshed");
        Ok(updated)
    }

    pub(crate) async fn refresh(&self) -> Result<()> {
        self.refresh_disease().await?;
        self.refresh_vaccination().await?;
        Ok(())
    }

    /// Refreshes every `delay`, starting one `delay` from now. Returns only on
    /// the first failed fetch.
    pub(crate) async fn run(self, delay: Duration) -> Result<()> {
        info!(delay = ?delay, "refresh loop started");
        let mut interval = interval_at(Instant::now() + delay, delay);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(e) = self.refresh().await {
                error!("refresh failed: {e}");
                return Err(e);
            }
        }
    }
}
