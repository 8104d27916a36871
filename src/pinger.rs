//! Keeps a hosted instance awake by periodically requesting its own `/_ping`.

use crate::config::PingerConfig;
use anyhow::Context;
use std::time::Duration;

/// `<service_url>/_ping`, ignoring a trailing slash.
pub fn ping_url(service_url: &str) -> String {
    format!("{}/_ping", service_url.trim_end_matches('/'))
}

/// Spawn the ping loop if a service URL is configured.
pub fn spawn(cfg: &PingerConfig) -> anyhow::Result<Option<tokio::task::JoinHandle<()>>> {
    let Some(service_url) = cfg.service_url.as_deref() else {
        return Ok(None);
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .build()
        .context("build reqwest client")?;
    let url = ping_url(service_url);
    let interval = Duration::from_secs(cfg.interval_secs.max(1));

    tracing::info!("self-pinger enabled: {url} every {}s", interval.as_secs());
    Ok(Some(tokio::spawn(ping_loop(client, url, interval))))
}

async fn ping_loop(client: reqwest::Client, url: String, interval: Duration) {
    loop {
        match client.get(&url).send().await {
            Ok(resp) => tracing::info!("[self-pinger] pinged {url} status={}", resp.status()),
            Err(e) => tracing::warn!("[self-pinger] ping failed: {e}"),
        }
        tokio::time::sleep(interval).await;
    }
}
