//! Periodic self-ping keeping free-tier hosts from idling the service

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{info, warn};

const PING_TIMEOUT: Duration = Duration::from_secs(8);

/// Start pinging `url` every `every` until `shutdown` flips to true.
///
/// Returns `None` (and does nothing) when no URL is configured.
pub fn spawn(
    url: Option<String>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Option<JoinHandle<()>> {
    let url = url.filter(|u| !u.trim().is_empty())?;

    let client = match reqwest::Client::builder().timeout(PING_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Self-ping disabled, failed to build HTTP client: {}", e);
            return None;
        }
    };

    info!("Self-pinger enabled, pinging {} every {:?}", url, every);

    Some(tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + every, every);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match client.get(&url).send().await {
                        Ok(response) => info!("Self-ping status: {}", response.status()),
                        Err(e) => warn!("Self-ping error: {}", e),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Self-pinger stopped");
                        return;
                    }
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_without_url() {
        let (_tx, rx) = watch::channel(false);
        assert!(spawn(None, Duration::from_secs(60), rx.clone()).is_none());
        assert!(spawn(Some("  ".to_string()), Duration::from_secs(60), rx).is_none());
    }

    #[tokio::test]
    async fn test_stops_on_shutdown() {
        let (tx, rx) = watch::channel(false);
        let handle = spawn(
            Some("http://127.0.0.1:9/ping".to_string()),
            Duration::from_secs(3600),
            rx,
        )
        .unwrap();

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
