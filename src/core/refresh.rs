use crate::core::catalog::CatalogStore;
use crate::domain::ports::CatalogSource;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Periodically pulls a product list from a [`CatalogSource`] into a
/// [`CatalogStore`]. A failed pull keeps the last good snapshot.
pub struct CatalogRefresher {
    store: Arc<CatalogStore>,
    source: Arc<dyn CatalogSource>,
    interval: Duration,
}

impl CatalogRefresher {
    pub fn new(store: Arc<CatalogStore>, source: Arc<dyn CatalogSource>, interval: Duration) -> Self {
        Self {
            store,
            source,
            interval,
        }
    }

    /// Fetches once and installs the result. Returns the new snapshot version.
    pub async fn refresh_once(&self) -> Result<u64> {
        refresh_store(&self.store, self.source.as_ref()).await
    }

    /// Starts the refresh loop. The first pull happens immediately.
    pub fn spawn(self) -> RefreshHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        RefreshHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "🔄 Catalog refresh started: {} every {:?}",
            self.source.describe(),
            self.interval
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => break,
            }

            // 關閉訊號可打斷進行中的抓取；replace 為同步步驟，不會留下半套目錄
            tokio::select! {
                outcome = self.refresh_once() => {
                    if let Err(e) = outcome {
                        tracing::warn!(
                            "⚠️ Catalog refresh from {} failed, keeping version {}: {}",
                            self.source.describe(),
                            self.store.version(),
                            e
                        );
                    }
                }
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!("🛑 Catalog refresh stopped");
    }
}

/// Dropping the handle also stops the loop at its next wake-up.
pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Signals the loop to stop and waits for it. The current snapshot stays in place.
    pub async fn shutdown(self) {
        // 接收端已結束時 send 會失敗，可忽略
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::error!("Catalog refresh task ended abnormally: {}", e);
        }
    }
}

async fn refresh_store(store: &CatalogStore, source: &dyn CatalogSource) -> Result<u64> {
    tracing::debug!("Fetching catalog from {}", source.describe());
    let products = source.fetch_products().await?;
    Ok(store.replace(products))
}

/// One best-effort pull when the store is still empty. Returns whether the
/// store holds products afterwards; failures are logged, never returned.
pub async fn populate_if_empty(store: &CatalogStore, source: &dyn CatalogSource) -> bool {
    if !store.is_empty() {
        return true;
    }

    match refresh_store(store, source).await {
        Ok(_) => !store.is_empty(),
        Err(e) => {
            tracing::warn!(
                "⚠️ On-demand catalog load from {} failed: {}",
                source.describe(),
                e
            );
            false
        }
    }
}
