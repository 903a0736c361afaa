mod gateway;

pub use gateway::WaGateway;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::storage::StorageClient;

/// Outstanding notifications are capped; beyond this the newest are dropped.
const QUEUE_CAPACITY: usize = 32;

/// One report fan-out job. With an object key the dispatcher sends the photo
/// with the message as caption, otherwise a plain text message.
#[derive(Debug, Clone)]
pub struct ReportNotice {
    pub destination: String,
    pub message: String,
    pub object_key: Option<String>,
}

/// Handle to the background notification dispatcher. Cloneable, cheap, held
/// in `AppState`. Enqueueing never blocks and never fails the caller.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<ReportNotice>,
}

impl Notifier {
    /// Spawn the dispatcher task and return a handle to its queue.
    pub fn spawn(gateway: WaGateway, storage: Arc<dyn StorageClient>) -> Self {
        let (tx, mut rx) = mpsc::channel::<ReportNotice>(QUEUE_CAPACITY);
        tokio::spawn(async move {
            while let Some(notice) = rx.recv().await {
                match deliver(&gateway, storage.as_ref(), &notice).await {
                    Ok(()) => info!(destination = %notice.destination, "notification sent"),
                    Err(e) => {
                        // Best-effort contract: log and move on, no retry.
                        warn!(error = %e, destination = %notice.destination, "notification failed");
                    }
                }
            }
        });
        Self { tx }
    }

    /// Handle whose jobs go nowhere. Used by tests.
    #[cfg(test)]
    pub fn disabled() -> Self {
        let (tx, _rx) = mpsc::channel(1);
        Self { tx }
    }

    pub fn enqueue(&self, notice: ReportNotice) {
        if self.tx.try_send(notice).is_err() {
            warn!("notification queue full or closed, dropping notice");
        }
    }
}

async fn deliver(
    gateway: &WaGateway,
    storage: &dyn StorageClient,
    notice: &ReportNotice,
) -> anyhow::Result<()> {
    match &notice.object_key {
        Some(key) => {
            // Fetch the photo through the storage client rather than the
            // public URL, keeping the round-trip inside the cluster.
            let image = storage.get_object(key).await?;
            gateway
                .send_image(&notice.destination, &notice.message, image)
                .await
        }
        None => gateway.send_text(&notice.destination, &notice.message).await,
    }
}
