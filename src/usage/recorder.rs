//! Usage Log Worker Pool
//!
//! Handlers hand a `UsageEntry` to the recorder and return their response
//! straight away. A fixed number of background workers drain the shared
//! channel and persist each entry through the store.
//!
//! ## Responsibilities
//! - **Enqueueing**: `record` never blocks and never fails the request.
//! - **Persistence**: workers call `QuoteStore::record_usage`; failures are logged and dropped.
//! - **Shutdown**: `shutdown` closes the channel and waits for queued entries to be written.

use super::types::UsageEntry;
use crate::storage::store::QuoteStore;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

pub struct UsageRecorder {
    sender: std::sync::Mutex<Option<mpsc::UnboundedSender<UsageEntry>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    persisted: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
}

impl UsageRecorder {
    /// Spawns `worker_count` workers (at least one) writing into `store`.
    pub fn start(store: Arc<dyn QuoteStore>, worker_count: usize) -> Arc<Self> {
        let worker_count = worker_count.max(1);
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver = Arc::new(Mutex::new(receiver));
        let persisted = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));

        let workers = (0..worker_count)
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    store.clone(),
                    receiver.clone(),
                    persisted.clone(),
                    failed.clone(),
                ))
            })
            .collect();

        tracing::info!("Usage recorder started with {} workers", worker_count);

        Arc::new(Self {
            sender: std::sync::Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            persisted,
            failed,
        })
    }

    /// Queues an entry for persistence.
    pub fn record(&self, entry: UsageEntry) {
        let Ok(guard) = self.sender.lock() else {
            tracing::error!("Usage recorder lock poisoned, dropping entry {}", entry.id);
            return;
        };

        match guard.as_ref() {
            Some(sender) => {
                if let Err(e) = sender.send(entry) {
                    tracing::warn!("Usage recorder closed, dropping entry {}", e.0.id);
                }
            }
            None => {
                tracing::warn!("Usage recorder shut down, dropping entry {}", entry.id);
            }
        }
    }

    /// Number of entries written so far.
    pub fn persisted_count(&self) -> usize {
        self.persisted.load(Ordering::SeqCst)
    }

    pub fn failed_count(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Stops accepting entries and waits until every queued one is handled.
    pub async fn shutdown(&self) {
        if let Ok(mut guard) = self.sender.lock() {
            guard.take();
        }

        let handles: Vec<JoinHandle<()>> = self.workers.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Usage worker terminated abnormally: {}", e);
            }
        }

        tracing::info!(
            "Usage recorder stopped ({} persisted, {} failed)",
            self.persisted_count(),
            self.failed_count()
        );
    }
}

async fn worker_loop(
    worker_id: usize,
    store: Arc<dyn QuoteStore>,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<UsageEntry>>>,
    persisted: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
) {
    tracing::debug!("Usage worker {} started", worker_id);

    loop {
        // Hold the receiver only while waiting so the other workers can write.
        let next = receiver.lock().await.recv().await;
        let Some(entry) = next else {
            break;
        };

        match store.record_usage(&entry).await {
            Ok(()) => {
                persisted.fetch_add(1, Ordering::SeqCst);
                tracing::trace!(
                    "Worker {} logged {} {} -> {}",
                    worker_id,
                    entry.method,
                    entry.endpoint,
                    entry.status
                );
            }
            Err(e) => {
                failed.fetch_add(1, Ordering::SeqCst);
                tracing::error!("Failed to persist usage entry {}: {}", entry.id, e);
            }
        }
    }

    tracing::debug!("Usage worker {} stopped", worker_id);
}
