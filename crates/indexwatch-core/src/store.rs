//! Latest-snapshot holder.
//!
//! The store keeps one `Arc<Snapshot>` behind a `tokio::sync::watch` channel.
//! Publishing swaps the pointer; readers clone the `Arc` and never see rows
//! from two different cycles. Subscribers are woken on every publish and
//! always observe the newest snapshot (intermediate ones may be skipped).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::Snapshot;

pub type SnapshotReceiver = watch::Receiver<Option<Arc<Snapshot>>>;

#[derive(Debug)]
pub struct SnapshotStore {
    tx: watch::Sender<Option<Arc<Snapshot>>>,
    published: AtomicU64,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx,
            published: AtomicU64::new(0),
        }
    }

    /// Current snapshot, or `None` before the first cycle completes.
    pub fn read(&self) -> Option<Arc<Snapshot>> {
        self.tx.borrow().clone()
    }

    /// Atomically supersedes the current snapshot and wakes subscribers.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.tx.send_replace(Some(Arc::clone(&snapshot)));
        let published = self.published.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(
            cycle = snapshot.cycle(),
            published,
            receivers = self.tx.receiver_count(),
            "snapshot replaced"
        );
        snapshot
    }

    /// Number of snapshots published since the store was created.
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.tx.subscribe()
    }

    /// Runs `callback` on a background task for each newly published snapshot.
    ///
    /// The task ends when the store is dropped; abort the handle to stop early.
    pub fn on_snapshot_updated<F>(&self, mut callback: F) -> JoinHandle<()>
    where
        F: FnMut(Arc<Snapshot>) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let latest = rx.borrow_and_update().clone();
                if let Some(snapshot) = latest {
                    callback(snapshot);
                }
            }
        })
    }
}
