//! # Snapshot Persistence
//!
//! Writes cart snapshots to key-value storage without making the caller
//! wait.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Snapshot Persistence                               │
//! │                                                                         │
//! │  CartStore mutation                                                     │
//! │       │  encode_cart(&snapshot)                                         │
//! │       ▼                                                                 │
//! │  Persister::persist ──┬── Queued:   mpsc ──► WriteQueue (one task)      │
//! │                       │                      coalesces to latest blob   │
//! │                       │                                                 │
//! │                       └── Detached: tokio::spawn per write              │
//! │                                      InFlight counts pending tasks      │
//! │                                                                         │
//! │  Failures are logged at ERROR and dropped. Nothing is retried.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use gomarket_core::{encode_cart, Cart};
use gomarket_storage::KeyValueStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, Notify};
use tracing::{debug, error, warn};

use crate::config::PersistMode;

// =============================================================================
// Persister
// =============================================================================

/// Hands encoded snapshots to storage in the background.
pub(crate) struct Persister {
    key: Arc<str>,
    mode: Mode,
}

enum Mode {
    Queued(mpsc::UnboundedSender<WriteCommand>),
    Detached {
        storage: Arc<dyn KeyValueStore>,
        handle: Handle,
        in_flight: Arc<InFlight>,
    },
}

impl Persister {
    /// Creates a persister. In queued mode this spawns the writer task on
    /// `handle`; the task exits once the persister is dropped.
    pub(crate) fn new(
        storage: Arc<dyn KeyValueStore>,
        key: impl Into<Arc<str>>,
        mode: PersistMode,
        handle: Handle,
    ) -> Self {
        let key = key.into();

        let mode = match mode {
            PersistMode::Queued => {
                let (tx, rx) = mpsc::unbounded_channel();
                let queue = WriteQueue {
                    storage,
                    key: key.clone(),
                    rx,
                };
                handle.spawn(queue.run());
                Mode::Queued(tx)
            }
            PersistMode::Detached => Mode::Detached {
                storage,
                handle,
                in_flight: Arc::new(InFlight::default()),
            },
        };

        Persister { key, mode }
    }

    /// Schedules a write of `cart`. Returns immediately.
    pub(crate) fn persist(&self, cart: &Cart) {
        let blob = match encode_cart(cart) {
            Ok(blob) => blob,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to encode cart, snapshot not persisted");
                return;
            }
        };

        match &self.mode {
            Mode::Queued(tx) => {
                if tx.send(WriteCommand::Write(blob)).is_err() {
                    warn!(key = %self.key, "Cart writer has stopped, snapshot not persisted");
                }
            }
            Mode::Detached {
                storage,
                handle,
                in_flight,
            } => {
                let storage = Arc::clone(storage);
                let key = Arc::clone(&self.key);
                let guard = InFlight::begin(in_flight);

                handle.spawn(async move {
                    write_blob(storage.as_ref(), &key, &blob).await;
                    drop(guard);
                });
            }
        }
    }

    /// Waits until every write scheduled so far has finished.
    pub(crate) async fn flush(&self) {
        match &self.mode {
            Mode::Queued(tx) => {
                let (ack_tx, ack_rx) = oneshot::channel();
                if tx.send(WriteCommand::Flush(ack_tx)).is_err() {
                    return;
                }
                // A dropped ack means the writer is gone, nothing left to wait on.
                let _ = ack_rx.await;
            }
            Mode::Detached { in_flight, .. } => in_flight.wait_idle().await,
        }
    }
}

async fn write_blob(storage: &dyn KeyValueStore, key: &str, blob: &str) {
    match storage.set_item(key, blob).await {
        Ok(()) => debug!(key, bytes = blob.len(), "Cart snapshot persisted"),
        Err(e) => error!(key, error = %e, "Failed to persist cart snapshot"),
    }
}

// =============================================================================
// Queued Writer
// =============================================================================

enum WriteCommand {
    Write(String),
    Flush(oneshot::Sender<()>),
}

/// Single background writer. Writes land in the order they were queued.
struct WriteQueue {
    storage: Arc<dyn KeyValueStore>,
    key: Arc<str>,
    rx: mpsc::UnboundedReceiver<WriteCommand>,
}

impl WriteQueue {
    async fn run(mut self) {
        debug!(key = %self.key, "Cart writer started");

        while let Some(command) = self.rx.recv().await {
            let mut latest = None;
            let mut acks = Vec::new();

            match command {
                WriteCommand::Write(blob) => latest = Some(blob),
                WriteCommand::Flush(ack) => acks.push(ack),
            }

            // Only the newest queued snapshot matters; older ones are superseded.
            while let Ok(command) = self.rx.try_recv() {
                match command {
                    WriteCommand::Write(blob) => latest = Some(blob),
                    WriteCommand::Flush(ack) => acks.push(ack),
                }
            }

            if let Some(blob) = latest {
                write_blob(self.storage.as_ref(), &self.key, &blob).await;
            }

            for ack in acks {
                let _ = ack.send(());
            }
        }

        debug!(key = %self.key, "Cart writer stopped");
    }
}

// =============================================================================
// Detached Writes
// =============================================================================

/// Counts detached writes that have not finished yet.
#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

struct InFlightGuard(Arc<InFlight>);

impl InFlight {
    fn begin(this: &Arc<InFlight>) -> InFlightGuard {
        this.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(Arc::clone(this))
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomarket_core::{decode_cart, Product};
    use gomarket_storage::MemoryStore;

    fn cart_with(ids: &[&str]) -> Cart {
        let mut cart = Cart::new();
        for id in ids {
            cart.add(Product::new(*id, "Item", "https://img/x.png", 1.0));
        }
        cart
    }

    async fn stored(storage: &MemoryStore) -> Option<Cart> {
        storage
            .get_item("cart")
            .await
            .unwrap()
            .map(|raw| decode_cart(&raw).unwrap())
    }

    #[tokio::test]
    async fn test_queued_writes_end_on_latest_snapshot() {
        let storage = Arc::new(MemoryStore::new());
        let persister = Persister::new(
            storage.clone(),
            "cart",
            PersistMode::Queued,
            Handle::current(),
        );

        persister.persist(&cart_with(&["a"]));
        persister.persist(&cart_with(&["a", "b"]));
        persister.persist(&cart_with(&["a", "b", "c"]));
        persister.flush().await;

        assert_eq!(stored(&storage).await, Some(cart_with(&["a", "b", "c"])));
    }

    #[tokio::test]
    async fn test_detached_flush_waits_for_writes() {
        let storage = Arc::new(MemoryStore::new());
        let persister = Persister::new(
            storage.clone(),
            "cart",
            PersistMode::Detached,
            Handle::current(),
        );

        persister.persist(&cart_with(&["a"]));
        persister.flush().await;

        assert_eq!(stored(&storage).await, Some(cart_with(&["a"])));
    }

    #[tokio::test]
    async fn test_flush_with_nothing_pending() {
        let storage = Arc::new(MemoryStore::new());

        for mode in [PersistMode::Queued, PersistMode::Detached] {
            let persister = Persister::new(storage.clone(), "cart", mode, Handle::current());
            persister.flush().await;
        }

        assert!(storage.is_empty().await);
    }
}
