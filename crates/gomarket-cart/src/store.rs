//! # Cart Store
//!
//! The in-memory cart, its observable snapshot, and the hydrate-then-persist
//! lifecycle around it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CartStore Lifecycle                             │
//! │                                                                         │
//! │  CartStore::open(storage, &config)                                      │
//! │       │  snapshot = []          status = Hydrating                      │
//! │       │  spawn hydration ──────────────────────┐                        │
//! │       ▼                                        ▼                        │
//! │  returns immediately               get_item(key) → decode_cart          │
//! │                                    ok:    snapshot = stored cart        │
//! │                                    else:  stay empty (warn)             │
//! │                                    touched: discard stored cart (warn)  │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                    status = Ready                       │
//! │                                                                         │
//! │  add_to_cart / increment / decrement                                    │
//! │       │  next = f(&snapshot)   (None → no-op, snapshot untouched)       │
//! │       ▼                                                                 │
//! │  snapshot = Arc::new(next) ──► subscribers notified                     │
//! │                             ──► Persister::persist(next)  (background)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshots
//! `products()` hands out an `Arc<Cart>`. The `Arc` is replaced only when a
//! mutation actually changes the cart, so two reads with no change between
//! them are `Arc::ptr_eq`.

use gomarket_core::{decode_cart, Cart, CartTotals, Product};
use gomarket_storage::{Database, DbConfig, KeyValueStore, MemoryStore};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{CartConfig, StorageBackend};
use crate::error::{CartError, CartResult};
use crate::persist::Persister;

/// Where the store is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartStatus {
    /// The stored cart is still being read. The snapshot is empty or holds
    /// mutations made since open.
    Hydrating,

    /// Hydration finished (successfully or not).
    Ready,
}

/// Handle to the shopping cart.
///
/// Cheap to clone; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

struct Inner {
    key: String,
    state: watch::Sender<Arc<Cart>>,
    status: watch::Sender<CartStatus>,
    /// Set by the first mutation. A hydration that finishes later is discarded.
    touched: AtomicBool,
    persister: Persister,
}

impl CartStore {
    /// Opens a store over `storage` and starts hydrating it.
    ///
    /// Returns at once with an empty cart in `Hydrating` status. Must be
    /// called from within a tokio runtime.
    pub fn open(storage: Arc<dyn KeyValueStore>, config: &CartConfig) -> CartResult<Self> {
        config.validate()?;
        let handle = Handle::try_current().map_err(|_| CartError::NoRuntime)?;

        let persister = Persister::new(
            Arc::clone(&storage),
            config.storage_key.as_str(),
            config.persist_mode,
            handle.clone(),
        );

        let (state, _) = watch::channel(Arc::new(Cart::new()));
        let (status, _) = watch::channel(CartStatus::Hydrating);

        let inner = Arc::new(Inner {
            key: config.storage_key.clone(),
            state,
            status,
            touched: AtomicBool::new(false),
            persister,
        });

        info!(
            key = %inner.key,
            persist_mode = %config.persist_mode,
            "Cart store opened, hydrating"
        );

        handle.spawn(hydrate(Arc::clone(&inner), storage));

        Ok(CartStore { inner })
    }

    /// Builds the configured storage backend and opens a store over it.
    ///
    /// SQLite databases get their parent directory created and migrations
    /// applied before the store opens.
    pub async fn connect(config: &CartConfig) -> CartResult<Self> {
        config.validate()?;

        let storage: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::Sqlite => {
                let path = config.storage.resolve_database_path()?;
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                let db = Database::new(
                    DbConfig::new(path).max_connections(config.storage.max_connections),
                )
                .await?;
                Arc::new(db.key_values())
            }
            StorageBackend::Memory => {
                debug!("Using in-memory cart storage");
                Arc::new(MemoryStore::new())
            }
        };

        Self::open(storage, config)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product`, appending a new line if it isn't in the
    /// cart yet. Always changes the cart.
    pub fn add_to_cart(&self, product: Product) -> bool {
        let id = product.id.clone();
        self.mutate("add_to_cart", &id, move |cart| {
            let mut next = cart.clone();
            next.add(product);
            Some(next)
        })
    }

    /// Adds one unit to the line with `id`. Unknown ids are a no-op.
    pub fn increment(&self, id: &str) -> bool {
        self.mutate("increment", id, |cart| {
            if !cart.contains(id) {
                return None;
            }
            let mut next = cart.clone();
            next.increment(id).map(|_| next)
        })
    }

    /// Removes one unit from the line with `id`, dropping the line when its
    /// quantity reaches zero. Unknown ids are a no-op.
    pub fn decrement(&self, id: &str) -> bool {
        self.mutate("decrement", id, |cart| {
            if !cart.contains(id) {
                return None;
            }
            let mut next = cart.clone();
            next.decrement(id).map(|_| next)
        })
    }

    /// Applies `change` to the current cart. `None` leaves the snapshot and
    /// storage untouched.
    fn mutate<F>(&self, op: &'static str, id: &str, change: F) -> bool
    where
        F: FnOnce(&Cart) -> Option<Cart>,
    {
        let inner = &self.inner;

        // Persisting inside the watch lock keeps queued writes in mutation order.
        let changed = inner.state.send_if_modified(|current| {
            match change(current.as_ref()) {
                Some(next) => {
                    inner.touched.store(true, Ordering::SeqCst);
                    inner.persister.persist(&next);
                    *current = Arc::new(next);
                    true
                }
                None => false,
            }
        });

        if changed {
            debug!(op, id, "Cart updated");
        } else {
            debug!(op, id, "Item not in cart, nothing to do");
        }

        changed
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The current cart snapshot.
    pub fn products(&self) -> Arc<Cart> {
        Arc::clone(&self.inner.state.borrow())
    }

    /// Receiver that sees every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.inner.state.subscribe()
    }

    pub fn totals(&self) -> CartTotals {
        self.products().totals()
    }

    pub fn status(&self) -> CartStatus {
        *self.inner.status.borrow()
    }

    /// Waits until hydration has finished.
    pub async fn ready(&self) {
        let mut rx = self.inner.status.subscribe();
        // The sender lives in `inner`, which `self` keeps alive.
        let _ = rx.wait_for(|status| *status == CartStatus::Ready).await;
    }

    /// Waits until every snapshot written so far has reached storage.
    pub async fn flush(&self) {
        self.inner.persister.flush().await;
    }

    /// Storage key the cart is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("status", &self.status())
            .field("items", &self.products().len())
            .finish()
    }
}

/// Loads the stored cart into `inner`, then marks the store ready.
async fn hydrate(inner: Arc<Inner>, storage: Arc<dyn KeyValueStore>) {
    let stored = match storage.get_item(&inner.key).await {
        Ok(Some(raw)) => match decode_cart(&raw) {
            Ok(cart) => Some(cart),
            Err(e) => {
                warn!(key = %inner.key, error = %e, "Stored cart is unreadable, starting empty");
                None
            }
        },
        Ok(None) => {
            debug!(key = %inner.key, "No stored cart, starting empty");
            None
        }
        Err(e) => {
            warn!(key = %inner.key, error = %e, "Failed to read stored cart, starting empty");
            None
        }
    };

    if let Some(cart) = stored {
        let items = cart.len();
        let applied = inner.state.send_if_modified(|current| {
            if inner.touched.load(Ordering::SeqCst) {
                return false;
            }
            *current = Arc::new(cart);
            true
        });

        if applied {
            info!(key = %inner.key, items, "Cart hydrated");
        } else {
            warn!(key = %inner.key, "Cart changed during hydration, stored cart discarded");
        }
    }

    inner.status.send_replace(CartStatus::Ready);
}
