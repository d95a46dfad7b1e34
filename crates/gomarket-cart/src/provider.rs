//! # Provider Scope
//!
//! Makes one `CartStore` the "active cart" for a stretch of async code, so
//! deeply nested components can reach it with [`use_cart`] instead of
//! threading the handle through every call.
//!
//! ```rust,ignore
//! let store = CartStore::connect(&config).await?;
//!
//! CartProvider::new(store)
//!     .scope(async {
//!         let cart = use_cart()?;
//!         cart.add_to_cart(product);
//!         Ok::<_, CartError>(())
//!     })
//!     .await?;
//! ```
//!
//! Passing a cloned `CartStore` around directly works just as well.

use std::future::Future;

use crate::error::{CartError, CartResult};
use crate::store::CartStore;

tokio::task_local! {
    static ACTIVE_CART: CartStore;
}

/// Installs a store as the active cart for the code it runs.
#[derive(Debug, Clone)]
pub struct CartProvider {
    store: CartStore,
}

impl CartProvider {
    pub fn new(store: CartStore) -> Self {
        CartProvider { store }
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Runs `fut` with this provider's store active.
    pub async fn scope<F>(&self, fut: F) -> F::Output
    where
        F: Future,
    {
        ACTIVE_CART.scope(self.store.clone(), fut).await
    }

    /// Runs `f` synchronously with this provider's store active.
    pub fn sync_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        ACTIVE_CART.sync_scope(self.store.clone(), f)
    }
}

/// Returns the active cart.
///
/// Fails with [`CartError::MissingProvider`] outside a
/// [`CartProvider`] scope.
pub fn use_cart() -> CartResult<CartStore> {
    ACTIVE_CART
        .try_with(CartStore::clone)
        .map_err(|_| CartError::MissingProvider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CartConfig;
    use gomarket_core::Product;

    async fn provider() -> CartProvider {
        let store = CartStore::connect(&CartConfig::in_memory()).await.unwrap();
        store.ready().await;
        CartProvider::new(store)
    }

    #[tokio::test]
    async fn test_use_cart_outside_scope_fails() {
        let err = use_cart().unwrap_err();
        assert!(matches!(err, CartError::MissingProvider));
        assert_eq!(err.to_string(), "use_cart must be used within a CartProvider");
    }

    #[tokio::test]
    async fn test_scope_shares_the_provider_store() {
        let provider = provider().await;

        provider
            .scope(async {
                let cart = use_cart().unwrap();
                cart.add_to_cart(Product::new("a", "A", "https://img/a.png", 3.0));
            })
            .await;

        assert_eq!(provider.store().products().len(), 1);
        assert!(use_cart().is_err());
    }

    #[tokio::test]
    async fn test_sync_scope() {
        let provider = provider().await;

        let key = provider.sync_scope(|| use_cart().map(|cart| cart.storage_key().to_string()));
        assert_eq!(key.unwrap(), "@GoMarketplace-products");
    }

    #[tokio::test]
    async fn test_nested_scope_uses_innermost_store() {
        let outer = provider().await;
        let inner = provider().await;
        inner
            .store()
            .add_to_cart(Product::new("b", "B", "https://img/b.png", 1.0));

        outer
            .scope(async {
                let seen = inner.scope(async { use_cart().unwrap().products().len() }).await;
                assert_eq!(seen, 1);
                assert!(use_cart().unwrap().products().is_empty());
            })
            .await;
    }
}
