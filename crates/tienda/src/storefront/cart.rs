//! Cart store operations
//!
//! Wraps the pure [`CartState`] transitions with persistence. Every mutation
//! recomputes the derived totals before the snapshot is written, so storage
//! never sees a torn state. Persistence is best effort: a storage failure is
//! logged and the in-memory mutation stands.

use tienda_common::cart::{CartProduct, CartState};
use tienda_common::Error;
use tracing::instrument;

use super::Storefront;

impl Storefront {
    /// Current cart snapshot
    pub async fn cart(&self) -> CartState {
        self.cart_lock().read().await.clone()
    }

    /// Restore the persisted cart snapshot
    ///
    /// Only applied when the in-memory cart is empty, so stale storage never
    /// clobbers live edits; returns whether a snapshot was applied.
    #[instrument(skip(self))]
    pub async fn restore_cart(&self) -> Result<bool, Error> {
        let Some(snapshot) = self.localstore.get_cart().await? else {
            return Ok(false);
        };

        let mut cart = self.cart_lock().write().await;
        let applied = cart.restore(snapshot);
        if applied {
            tracing::debug!(
                "Restored cart snapshot with {} line(s)",
                cart.items.len()
            );
        }
        Ok(applied)
    }

    /// Add a product to the cart
    ///
    /// An existing line is raised toward its stock ceiling with excess
    /// silently clamped; otherwise a new line is opened.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_product(&self, product: CartProduct, quantity: u32) -> Result<CartState, Error> {
        let mut cart = self.cart_lock().write().await;
        cart.add_product(product, quantity)?;
        self.persist_cart(&cart).await;
        Ok(cart.clone())
    }

    /// Delete a line unconditionally
    #[instrument(skip(self))]
    pub async fn remove_product(&self, id: &str) -> Result<CartState, Error> {
        let mut cart = self.cart_lock().write().await;
        cart.remove_product(id)?;
        self.persist_cart(&cart).await;
        Ok(cart.clone())
    }

    /// Raise a line quantity by one, clamped at the stock ceiling
    #[instrument(skip(self))]
    pub async fn increment_item(&self, id: &str) -> Result<CartState, Error> {
        let mut cart = self.cart_lock().write().await;
        if cart.increment_item(id)? {
            self.persist_cart(&cart).await;
        }
        Ok(cart.clone())
    }

    /// Lower a line quantity by one; at quantity one the line is removed
    #[instrument(skip(self))]
    pub async fn decrement_item(&self, id: &str) -> Result<CartState, Error> {
        let mut cart = self.cart_lock().write().await;
        if cart.decrement_item(id)? {
            self.persist_cart(&cart).await;
        }
        Ok(cart.clone())
    }

    /// Set an absolute line quantity; out-of-range values are a no-op
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, id: &str, quantity: u32) -> Result<CartState, Error> {
        let mut cart = self.cart_lock().write().await;
        if cart.update_quantity(id, quantity)? {
            self.persist_cart(&cart).await;
        }
        Ok(cart.clone())
    }

    /// Empty the cart
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<CartState, Error> {
        let mut cart = self.cart_lock().write().await;
        cart.clear();
        self.persist_cart(&cart).await;
        Ok(cart.clone())
    }

    /// Persist the whole snapshot; failures do not roll back the mutation
    async fn persist_cart(&self, cart: &CartState) {
        if let Err(err) = self.localstore.set_cart(cart.clone()).await {
            tracing::warn!("Failed to persist cart snapshot: {}", err);
        }
    }
}
