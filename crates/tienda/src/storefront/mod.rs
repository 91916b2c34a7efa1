//! Tienda Storefront client
//!
//! The [`Storefront`] is a high level client for a single backend: it owns
//! the cart, opens checkout sessions against the payment gateway and reads
//! the purchase history. All state lives behind `Arc`s, so cloning is cheap
//! and clones share the same cart and storage.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tienda_common::cart::CartState;
use tienda_common::{BackendUrl, Error};
use tokio::sync::RwLock;

use crate::store_database::StoreDatabase;

mod auth;
mod builder;
mod cart;
mod checkout;
pub mod connector;
mod history;
mod poller;
mod products;

pub use builder::StorefrontBuilder;
pub use checkout::{CheckoutSession, RESULT_AUTO_CLOSE_SECS};
pub use connector::{BackendConnector, HttpClient};
pub use history::HistoryView;
pub use poller::{StatusPoller, DEFAULT_POLL_INTERVAL};
pub use products::ProductListing;

/// High level storefront client
///
/// A [`Storefront`] is bound to a single backend and a single local store.
#[derive(Debug, Clone)]
pub struct Storefront {
    /// Backend Url
    pub backend_url: BackendUrl,
    /// Storage backend
    pub localstore: Arc<dyn StoreDatabase + Send + Sync>,
    cart: Arc<RwLock<CartState>>,
    client: Arc<dyn BackendConnector + Send + Sync>,
    poll_interval: Duration,
}

impl Storefront {
    /// Create new [`Storefront`]
    /// # Synopsis
    /// ```rust
    /// use std::sync::Arc;
    ///
    /// use tienda::store_database::MemoryStoreDatabase;
    /// use tienda::Storefront;
    ///
    /// let localstore = MemoryStoreDatabase::default();
    /// let storefront = Storefront::new("https://shop.example.com", Arc::new(localstore));
    /// ```
    pub fn new(
        backend_url: &str,
        localstore: Arc<dyn StoreDatabase + Send + Sync>,
    ) -> Result<Self, Error> {
        let backend_url = BackendUrl::from_str(backend_url)?;
        let http_client = Arc::new(HttpClient::new(backend_url.clone()));

        Ok(Self {
            backend_url,
            localstore,
            cart: Arc::new(RwLock::new(CartState::default())),
            client: http_client,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Change HTTP client
    pub fn set_client<C: BackendConnector + 'static + Send + Sync>(&mut self, client: C) {
        self.client = Arc::new(client);
    }

    /// The connector this storefront talks to the backend through
    pub fn client(&self) -> Arc<dyn BackendConnector + Send + Sync> {
        Arc::clone(&self.client)
    }

    pub(crate) fn cart_lock(&self) -> &Arc<RwLock<CartState>> {
        &self.cart
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
