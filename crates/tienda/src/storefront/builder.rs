use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tienda_common::cart::CartState;
use tienda_common::{BackendUrl, Error};
use tokio::sync::RwLock;

use crate::store_database::StoreDatabase;
use crate::storefront::poller::DEFAULT_POLL_INTERVAL;
use crate::storefront::{BackendConnector, HttpClient, Storefront};

/// Builder for creating a new [`Storefront`]
#[derive(Default)]
pub struct StorefrontBuilder {
    backend_url: Option<BackendUrl>,
    localstore: Option<Arc<dyn StoreDatabase + Send + Sync>>,
    client: Option<Arc<dyn BackendConnector + Send + Sync>>,
    poll_interval: Option<Duration>,
}

impl std::fmt::Debug for StorefrontBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontBuilder")
            .field("backend_url", &self.backend_url)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl StorefrontBuilder {
    /// Create a new StorefrontBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend URL
    pub fn backend_url(mut self, backend_url: BackendUrl) -> Self {
        self.backend_url = Some(backend_url);
        self
    }

    /// Set the backend URL from a string
    pub fn backend_url_str(mut self, backend_url: &str) -> Result<Self, Error> {
        self.backend_url = Some(BackendUrl::from_str(backend_url)?);
        Ok(self)
    }

    /// Set the local storage backend
    pub fn localstore(mut self, localstore: Arc<dyn StoreDatabase + Send + Sync>) -> Self {
        self.localstore = Some(localstore);
        self
    }

    /// Set a custom client connector
    pub fn client<C: BackendConnector + 'static + Send + Sync>(mut self, client: C) -> Self {
        self.client = Some(Arc::new(client));
        self
    }

    /// Set a custom client connector from Arc
    pub fn shared_client(mut self, client: Arc<dyn BackendConnector + Send + Sync>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the transaction status polling interval
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }

    /// Build the storefront
    pub fn build(self) -> Result<Storefront, Error> {
        let backend_url = self
            .backend_url
            .ok_or(Error::Custom("Backend url required".to_string()))?;
        let localstore = self
            .localstore
            .ok_or(Error::Custom("Localstore required".to_string()))?;

        let client = match self.client {
            Some(client) => client,
            None => Arc::new(HttpClient::new(backend_url.clone()))
                as Arc<dyn BackendConnector + Send + Sync>,
        };

        Ok(Storefront {
            backend_url,
            localstore,
            cart: Arc::new(RwLock::new(CartState::default())),
            client,
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
        })
    }
}
