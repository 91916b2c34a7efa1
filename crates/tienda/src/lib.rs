//! Rust client SDK for the Tienda storefront
//!
//! High level client for a storefront backend: product browsing, a cart
//! persisted to local storage, a multi-step checkout flow against a payment
//! gateway, transaction status polling and a purchase history view.
#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

pub mod store_database {
    //! Tienda Database
    pub use tienda_common::database::{Database as StoreDatabase, Error};

    mod memory;

    pub use memory::MemoryStoreDatabase;
}

pub mod storefront;

#[doc(hidden)]
pub use tienda_common::{
    amount, api, backend_url, cart, checkout, database,
    error::{self, Error},
    fees, transaction, util, Amount, BackendUrl,
};

#[doc(hidden)]
pub use self::storefront::{
    BackendConnector, CheckoutSession, HttpClient, StatusPoller, Storefront, StorefrontBuilder,
};
