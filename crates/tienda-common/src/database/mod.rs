//! Tienda Database
//!
//! Durable client-side storage behind an async trait, so the storefront can
//! run against an in-memory store in tests and an embedded database in
//! applications.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::cart::CartState;
use crate::checkout::CheckoutResume;
use crate::transaction::{StatusFilter, Transaction};

/// Database error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database Error
    #[error(transparent)]
    Database(Box<dyn std::error::Error + Send + Sync>),
    /// Serde Error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    /// Unknown transaction
    #[error("Unknown transaction")]
    UnknownTransaction,
}

/// Storefront storage trait
#[async_trait]
pub trait Database: Debug {
    /// Get the persisted cart snapshot
    async fn get_cart(&self) -> Result<Option<CartState>, Error>;
    /// Persist the whole cart snapshot
    async fn set_cart(&self, cart: CartState) -> Result<(), Error>;
    /// Remove the persisted cart snapshot
    async fn clear_cart(&self) -> Result<(), Error>;

    /// Append a transaction to the purchase history log
    async fn add_transaction(&self, transaction: Transaction) -> Result<(), Error>;
    /// Get a transaction from storage
    async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>, Error>;
    /// List transactions from storage, newest first
    async fn list_transactions(&self, filter: StatusFilter) -> Result<Vec<Transaction>, Error>;
    /// Remove a transaction from storage
    async fn remove_transaction(&self, id: &str) -> Result<(), Error>;

    /// Persist the in-progress checkout marker
    async fn set_checkout_resume(&self, resume: CheckoutResume) -> Result<(), Error>;
    /// Get the in-progress checkout marker
    async fn get_checkout_resume(&self) -> Result<Option<CheckoutResume>, Error>;
    /// Clear the in-progress checkout marker
    async fn clear_checkout_resume(&self) -> Result<(), Error>;

    /// Persist the bearer token
    async fn set_auth_token(&self, token: String) -> Result<(), Error>;
    /// Get the persisted bearer token
    async fn get_auth_token(&self) -> Result<Option<String>, Error>;
    /// Clear the persisted bearer token
    async fn clear_auth_token(&self) -> Result<(), Error>;
}
