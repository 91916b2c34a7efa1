//! Errors

use thiserror::Error;

use crate::checkout::validation::ValidationErrors;
use crate::checkout::CheckoutStep;
use crate::{amount, backend_url, checkout, database, transaction};

/// Tienda Error
#[derive(Debug, Error)]
pub enum Error {
    /// Form validation failed
    ///
    /// Field level; blocks step progression and is never sent to the backend
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// HTTP error from the backend
    #[error("HTTP error: {1}")]
    Http(Option<u16>, String),
    /// Session expired or invalid
    #[error("Session expired")]
    SessionExpired,
    /// Operation requires authentication
    #[error("Authentication required")]
    AuthRequired,
    /// Product is not in the cart
    #[error("Item not found in cart: `{0}`")]
    ItemNotFound(String),
    /// Illegal checkout step transition
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidTransition {
        /// Step the session was in
        from: CheckoutStep,
        /// Step the caller asked for
        to: CheckoutStep,
    },
    /// Checkout session has been closed
    #[error("Checkout session closed")]
    SessionClosed,
    /// No transaction exists for the requested operation
    #[error("No transaction for this attempt")]
    NoTransaction,
    /// Amount error
    #[error(transparent)]
    Amount(#[from] amount::Error),
    /// Url error
    #[error(transparent)]
    Url(#[from] backend_url::Error),
    /// Transaction error
    #[error(transparent)]
    Transaction(#[from] transaction::Error),
    /// Checkout error
    #[error(transparent)]
    Checkout(#[from] checkout::Error),
    /// Database error
    #[error(transparent)]
    Database(#[from] database::Error),
    /// Serde error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    /// Custom error
    #[error("`{0}`")]
    Custom(String),
}

impl Error {
    /// Whether the error came from the network rather than local state
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_, _))
    }
}
