//! Tienda shared types and functions.
//!
//! This crate is the base foundation to build things that can interact with
//! the Tienda SDK and their internal crates.
//!
//! This is meant to contain the shared types, traits and common functions
//! that are used across the internal crates.

pub mod amount;
pub mod api;
pub mod backend_url;
pub mod cart;
pub mod checkout;
pub mod database;
pub mod error;
pub mod fees;
pub mod transaction;
pub mod util;

pub use self::amount::Amount;
pub use self::backend_url::BackendUrl;
pub use self::cart::{CartItem, CartProduct, CartState};
pub use self::checkout::{CheckoutForm, CheckoutResume, CheckoutStep, DocumentType};
pub use self::error::Error;
pub use self::transaction::{StatusFilter, Transaction, TransactionStatus};

/// Ensures that the condition holds, otherwise returns the given error.
#[macro_export]
macro_rules! ensure_tienda {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}
