//! Redb storage backend for the Tienda SDK
//!
//! Implements the storefront storage trait against an embedded redb file,
//! giving the client durable local state: the cart snapshot, the purchase
//! history log, the in-progress checkout marker and the session token.

mod error;
mod store;

pub use error::Error;
pub use store::RedbStoreDatabase;
