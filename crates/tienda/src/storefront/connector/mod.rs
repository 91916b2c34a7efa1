//! Backend connector
//!
//! Interface that connects a storefront to its REST backend. Typically
//! represents an [`HttpClient`].

use std::fmt::Debug;

use async_trait::async_trait;
use tienda_common::api::{
    CreateTransactionRequest, CreateTransactionResponse, HistoryPage, LoginRequest, LoginResponse,
    ProductsPage, ProductsQuery, RegisterRequest, TransactionStatusResponse, UserResponse,
};
use tienda_common::transaction::StatusFilter;
use tienda_common::Error;

mod http_client;

pub use http_client::HttpClient;

/// Interface that connects a storefront to the backend
#[async_trait]
pub trait BackendConnector: Debug {
    /// Log in; the response carries the bearer token
    async fn post_login(&self, request: LoginRequest) -> Result<LoginResponse, Error>;
    /// Register a new account
    async fn post_register(&self, request: RegisterRequest) -> Result<UserResponse, Error>;
    /// Get the authenticated user
    async fn get_me(&self) -> Result<UserResponse, Error>;

    /// Paginated product listing
    async fn get_products(&self, query: ProductsQuery) -> Result<ProductsPage, Error>;
    /// Paginated product search
    async fn get_products_search(&self, term: &str, page: u32) -> Result<ProductsPage, Error>;

    /// Create a transaction against the payment gateway
    async fn post_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<CreateTransactionResponse, Error>;
    /// Poll the current status of a transaction
    async fn get_transaction_status(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionStatusResponse, Error>;

    /// Paginated transaction history
    async fn get_history(&self, page: u32, filter: StatusFilter) -> Result<HistoryPage, Error>;

    /// Install the bearer token attached to subsequent requests
    async fn set_auth_token(&self, token: Option<String>);
    /// Get the bearer token currently attached to requests
    async fn get_auth_token(&self) -> Option<String>;
}
