//! Reqwest backend client

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, IntoUrl};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tienda_common::api::{
    CreateTransactionRequest, CreateTransactionResponse, Envelope, ErrorResponse, HistoryPage,
    LoginRequest, LoginResponse, ProductsPage, ProductsQuery, RegisterRequest,
    TransactionStatusResponse, UserResponse,
};
use tienda_common::transaction::StatusFilter;
use tienda_common::{BackendUrl, Error};
use tokio::sync::RwLock;

use super::BackendConnector;

#[derive(Debug, Clone)]
struct HttpClientCore {
    inner: Client,
}

impl HttpClientCore {
    fn new() -> Self {
        if rustls::crypto::CryptoProvider::get_default().is_none() {
            let _ = rustls::crypto::ring::default_provider().install_default();
        }

        Self {
            inner: Client::new(),
        }
    }

    fn client(&self) -> &Client {
        &self.inner
    }
}

/// Http Client
///
/// Bearer-token handling is central: the token installed here is attached to
/// every request, and a 401 from the backend clears it and surfaces
/// [`Error::SessionExpired`], so call sites never handle authentication
/// failures individually.
#[derive(Debug, Clone)]
pub struct HttpClient {
    core: HttpClientCore,
    backend_url: BackendUrl,
    auth_token: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    /// Create new [`HttpClient`]
    pub fn new(backend_url: BackendUrl) -> Self {
        Self {
            core: HttpClientCore::new(),
            backend_url,
            auth_token: Arc::new(RwLock::new(None)),
        }
    }

    async fn http_get<U: IntoUrl + Send, R: DeserializeOwned>(&self, url: U) -> Result<R, Error> {
        let mut request = self.core.client().get(url);

        if let Some(token) = self.auth_token.read().await.clone() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|e| {
            Error::Http(
                e.status().map(|status_code| status_code.as_u16()),
                e.to_string(),
            )
        })?;

        self.handle_response(response).await
    }

    async fn http_post<U: IntoUrl + Send, P: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: U,
        payload: &P,
    ) -> Result<R, Error> {
        let mut request = self.core.client().post(url).json(&payload);

        if let Some(token) = self.auth_token.read().await.clone() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|e| {
            Error::Http(
                e.status().map(|status_code| status_code.as_u16()),
                e.to_string(),
            )
        })?;

        self.handle_response(response).await
    }

    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status().as_u16();

        if status == 401 {
            // Expired or invalid session; drop the token so later calls fail fast
            self.auth_token.write().await.take();
            tracing::warn!("Session rejected by the backend, clearing bearer token");
            return Err(Error::SessionExpired);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(Some(status), e.to_string()))?;

        serde_json::from_str::<R>(&body).map_err(|err| {
            tracing::warn!("Http response error: {}", err);
            match ErrorResponse::from_json(&body) {
                Ok(error_response) => Error::Http(Some(status), error_response.message),
                Err(_) => Error::Http(Some(status), body),
            }
        })
    }

    fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, Error> {
        if !envelope.success {
            return Err(Error::Http(Some(envelope.status_code), envelope.message));
        }
        Ok(envelope.data)
    }
}

#[async_trait]
impl BackendConnector for HttpClient {
    async fn post_login(&self, request: LoginRequest) -> Result<LoginResponse, Error> {
        let url = self.backend_url.join_paths(&["api", "v1", "user", "login"])?;
        let envelope: Envelope<LoginResponse> = self.http_post(url, &request).await?;
        Self::unwrap_envelope(envelope)
    }

    async fn post_register(&self, request: RegisterRequest) -> Result<UserResponse, Error> {
        let url = self
            .backend_url
            .join_paths(&["api", "v1", "user", "register"])?;
        let envelope: Envelope<UserResponse> = self.http_post(url, &request).await?;
        Self::unwrap_envelope(envelope)
    }

    async fn get_me(&self) -> Result<UserResponse, Error> {
        let url = self.backend_url.join_paths(&["api", "v1", "user", "me"])?;
        let envelope: Envelope<UserResponse> = self.http_get(url).await?;
        Self::unwrap_envelope(envelope)
    }

    async fn get_products(&self, query: ProductsQuery) -> Result<ProductsPage, Error> {
        let mut url = self.backend_url.join_paths(&["api", "v1", "products"])?;
        url.query_pairs_mut().extend_pairs(query.to_query_pairs());
        let envelope: Envelope<ProductsPage> = self.http_get(url).await?;
        Self::unwrap_envelope(envelope)
    }

    async fn get_products_search(&self, term: &str, page: u32) -> Result<ProductsPage, Error> {
        let mut url = self
            .backend_url
            .join_paths(&["api", "v1", "products", "search"])?;
        url.query_pairs_mut()
            .append_pair("search", term)
            .append_pair("page", &page.to_string());
        let envelope: Envelope<ProductsPage> = self.http_get(url).await?;
        Self::unwrap_envelope(envelope)
    }

    async fn post_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<CreateTransactionResponse, Error> {
        let url = self.backend_url.join_paths(&["api", "v1", "transactions"])?;
        let envelope: Envelope<CreateTransactionResponse> = self.http_post(url, &request).await?;
        Self::unwrap_envelope(envelope)
    }

    async fn get_transaction_status(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionStatusResponse, Error> {
        let url = self
            .backend_url
            .join_paths(&["api", "v1", "transactions", transaction_id, "status"])?;
        let envelope: Envelope<TransactionStatusResponse> = self.http_get(url).await?;
        Self::unwrap_envelope(envelope)
    }

    async fn get_history(&self, page: u32, filter: StatusFilter) -> Result<HistoryPage, Error> {
        let mut url = self
            .backend_url
            .join_paths(&["api", "v1", "products", "historial"])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        if let StatusFilter::Status(status) = filter {
            url.query_pairs_mut()
                .append_pair("status", &status.to_string());
        }
        let envelope: Envelope<HistoryPage> = self.http_get(url).await?;
        Self::unwrap_envelope(envelope)
    }

    async fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.write().await = token;
    }

    async fn get_auth_token(&self) -> Option<String> {
        self.auth_token.read().await.clone()
    }
}
