//! Authentication
//!
//! Session management against the backend: the bearer token returned by
//! login is installed on the connector and persisted to local storage, and a
//! session rejected by the backend is torn down in one place. 401 mapping
//! itself lives in the connector; callers only ever see
//! [`Error::SessionExpired`].

use tienda_common::api::{LoginRequest, RegisterRequest, UserResponse};
use tienda_common::Error;
use tracing::instrument;

use super::Storefront;

impl Storefront {
    /// Log in and persist the bearer token
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserResponse, Error> {
        let response = self
            .client()
            .post_login(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.client()
            .set_auth_token(Some(response.access_token.clone()))
            .await;
        if let Err(err) = self.localstore.set_auth_token(response.access_token).await {
            tracing::warn!("Failed to persist bearer token: {}", err);
        }

        self.guard_session(self.client().get_me().await).await
    }

    /// Register a new account
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserResponse, Error> {
        self.client()
            .post_register(RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
            })
            .await
    }

    /// Get the authenticated user
    pub async fn current_user(&self) -> Result<UserResponse, Error> {
        self.guard_session(self.client().get_me().await).await
    }

    /// Install a previously persisted session token onto the connector
    ///
    /// Returns whether a token was found.
    #[instrument(skip(self))]
    pub async fn restore_session(&self) -> Result<bool, Error> {
        match self.localstore.get_auth_token().await? {
            Some(token) => {
                self.client().set_auth_token(Some(token)).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drop the session locally
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), Error> {
        self.client().set_auth_token(None).await;
        self.localstore.clear_auth_token().await?;
        Ok(())
    }

    /// Whether a bearer token is installed on the connector
    pub async fn is_authenticated(&self) -> bool {
        self.client().get_auth_token().await.is_some()
    }

    /// Tear down the persisted session when the backend rejected it
    pub(crate) async fn guard_session<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(Error::SessionExpired) = &result {
            tracing::warn!("Session expired, clearing persisted token");
            if let Err(err) = self.localstore.clear_auth_token().await {
                tracing::warn!("Failed to clear persisted token: {}", err);
            }
        }
        result
    }
}
