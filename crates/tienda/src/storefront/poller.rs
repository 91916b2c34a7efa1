//! Transaction status poller
//!
//! A poll-based stand-in for gateway webhooks: fetches the status of a
//! pending transaction every few seconds and stops the instant a terminal
//! status is observed or the caller disables it. Responses are sequenced by
//! request issue order so an out-of-order response can never overwrite a
//! newer one; disabling does not abort in-flight requests, their results are
//! simply discarded.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tienda_common::api::TransactionStatusResponse;
use tienda_common::Error;
use tracing::instrument;

use super::BackendConnector;

/// Default pause between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Polls a transaction until it leaves the pending state
#[derive(Debug, Clone)]
pub struct StatusPoller {
    client: Arc<dyn BackendConnector + Send + Sync>,
    interval: Duration,
    enabled: Arc<AtomicBool>,
    issued: Arc<AtomicU64>,
    applied: Arc<AtomicU64>,
}

impl StatusPoller {
    /// Create a new [`StatusPoller`] with its own enabled flag
    pub fn new(client: Arc<dyn BackendConnector + Send + Sync>, interval: Duration) -> Self {
        Self::with_enabled(client, interval, Arc::new(AtomicBool::new(true)))
    }

    /// Create a new [`StatusPoller`] bound to a shared enabled flag
    ///
    /// The caller keeps the flag and can flip it to cancel polling, e.g. when
    /// the checkout session closes.
    pub fn with_enabled(
        client: Arc<dyn BackendConnector + Send + Sync>,
        interval: Duration,
        enabled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            client,
            interval,
            enabled,
            issued: Arc::new(AtomicU64::new(0)),
            applied: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Stop polling; in-flight requests are not aborted, their results are
    /// discarded
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Whether the poller is still allowed to poll
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Take a sequence number for a request about to be issued
    pub fn begin_request(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record a response for the request issued at `seq`
    ///
    /// Returns false when a response from a later request has already been
    /// applied; such stale responses must be ignored by the caller.
    pub fn try_apply(&self, seq: u64) -> bool {
        let mut current = self.applied.load(Ordering::SeqCst);
        loop {
            if seq <= current {
                return false;
            }
            match self
                .applied
                .compare_exchange(current, seq, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Poll `transaction_id` until a terminal status is observed
    ///
    /// Returns the terminal response, or `None` when the poller was disabled
    /// before one arrived. Poll failures are logged and retried on the next
    /// tick.
    #[instrument(skip(self))]
    pub async fn poll_until_terminal(
        &self,
        transaction_id: &str,
    ) -> Result<Option<TransactionStatusResponse>, Error> {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            if !self.is_enabled() {
                tracing::debug!("Poller disabled for {}", transaction_id);
                return Ok(None);
            }

            interval.tick().await;

            if !self.is_enabled() {
                return Ok(None);
            }

            let seq = self.begin_request();
            let response = match self.client.get_transaction_status(transaction_id).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::warn!("Status poll failed for {}: {}", transaction_id, err);
                    continue;
                }
            };

            if !self.try_apply(seq) {
                tracing::debug!(
                    "Discarding out-of-order status response for {}",
                    transaction_id
                );
                continue;
            }

            if response.status.is_terminal() {
                tracing::debug!(
                    "Transaction {} reached terminal status {}",
                    transaction_id,
                    response.status
                );
                self.disable();
                return Ok(Some(response));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use async_trait::async_trait;
    use tienda_common::api::{
        CreateTransactionRequest, CreateTransactionResponse, HistoryPage, LoginRequest,
        LoginResponse, ProductsPage, ProductsQuery, RegisterRequest, TransactionStatusResponse,
        UserResponse,
    };
    use tienda_common::transaction::{StatusFilter, TransactionStatus};
    use tienda_common::Amount;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct ScriptedConnector {
        // None entries simulate a failed poll; an exhausted script also fails
        statuses: Mutex<Vec<Option<TransactionStatus>>>,
    }

    fn status_response(status: TransactionStatus) -> TransactionStatusResponse {
        TransactionStatusResponse {
            transaction_id: "txn-1".to_string(),
            reference: "TXN_1_abcdefghi".to_string(),
            status,
            amount: Amount::from(43_000_u64),
            product_name: None,
            quantity: 1,
            is_pending: status.is_pending(),
            is_completed: status.is_terminal(),
            can_retry: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[async_trait]
    impl BackendConnector for ScriptedConnector {
        async fn post_login(&self, _request: LoginRequest) -> Result<LoginResponse, Error> {
            unimplemented!()
        }

        async fn post_register(&self, _request: RegisterRequest) -> Result<UserResponse, Error> {
            unimplemented!()
        }

        async fn get_me(&self) -> Result<UserResponse, Error> {
            unimplemented!()
        }

        async fn get_products(&self, _query: ProductsQuery) -> Result<ProductsPage, Error> {
            unimplemented!()
        }

        async fn get_products_search(
            &self,
            _term: &str,
            _page: u32,
        ) -> Result<ProductsPage, Error> {
            unimplemented!()
        }

        async fn post_transaction(
            &self,
            _request: CreateTransactionRequest,
        ) -> Result<CreateTransactionResponse, Error> {
            unimplemented!()
        }

        async fn get_transaction_status(
            &self,
            _transaction_id: &str,
        ) -> Result<TransactionStatusResponse, Error> {
            let mut statuses = self.statuses.lock().await;
            if statuses.is_empty() {
                return Err(Error::Http(None, "connection reset".to_string()));
            }
            match statuses.remove(0) {
                Some(status) => Ok(status_response(status)),
                None => Err(Error::Http(None, "connection reset".to_string())),
            }
        }

        async fn get_history(
            &self,
            _page: u32,
            _filter: StatusFilter,
        ) -> Result<HistoryPage, Error> {
            unimplemented!()
        }

        async fn set_auth_token(&self, _token: Option<String>) {}

        async fn get_auth_token(&self) -> Option<String> {
            None
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_terminal_status() {
        let connector = ScriptedConnector {
            statuses: Mutex::new(vec![
                Some(TransactionStatus::Pending),
                Some(TransactionStatus::Pending),
                Some(TransactionStatus::Approved),
            ]),
        };
        let poller = StatusPoller::new(Arc::new(connector), Duration::from_secs(2));

        let response = poller
            .poll_until_terminal("txn-1")
            .await
            .expect("poll")
            .expect("terminal status");

        assert_eq!(response.status, TransactionStatus::Approved);
        assert!(!poller.is_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_errors_are_retried() {
        let connector = ScriptedConnector {
            statuses: Mutex::new(vec![None, Some(TransactionStatus::Declined)]),
        };
        let poller = StatusPoller::new(Arc::new(connector), Duration::from_secs(2));

        let response = poller
            .poll_until_terminal("txn-1")
            .await
            .expect("poll")
            .expect("terminal status");
        assert_eq!(response.status, TransactionStatus::Declined);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_poller_returns_none() {
        let connector = ScriptedConnector {
            statuses: Mutex::new(vec![Some(TransactionStatus::Pending)]),
        };
        let enabled = Arc::new(AtomicBool::new(true));
        let poller = StatusPoller::with_enabled(
            Arc::new(connector),
            Duration::from_secs(2),
            Arc::clone(&enabled),
        );

        let handle = tokio::spawn({
            let poller = poller.clone();
            async move { poller.poll_until_terminal("txn-1").await }
        });

        // Let one pending poll go through, then cancel
        tokio::time::sleep(Duration::from_secs(3)).await;
        enabled.store(false, Ordering::SeqCst);

        let result = handle.await.expect("join").expect("poll");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded_after_terminal() {
        let connector = ScriptedConnector::default();
        let poller = StatusPoller::new(Arc::new(connector), Duration::from_secs(2));

        // Two requests in flight; the later one resolves first with APPROVED
        let early = poller.begin_request();
        let late = poller.begin_request();

        assert!(poller.try_apply(late));

        // The earlier request's PENDING response arrives afterwards
        assert!(!poller.try_apply(early));
    }
}
