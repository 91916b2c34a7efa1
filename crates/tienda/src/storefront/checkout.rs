//! Checkout session state machine
//!
//! Drives the `payment -> summary -> processing -> result` flow for a single
//! cart line, coordinating transaction creation with asynchronous status
//! observations. A session is cheap to clone and clones share state, so a
//! spawned watcher and the UI-facing handle always agree.
//!
//! Every attempt carries a monotonically increasing attempt id; a result is
//! only applied when the session is still open and the attempt has not been
//! superseded, which is what discards stale responses after a close or a
//! retry.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tienda_common::api::{CardData, CreateTransactionRequest, DeliveryInfo};
use tienda_common::cart::CartItem;
use tienda_common::checkout::{CheckoutForm, CheckoutResume, CheckoutStep};
use tienda_common::fees::{self, OrderTotal};
use tienda_common::transaction::{Transaction, TransactionStatus};
use tienda_common::util::{generate_local_id, generate_reference, unix_time};
use tienda_common::{Amount, Error};
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use super::poller::StatusPoller;
use super::Storefront;

/// Seconds the result view stays open before an approved session closes
/// itself
pub const RESULT_AUTO_CLOSE_SECS: u64 = 5;

#[derive(Debug)]
struct SessionState {
    step: CheckoutStep,
    product_id: String,
    product_name: String,
    unit_price: Amount,
    quantity: u32,
    form: Option<CheckoutForm>,
    transaction: Option<Transaction>,
}

/// Checkout session over a single cart line
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    storefront: Storefront,
    // Correlation id for logs only
    id: Uuid,
    inner: Arc<RwLock<SessionState>>,
    attempt: Arc<AtomicU64>,
    open: Arc<AtomicBool>,
    polling: Arc<AtomicBool>,
}

impl Storefront {
    /// Open a checkout session for a cart line
    pub async fn begin_checkout(&self, product_id: &str) -> Result<CheckoutSession, Error> {
        let cart = self.cart_lock().read().await;
        let item = cart
            .items
            .get(product_id)
            .ok_or_else(|| Error::ItemNotFound(product_id.to_string()))?;
        Ok(CheckoutSession::new(self.clone(), item))
    }

    /// Read the persisted in-progress checkout marker
    ///
    /// Markers older than the validity window are discarded even if present.
    #[instrument(skip(self))]
    pub async fn checkout_resume(&self) -> Result<Option<CheckoutResume>, Error> {
        match self.localstore.get_checkout_resume().await? {
            Some(resume) if !resume.is_expired(unix_time()) => Ok(Some(resume)),
            Some(_) => {
                tracing::debug!("Discarding expired checkout resume marker");
                self.localstore.clear_checkout_resume().await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

impl CheckoutSession {
    fn new(storefront: Storefront, item: &CartItem) -> Self {
        Self {
            storefront,
            id: Uuid::new_v4(),
            inner: Arc::new(RwLock::new(SessionState {
                step: CheckoutStep::Payment,
                product_id: item.id.clone(),
                product_name: item.name.clone(),
                unit_price: item.price,
                quantity: item.quantity,
                form: None,
                transaction: None,
            })),
            attempt: Arc::new(AtomicU64::new(0)),
            open: Arc::new(AtomicBool::new(true)),
            polling: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current step
    pub async fn step(&self) -> CheckoutStep {
        self.inner.read().await.step
    }

    /// Whether the session is still open
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Latest transaction observed by this session
    pub async fn transaction(&self) -> Option<Transaction> {
        self.inner.read().await.transaction.clone()
    }

    /// Itemized totals shown on the summary step
    pub async fn order_total(&self) -> Result<OrderTotal, Error> {
        let state = self.inner.read().await;
        let subtotal = state
            .unit_price
            .checked_mul(Amount::from(state.quantity))
            .ok_or(tienda_common::amount::Error::AmountOverflow)?;
        Ok(fees::order_total(subtotal)?)
    }

    /// `payment -> summary`, gated by the form validator
    ///
    /// The validated payload is carried forward and not re-validated on later
    /// steps.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn submit_payment(&self, form: CheckoutForm) -> Result<(), Error> {
        self.ensure_open()?;
        let mut state = self.inner.write().await;
        if state.step != CheckoutStep::Payment {
            return Err(Error::InvalidTransition {
                from: state.step,
                to: CheckoutStep::Summary,
            });
        }
        form.validate()?;
        state.form = Some(form);
        state.step = CheckoutStep::Summary;
        Ok(())
    }

    /// `summary -> payment`, back to editing; the payload is kept
    pub async fn edit_payment(&self) -> Result<(), Error> {
        self.ensure_open()?;
        let mut state = self.inner.write().await;
        if state.step != CheckoutStep::Summary {
            return Err(Error::InvalidTransition {
                from: state.step,
                to: CheckoutStep::Payment,
            });
        }
        state.step = CheckoutStep::Payment;
        Ok(())
    }

    /// `summary -> processing`, creating the transaction
    ///
    /// A fresh reference is synthesized per attempt so retried submissions do
    /// not collide. A network failure during creation resolves locally to an
    /// ERROR result rather than staying pending; it is never retried
    /// automatically. A synchronously terminal response short-circuits to the
    /// result step.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn confirm(&self) -> Result<Transaction, Error> {
        self.ensure_open()?;
        let attempt = self.attempt.fetch_add(1, Ordering::SeqCst) + 1;

        let (request, amount, product_id, product_name, quantity) = {
            let mut state = self.inner.write().await;
            if state.step != CheckoutStep::Summary {
                return Err(Error::InvalidTransition {
                    from: state.step,
                    to: CheckoutStep::Processing,
                });
            }
            let form = state
                .form
                .clone()
                .ok_or(Error::Custom("Payment form required".to_string()))?;

            let subtotal = state
                .unit_price
                .checked_mul(Amount::from(state.quantity))
                .ok_or(tienda_common::amount::Error::AmountOverflow)?;
            let totals = fees::order_total(subtotal)?;

            let request = CreateTransactionRequest {
                product_id: state.product_id.clone(),
                quantity: state.quantity,
                reference: generate_reference(),
                customer_email: form.email.clone(),
                customer_name: Some(form.cardholder_name.clone()),
                customer_phone: Some(form.phone.clone()),
                customer_document: Some(form.document_number.clone()),
                customer_document_type: Some(form.document_type),
                card: CardData::from(&form),
                delivery_info: DeliveryInfo::from(&form),
            };

            state.step = CheckoutStep::Processing;
            (
                request,
                totals.total,
                state.product_id.clone(),
                state.product_name.clone(),
                state.quantity,
            )
        };

        tracing::debug!(
            "Creating transaction {} for product {}",
            request.reference,
            product_id
        );

        match self.storefront.client().post_transaction(request.clone()).await {
            Ok(response) => {
                let transaction = Transaction {
                    id: response.transaction_id,
                    reference: response.reference,
                    amount: response.amount,
                    status: response.status,
                    product_id,
                    product_name: Some(response.product_name),
                    quantity,
                    created_at: unix_time(),
                };

                if transaction.status.is_terminal() {
                    self.apply_result(attempt, transaction.clone()).await?;
                } else {
                    let mut state = self.inner.write().await;
                    state.transaction = Some(transaction.clone());
                    drop(state);
                    self.record_resume(&transaction).await;
                }
                Ok(transaction)
            }
            Err(Error::SessionExpired) => {
                // Auth failures surface to the caller instead of resolving to
                // ERROR; the attempt can be confirmed again after re-login
                let mut state = self.inner.write().await;
                state.step = CheckoutStep::Summary;
                drop(state);
                if let Err(err) = self.storefront.localstore.clear_auth_token().await {
                    tracing::warn!("Failed to clear persisted token: {}", err);
                }
                Err(Error::SessionExpired)
            }
            Err(err) => {
                // The flow still reaches a terminal state: a local ERROR
                // transaction with a synthesized id, never left pending
                tracing::warn!("Transaction creation failed: {}", err);
                let transaction = Transaction {
                    id: generate_local_id(),
                    reference: request.reference,
                    amount,
                    status: TransactionStatus::Error,
                    product_id,
                    product_name: Some(product_name),
                    quantity,
                    created_at: unix_time(),
                };
                self.apply_result(attempt, transaction.clone()).await?;
                if let Err(err) = self.storefront.localstore.clear_checkout_resume().await {
                    tracing::warn!("Failed to clear checkout resume marker: {}", err);
                }
                Ok(transaction)
            }
        }
    }

    /// Wait for the pending transaction to reach a terminal status
    ///
    /// Polls the backend on the storefront's interval; returns the terminal
    /// transaction once applied. Closing the session cancels the wait.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn watch(&self) -> Result<Transaction, Error> {
        let attempt = self.attempt.load(Ordering::SeqCst);
        let pending = {
            let state = self.inner.read().await;
            match &state.transaction {
                Some(transaction) if transaction.status.is_pending() => transaction.clone(),
                Some(transaction) => return Ok(transaction.clone()),
                None => return Err(Error::NoTransaction),
            }
        };

        self.polling.store(true, Ordering::SeqCst);
        let poller = StatusPoller::with_enabled(
            self.storefront.client(),
            self.storefront.poll_interval(),
            Arc::clone(&self.polling),
        );

        match poller.poll_until_terminal(&pending.id).await? {
            Some(response) => {
                let transaction = Transaction {
                    id: response.transaction_id,
                    reference: response.reference,
                    amount: response.amount,
                    status: response.status,
                    product_id: pending.product_id,
                    product_name: response.product_name.or(pending.product_name),
                    quantity: pending.quantity,
                    created_at: pending.created_at,
                };
                self.apply_result(attempt, transaction.clone()).await?;
                Ok(self.transaction().await.unwrap_or(transaction))
            }
            None => Err(Error::SessionClosed),
        }
    }

    /// `result -> summary`, manual retry after DECLINED or ERROR
    ///
    /// The form payload is kept; the next [`confirm`](Self::confirm)
    /// synthesizes a fresh reference.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn retry(&self) -> Result<(), Error> {
        self.ensure_open()?;
        let mut state = self.inner.write().await;
        let status = state.transaction.as_ref().map(|t| t.status);
        match (state.step, status) {
            (
                CheckoutStep::Result,
                Some(TransactionStatus::Declined) | Some(TransactionStatus::Error),
            ) => {
                state.step = CheckoutStep::Summary;
                state.transaction = None;
                Ok(())
            }
            _ => Err(Error::InvalidTransition {
                from: state.step,
                to: CheckoutStep::Summary,
            }),
        }
    }

    /// Close the session
    ///
    /// Disables polling and invalidates any in-flight attempt; their results
    /// are discarded when they land.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.polling.store(false, Ordering::SeqCst);
        self.attempt.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Checkout session closed");
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::SessionClosed)
        }
    }

    /// Apply a terminal outcome for `attempt`
    ///
    /// Discarded when the session has been closed or the attempt superseded.
    async fn apply_result(&self, attempt: u64, transaction: Transaction) -> Result<(), Error> {
        if !self.is_open() || attempt != self.attempt.load(Ordering::SeqCst) {
            tracing::debug!(
                "Discarding stale checkout result for attempt {} ({})",
                attempt,
                transaction.reference
            );
            return Ok(());
        }

        {
            let mut state = self.inner.write().await;
            state.transaction = Some(transaction.clone());
            state.step = CheckoutStep::Result;
        }
        self.polling.store(false, Ordering::SeqCst);

        tracing::debug!(
            "Checkout attempt {} resolved to {}",
            attempt,
            transaction.status
        );

        match transaction.status {
            TransactionStatus::Approved => self.finish_approved(transaction).await?,
            _ => self.record_resume(&transaction).await,
        }
        Ok(())
    }

    /// Success side effects: drop the purchased line, log the purchase and
    /// schedule the automatic close
    async fn finish_approved(&self, transaction: Transaction) -> Result<(), Error> {
        self.storefront.remove_product(&transaction.product_id).await?;

        if let Err(err) = self.storefront.localstore.add_transaction(transaction).await {
            tracing::warn!("Failed to record purchase in history log: {}", err);
        }
        if let Err(err) = self.storefront.localstore.clear_checkout_resume().await {
            tracing::warn!("Failed to clear checkout resume marker: {}", err);
        }

        let session = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(RESULT_AUTO_CLOSE_SECS)).await;
            if session.is_open() {
                session.close().await;
            }
        });
        Ok(())
    }

    /// Write the resume marker for crash recovery
    async fn record_resume(&self, transaction: &Transaction) {
        let step = self.inner.read().await.step;
        let resume = CheckoutResume {
            step,
            transaction_id: transaction.id.clone(),
            reference: transaction.reference.clone(),
            status: Some(transaction.status),
            saved_at: unix_time(),
        };
        if let Err(err) = self.storefront.localstore.set_checkout_resume(resume).await {
            tracing::warn!("Failed to persist checkout resume marker: {}", err);
        }
    }
}
