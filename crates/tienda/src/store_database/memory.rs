//! Storefront in memory database

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tienda_common::cart::CartState;
use tienda_common::checkout::CheckoutResume;
use tienda_common::database::{Database, Error};
use tienda_common::transaction::{StatusFilter, Transaction};
use tokio::sync::RwLock;

/// Storefront in Memory Database
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreDatabase {
    cart: Arc<RwLock<Option<CartState>>>,
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
    checkout_resume: Arc<RwLock<Option<CheckoutResume>>>,
    auth_token: Arc<RwLock<Option<String>>>,
}

impl MemoryStoreDatabase {
    /// Create new [`MemoryStoreDatabase`] seeded with transactions
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            cart: Arc::new(RwLock::new(None)),
            transactions: Arc::new(RwLock::new(
                transactions
                    .into_iter()
                    .map(|t| (t.id.clone(), t))
                    .collect(),
            )),
            checkout_resume: Arc::new(RwLock::new(None)),
            auth_token: Arc::new(RwLock::new(None)),
        }
    }
}

#[async_trait]
impl Database for MemoryStoreDatabase {
    async fn get_cart(&self) -> Result<Option<CartState>, Error> {
        Ok(self.cart.read().await.clone())
    }

    async fn set_cart(&self, cart: CartState) -> Result<(), Error> {
        *self.cart.write().await = Some(cart);
        Ok(())
    }

    async fn clear_cart(&self) -> Result<(), Error> {
        self.cart.write().await.take();
        Ok(())
    }

    async fn add_transaction(&self, transaction: Transaction) -> Result<(), Error> {
        self.transactions
            .write()
            .await
            .insert(transaction.id.clone(), transaction);
        Ok(())
    }

    async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>, Error> {
        Ok(self.transactions.read().await.get(id).cloned())
    }

    async fn list_transactions(&self, filter: StatusFilter) -> Result<Vec<Transaction>, Error> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .read()
            .await
            .values()
            .filter(|t| filter.matches(t.status))
            .cloned()
            .collect();
        transactions.sort();
        Ok(transactions)
    }

    async fn remove_transaction(&self, id: &str) -> Result<(), Error> {
        self.transactions.write().await.remove(id);
        Ok(())
    }

    async fn set_checkout_resume(&self, resume: CheckoutResume) -> Result<(), Error> {
        *self.checkout_resume.write().await = Some(resume);
        Ok(())
    }

    async fn get_checkout_resume(&self) -> Result<Option<CheckoutResume>, Error> {
        Ok(self.checkout_resume.read().await.clone())
    }

    async fn clear_checkout_resume(&self) -> Result<(), Error> {
        self.checkout_resume.write().await.take();
        Ok(())
    }

    async fn set_auth_token(&self, token: String) -> Result<(), Error> {
        *self.auth_token.write().await = Some(token);
        Ok(())
    }

    async fn get_auth_token(&self) -> Result<Option<String>, Error> {
        Ok(self.auth_token.read().await.clone())
    }

    async fn clear_auth_token(&self) -> Result<(), Error> {
        self.auth_token.write().await.take();
        Ok(())
    }
}
