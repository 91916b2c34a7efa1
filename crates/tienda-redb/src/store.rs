//! Redb Storefront Database

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};
use tienda_common::cart::CartState;
use tienda_common::checkout::CheckoutResume;
use tienda_common::database::{self, Database as StoreDatabase};
use tienda_common::transaction::{StatusFilter, Transaction};
use tracing::instrument;

use crate::error::Error;

// <Key, Json>
const CONFIG_TABLE: TableDefinition<&str, &str> = TableDefinition::new("config");
// <Transaction_id, Json>
const TRANSACTIONS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("transactions");

const CART_KEY: &str = "cart";
const CHECKOUT_RESUME_KEY: &str = "checkout_resume";
const AUTH_TOKEN_KEY: &str = "auth_token";

/// Redb Storefront Database
#[derive(Debug, Clone)]
pub struct RedbStoreDatabase {
    db: Arc<Database>,
}

impl RedbStoreDatabase {
    /// Create new [`RedbStoreDatabase`]
    #[instrument(skip_all)]
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let db = Database::create(path)?;

        // Open all tables once so later reads never hit a missing table
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CONFIG_TABLE)?;
            let _ = write_txn.open_table(TRANSACTIONS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn set_config(&self, key: &str, value: &str) -> Result<(), Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CONFIG_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_config(&self, key: &str) -> Result<Option<String>, Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONFIG_TABLE)?;
        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }

    fn remove_config(&self, key: &str) -> Result<(), Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CONFIG_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl StoreDatabase for RedbStoreDatabase {
    async fn get_cart(&self) -> Result<Option<CartState>, database::Error> {
        match self.get_config(CART_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set_cart(&self, cart: CartState) -> Result<(), database::Error> {
        let json = serde_json::to_string(&cart)?;
        Ok(self.set_config(CART_KEY, &json)?)
    }

    async fn clear_cart(&self) -> Result<(), database::Error> {
        Ok(self.remove_config(CART_KEY)?)
    }

    async fn add_transaction(&self, transaction: Transaction) -> Result<(), database::Error> {
        let json = serde_json::to_string(&transaction)?;

        let write_txn = self.db.begin_write().map_err(Error::from)?;
        {
            let mut table = write_txn
                .open_table(TRANSACTIONS_TABLE)
                .map_err(Error::from)?;
            table
                .insert(transaction.id.as_str(), json.as_str())
                .map_err(Error::from)?;
        }
        write_txn.commit().map_err(Error::from)?;
        Ok(())
    }

    async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>, database::Error> {
        let read_txn = self.db.begin_read().map_err(Error::from)?;
        let table = read_txn
            .open_table(TRANSACTIONS_TABLE)
            .map_err(Error::from)?;

        match table.get(id).map_err(Error::from)? {
            Some(guard) => Ok(Some(serde_json::from_str(guard.value())?)),
            None => Ok(None),
        }
    }

    async fn list_transactions(
        &self,
        filter: StatusFilter,
    ) -> Result<Vec<Transaction>, database::Error> {
        let read_txn = self.db.begin_read().map_err(Error::from)?;
        let table = read_txn
            .open_table(TRANSACTIONS_TABLE)
            .map_err(Error::from)?;

        let mut transactions = Vec::new();
        for entry in table.iter().map_err(Error::from)? {
            let (_, value) = entry.map_err(Error::from)?;
            let transaction: Transaction = serde_json::from_str(value.value())?;
            if filter.matches(transaction.status) {
                transactions.push(transaction);
            }
        }
        transactions.sort();
        Ok(transactions)
    }

    async fn remove_transaction(&self, id: &str) -> Result<(), database::Error> {
        let write_txn = self.db.begin_write().map_err(Error::from)?;
        {
            let mut table = write_txn
                .open_table(TRANSACTIONS_TABLE)
                .map_err(Error::from)?;
            table.remove(id).map_err(Error::from)?;
        }
        write_txn.commit().map_err(Error::from)?;
        Ok(())
    }

    async fn set_checkout_resume(&self, resume: CheckoutResume) -> Result<(), database::Error> {
        let json = serde_json::to_string(&resume)?;
        Ok(self.set_config(CHECKOUT_RESUME_KEY, &json)?)
    }

    async fn get_checkout_resume(&self) -> Result<Option<CheckoutResume>, database::Error> {
        match self.get_config(CHECKOUT_RESUME_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn clear_checkout_resume(&self) -> Result<(), database::Error> {
        Ok(self.remove_config(CHECKOUT_RESUME_KEY)?)
    }

    async fn set_auth_token(&self, token: String) -> Result<(), database::Error> {
        Ok(self.set_config(AUTH_TOKEN_KEY, &token)?)
    }

    async fn get_auth_token(&self) -> Result<Option<String>, database::Error> {
        Ok(self.get_config(AUTH_TOKEN_KEY)?)
    }

    async fn clear_auth_token(&self) -> Result<(), database::Error> {
        Ok(self.remove_config(AUTH_TOKEN_KEY)?)
    }
}
