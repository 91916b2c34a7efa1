//! Transaction types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Amount;

/// Transaction Error
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown transaction status
    #[error("Unknown transaction status")]
    UnknownStatus,
}

/// Possible states of a transaction
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// Awaiting confirmation from the payment gateway
    #[default]
    Pending,
    /// Payment approved
    Approved,
    /// Payment declined by the gateway
    Declined,
    /// Creation or processing failed
    Error,
}

impl TransactionStatus {
    /// Check if the transaction is still awaiting confirmation
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Terminal statuses accept no further mutation
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Declined => write!(f, "DECLINED"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(status: &str) -> Result<Self, Self::Err> {
        match status {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "DECLINED" => Ok(Self::Declined),
            "ERROR" => Ok(Self::Error),
            _ => Err(Error::UnknownStatus),
        }
    }
}

/// Status filter for history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// All statuses
    #[default]
    All,
    /// A single status
    Status(TransactionStatus),
}

impl StatusFilter {
    /// Check whether a status passes the filter
    pub fn matches(&self, status: TransactionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Status(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "ALL"),
            Self::Status(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(filter: &str) -> Result<Self, Self::Err> {
        match filter {
            "ALL" => Ok(Self::All),
            status => Ok(Self::Status(TransactionStatus::from_str(status)?)),
        }
    }
}

/// A purchase attempt against the payment gateway
///
/// Created in PENDING state when checkout submission succeeds against the
/// backend and mutated only by status observations; terminal statuses are
/// never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction id assigned by the backend, or synthesized locally when
    /// creation failed before the backend assigned one
    pub id: String,
    /// Opaque correlation key, unique per checkout attempt
    pub reference: String,
    /// Amount charged, fees included
    pub amount: Amount,
    /// Current status
    pub status: TransactionStatus,
    /// Purchased product
    pub product_id: String,
    /// Product display name, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub product_name: Option<String>,
    /// Purchased quantity
    pub quantity: u32,
    /// Unix timestamp of creation
    pub created_at: u64,
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Transaction {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.created_at
            .cmp(&other.created_at)
            .reverse()
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_uppercase() {
        let json = serde_json::to_string(&TransactionStatus::Approved).expect("serialize");
        assert_eq!(json, "\"APPROVED\"");
        let status: TransactionStatus = serde_json::from_str("\"DECLINED\"").expect("deserialize");
        assert_eq!(status, TransactionStatus::Declined);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            TransactionStatus::from_str("PENDING").expect("parse"),
            TransactionStatus::Pending
        );
        assert!(TransactionStatus::from_str("REFUNDED").is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(TransactionStatus::Pending.is_pending());
        assert!(TransactionStatus::Approved.is_terminal());
        assert!(TransactionStatus::Declined.is_terminal());
        assert!(TransactionStatus::Error.is_terminal());
    }

    #[test]
    fn test_filter_matches() {
        let statuses = [
            TransactionStatus::Approved,
            TransactionStatus::Pending,
            TransactionStatus::Declined,
            TransactionStatus::Error,
        ];

        let approved = StatusFilter::Status(TransactionStatus::Approved);
        let matching: Vec<_> = statuses.iter().filter(|s| approved.matches(**s)).collect();
        assert_eq!(matching.len(), 1);

        let all: Vec<_> = statuses
            .iter()
            .filter(|s| StatusFilter::All.matches(**s))
            .collect();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!(StatusFilter::from_str("ALL").expect("parse"), StatusFilter::All);
        assert_eq!(
            StatusFilter::from_str("ERROR").expect("parse"),
            StatusFilter::Status(TransactionStatus::Error)
        );
        assert!(StatusFilter::from_str("SOMETIMES").is_err());
    }

    #[test]
    fn test_transactions_sort_newest_first() {
        let transaction = |id: &str, created_at: u64| Transaction {
            id: id.to_string(),
            reference: format!("TXN_{id}"),
            amount: Amount::from(1_000_u64),
            status: TransactionStatus::Approved,
            product_id: "prod-1".to_string(),
            product_name: None,
            quantity: 1,
            created_at,
        };

        let mut transactions = vec![
            transaction("a", 10),
            transaction("b", 30),
            transaction("c", 20),
        ];
        transactions.sort();

        let ids: Vec<_> = transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }
}
