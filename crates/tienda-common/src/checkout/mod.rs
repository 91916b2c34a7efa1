//! Checkout types
//!
//! Step enumeration, the payment+delivery form and the persisted resume
//! marker for the multi-step checkout flow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transaction::TransactionStatus;

pub mod validation;

pub use validation::{Field, FieldError, ValidationErrors};

/// Seconds an interrupted checkout stays resumable
pub const RESUME_VALIDITY_SECS: u64 = 30 * 60;

/// Checkout Error
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown checkout step
    #[error("Unknown checkout step")]
    UnknownStep,
    /// Unknown document type
    #[error("Unknown document type")]
    UnknownDocumentType,
}

/// Steps of the checkout flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    /// Card and delivery data entry
    #[default]
    Payment,
    /// Order review before confirmation
    Summary,
    /// Transaction created, awaiting a terminal status
    Processing,
    /// Terminal view for the attempt
    Result,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payment => write!(f, "payment"),
            Self::Summary => write!(f, "summary"),
            Self::Processing => write!(f, "processing"),
            Self::Result => write!(f, "result"),
        }
    }
}

impl FromStr for CheckoutStep {
    type Err = Error;

    fn from_str(step: &str) -> Result<Self, Self::Err> {
        match step {
            "payment" => Ok(Self::Payment),
            "summary" => Ok(Self::Summary),
            "processing" => Ok(Self::Processing),
            "result" => Ok(Self::Result),
            _ => Err(Error::UnknownStep),
        }
    }
}

/// Identity document types accepted by the payment gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    /// Cedula de ciudadania
    #[default]
    Cc,
    /// Cedula de extranjeria
    Ce,
    /// NIT
    Nit,
    /// Passport
    Pp,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cc => write!(f, "CC"),
            Self::Ce => write!(f, "CE"),
            Self::Nit => write!(f, "NIT"),
            Self::Pp => write!(f, "PP"),
        }
    }
}

impl FromStr for DocumentType {
    type Err = Error;

    fn from_str(document_type: &str) -> Result<Self, Self::Err> {
        match document_type {
            "CC" => Ok(Self::Cc),
            "CE" => Ok(Self::Ce),
            "NIT" => Ok(Self::Nit),
            "PP" => Ok(Self::Pp),
            _ => Err(Error::UnknownDocumentType),
        }
    }
}

/// Payment and delivery data entered on the payment step
///
/// Card fields never leave the client unvalidated; see [`validation`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    /// Card number, whitespace allowed
    pub card_number: String,
    /// Expiry in MM/YY
    pub expiry_date: String,
    /// Card verification value
    pub cvv: String,
    /// Name on the card
    pub cardholder_name: String,
    /// Identity document type
    pub document_type: DocumentType,
    /// Identity document number
    pub document_number: String,
    /// Recipient first name
    pub first_name: String,
    /// Recipient last name
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Delivery address
    pub address: String,
    /// Delivery city
    pub city: String,
}

/// Persisted marker for an in-progress checkout
///
/// Written when a transaction is created and updated on terminal statuses so
/// an interrupted session can pick up where it left off. Markers older than
/// [`RESUME_VALIDITY_SECS`] are discarded on read even if present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResume {
    /// Step the session had reached
    pub step: CheckoutStep,
    /// Backend transaction id
    pub transaction_id: String,
    /// Attempt correlation key
    pub reference: String,
    /// Last observed status, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    /// Unix timestamp the marker was written
    pub saved_at: u64,
}

impl CheckoutResume {
    /// Check whether the marker has outlived its validity window
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.saved_at) >= RESUME_VALIDITY_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_round_trip() {
        for step in [
            CheckoutStep::Payment,
            CheckoutStep::Summary,
            CheckoutStep::Processing,
            CheckoutStep::Result,
        ] {
            let parsed = CheckoutStep::from_str(&step.to_string()).expect("parse");
            assert_eq!(parsed, step);
        }
        assert!(CheckoutStep::from_str("receipt").is_err());
    }

    #[test]
    fn test_document_type_serde() {
        let json = serde_json::to_string(&DocumentType::Nit).expect("serialize");
        assert_eq!(json, "\"NIT\"");
        let parsed: DocumentType = serde_json::from_str("\"PP\"").expect("deserialize");
        assert_eq!(parsed, DocumentType::Pp);
    }

    #[test]
    fn test_resume_expiry_window() {
        let resume = CheckoutResume {
            step: CheckoutStep::Processing,
            transaction_id: "txn-1".to_string(),
            reference: "TXN_1_abc".to_string(),
            status: None,
            saved_at: 1_000,
        };

        assert!(!resume.is_expired(1_000 + RESUME_VALIDITY_SECS - 1));
        assert!(resume.is_expired(1_000 + RESUME_VALIDITY_SECS));
    }
}
