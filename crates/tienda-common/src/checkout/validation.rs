//! Checkout form validation
//!
//! Synchronous, field-level validation of the payment+delivery form.
//! All-or-nothing: any failing field blocks submission, and each failing
//! field carries its own human-readable message. Validation is cheap enough
//! to re-run on every field change, which is how the live-validation path
//! uses it.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::CheckoutForm;

static EXPIRY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}$").expect("valid expiry regex"));
static CVV_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,4}$").expect("valid cvv regex"));
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Fields of the checkout form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Card number
    CardNumber,
    /// Expiry date
    ExpiryDate,
    /// Card verification value
    Cvv,
    /// Name on the card
    CardholderName,
    /// Identity document type
    DocumentType,
    /// Identity document number
    DocumentNumber,
    /// Recipient first name
    FirstName,
    /// Recipient last name
    LastName,
    /// Contact email
    Email,
    /// Contact phone
    Phone,
    /// Delivery address
    Address,
    /// Delivery city
    City,
}

impl Field {
    /// Every form field, in display order
    pub const ALL: [Field; 12] = [
        Field::CardNumber,
        Field::ExpiryDate,
        Field::Cvv,
        Field::CardholderName,
        Field::DocumentType,
        Field::DocumentNumber,
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::Address,
        Field::City,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CardNumber => "cardNumber",
            Self::ExpiryDate => "expiryDate",
            Self::Cvv => "cvv",
            Self::CardholderName => "cardholderName",
            Self::DocumentType => "documentType",
            Self::DocumentNumber => "documentNumber",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
        };
        write!(f, "{name}")
    }
}

/// A single failing field with its message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Failing field
    pub field: Field,
    /// Human-readable message
    pub message: String,
}

/// Aggregate of every failing field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    /// One entry per failing field
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Check whether a specific field failed
    pub fn contains(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) failed validation", self.errors.len())
    }
}

impl std::error::Error for ValidationErrors {}

/// Luhn checksum over a digit string
///
/// Doubles every second digit from the rightmost, subtracting 9 from doubled
/// digits above 9; the sum must be divisible by 10.
pub fn luhn_check(digits: &str) -> bool {
    let mut sum = 0u32;
    let mut double = false;
    for c in digits.chars().rev() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        let mut digit = digit;
        if double {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        double = !double;
    }
    sum % 10 == 0
}

impl CheckoutForm {
    /// Validate the whole form
    ///
    /// Collects every failing field; any failure blocks submission.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let errors: Vec<FieldError> = Field::ALL
            .iter()
            .filter_map(|field| self.validate_field(*field))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }

    /// Validate a single field, the live-validation path
    pub fn validate_field(&self, field: Field) -> Option<FieldError> {
        let message = match field {
            Field::CardNumber => {
                let cleaned: String = self
                    .card_number
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                if cleaned.is_empty() {
                    Some("Card number is required")
                } else if cleaned.len() < 13
                    || cleaned.len() > 19
                    || !cleaned.chars().all(|c| c.is_ascii_digit())
                {
                    Some("Card number must be 13 to 19 digits")
                } else if !luhn_check(&cleaned) {
                    Some("Invalid card number")
                } else {
                    None
                }
            }
            Field::ExpiryDate => {
                (!EXPIRY_REGEX.is_match(&self.expiry_date)).then_some("Expiry must be MM/YY")
            }
            Field::Cvv => (!CVV_REGEX.is_match(&self.cvv)).then_some("CVV must be 3 or 4 digits"),
            Field::CardholderName => (self.cardholder_name.trim().chars().count() < 2)
                .then_some("Cardholder name must be at least 2 characters"),
            // The enum cannot hold an out-of-set value
            Field::DocumentType => None,
            Field::DocumentNumber => (self.document_number.trim().chars().count() < 6)
                .then_some("Document number must be at least 6 digits"),
            Field::FirstName => (self.first_name.trim().chars().count() < 2)
                .then_some("First name must be at least 2 characters"),
            Field::LastName => (self.last_name.trim().chars().count() < 2)
                .then_some("Last name must be at least 2 characters"),
            Field::Email => (!EMAIL_REGEX.is_match(self.email.trim())).then_some("Invalid email"),
            Field::Phone => (self.phone.trim().chars().count() < 10)
                .then_some("Phone must be at least 10 digits"),
            Field::Address => (self.address.trim().chars().count() < 10)
                .then_some("Address must be at least 10 characters"),
            Field::City => {
                (self.city.trim().chars().count() < 2).then_some("City must be at least 2 characters")
            }
        };

        message.map(|message| FieldError {
            field,
            message: message.to_string(),
        })
    }
}
