//! Backend API wire types
//!
//! Shapes of the REST backend's requests and responses. The backend wraps
//! payloads in a `{success, message, data, statusCode}` envelope and
//! transmits catalog prices in minor units (cents); prices are converted to
//! [`Amount`] exactly once, when a wire record is mapped into its domain
//! type. Transaction amounts travel in whole units since they are computed
//! client side.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cart::CartProduct;
use crate::checkout::{CheckoutForm, DocumentType};
use crate::transaction::TransactionStatus;
use crate::Amount;

/// Response envelope used by every backend endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct Envelope<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Payload
    pub data: T,
    /// HTTP-ish status code echoed in the body
    #[serde(default)]
    pub status_code: u16,
}

/// Error body returned by the backend on failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// HTTP-ish status code echoed in the body
    #[serde(default)]
    pub status_code: u16,
}

impl ErrorResponse {
    /// Parse an error body from a raw response string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Login request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Login response carrying the bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token attached to subsequent requests
    pub access_token: String,
}

/// Registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Display name
    pub name: String,
}

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User id
    pub id: String,
    /// Account email
    pub email: String,
    /// Display name
    pub name: String,
    /// ISO creation timestamp
    #[serde(default)]
    pub created_at: Option<String>,
    /// ISO update timestamp
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Product as served by the catalog, price in cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Product id
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Price in cents
    pub price: u64,
    /// Pre-discount price in cents
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub original_price: Option<u64>,
    /// Image URL
    #[serde(default)]
    pub image: String,
    /// Category
    #[serde(default)]
    pub category: String,
    /// Available stock
    pub stock: u32,
    /// Featured on the home page
    #[serde(default)]
    pub featured: bool,
    /// Stock keeping unit
    #[serde(default)]
    pub sku: String,
}

/// Domain product with the price converted to whole units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Unit price in whole currency units
    pub price: Amount,
    /// Pre-discount price in whole currency units
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub original_price: Option<Amount>,
    /// Image URL
    pub image: String,
    /// Category
    pub category: String,
    /// Available stock
    pub stock: u32,
    /// Featured on the home page
    pub featured: bool,
    /// Stock keeping unit
    pub sku: String,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            price: Amount::from_cents(record.price),
            original_price: record.original_price.map(Amount::from_cents),
            image: record.image,
            category: record.category,
            stock: record.stock,
            featured: record.featured,
            sku: record.sku,
        }
    }
}

impl Product {
    /// Fields needed to open a cart line for this product
    pub fn to_cart_product(&self) -> CartProduct {
        CartProduct {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Paginated product page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsPage {
    /// Products on this page
    pub products: Vec<ProductRecord>,
    /// Total matching products
    pub total: u64,
    /// Page number, 1-based
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total pages
    pub total_pages: u32,
    /// Whether a next page exists
    pub has_next: bool,
    /// Whether a previous page exists
    pub has_prev: bool,
}

/// Product listing query parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    /// Page number, 1-based
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Category filter
    pub category: Option<String>,
    /// Only featured products
    pub featured: Option<bool>,
    /// Free-text search
    pub search: Option<String>,
    /// Minimum price in cents
    pub min_price: Option<u64>,
    /// Maximum price in cents
    pub max_price: Option<u64>,
}

impl ProductsQuery {
    /// Render the set parameters as query pairs
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(category) = &self.category {
            if category != "all" {
                pairs.push(("category".to_string(), category.clone()));
            }
        }
        if let Some(true) = self.featured {
            pairs.push(("featured".to_string(), "true".to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("minPrice".to_string(), min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("maxPrice".to_string(), max_price.to_string()));
        }
        pairs
    }
}

/// Card fields forwarded to the payment gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    /// Card number, whitespace stripped
    pub card_number: String,
    /// Expiry in MM/YY
    pub expiry_date: String,
    /// Card verification value
    pub cvv: String,
    /// Name on the card
    pub cardholder_name: String,
}

impl From<&CheckoutForm> for CardData {
    fn from(form: &CheckoutForm) -> Self {
        Self {
            card_number: form
                .card_number
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect(),
            expiry_date: form.expiry_date.clone(),
            cvv: form.cvv.clone(),
            cardholder_name: form.cardholder_name.clone(),
        }
    }
}

/// Delivery fields forwarded with a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
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
    /// Department or region
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub department: Option<String>,
    /// Postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Country
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub country: Option<String>,
    /// Free-form delivery instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub special_instructions: Option<String>,
}

impl From<&CheckoutForm> for DeliveryInfo {
    fn from(form: &CheckoutForm) -> Self {
        Self {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            address: form.address.clone(),
            city: form.city.clone(),
            department: None,
            postal_code: None,
            country: None,
            special_instructions: None,
        }
    }
}

/// Transaction creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// Purchased product
    pub product_id: String,
    /// Purchased quantity
    pub quantity: u32,
    /// Attempt correlation key, unique per attempt
    pub reference: String,
    /// Customer email
    pub customer_email: String,
    /// Customer display name
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Customer phone
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Customer identity document number
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub customer_document: Option<String>,
    /// Customer identity document type
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub customer_document_type: Option<DocumentType>,
    /// Card fields for the payment gateway
    pub card: CardData,
    /// Delivery information
    pub delivery_info: DeliveryInfo,
}

/// Transaction creation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionResponse {
    /// Assigned transaction id
    pub transaction_id: String,
    /// Attempt correlation key
    pub reference: String,
    /// Initial status, usually PENDING
    pub status: TransactionStatus,
    /// Amount charged in whole units
    pub amount: Amount,
    /// Product display name
    pub product_name: String,
    /// Purchased quantity
    pub quantity: u32,
    /// URL to poll for the status
    #[serde(default)]
    pub status_url: String,
    /// Whether the gateway will push a webhook
    #[serde(default)]
    pub webhook_enabled: bool,
}

/// Transaction status poll response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatusResponse {
    /// Transaction id
    pub transaction_id: String,
    /// Attempt correlation key
    pub reference: String,
    /// Current status
    pub status: TransactionStatus,
    /// Amount charged in whole units
    pub amount: Amount,
    /// Product display name
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub product_name: Option<String>,
    /// Purchased quantity
    #[serde(default)]
    pub quantity: u32,
    /// Whether the transaction is still pending
    pub is_pending: bool,
    /// Whether the transaction reached a terminal status
    pub is_completed: bool,
    /// Whether the gateway allows a retry
    #[serde(default)]
    pub can_retry: bool,
    /// ISO creation timestamp
    #[serde(default)]
    pub created_at: Option<String>,
    /// ISO update timestamp
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Transaction as served by the history endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Transaction id
    pub id: String,
    /// Attempt correlation key
    pub reference: String,
    /// Current status
    pub status: TransactionStatus,
    /// Product display name
    #[serde(default)]
    pub product_name: String,
    /// Purchased quantity
    #[serde(default)]
    pub quantity: u32,
    /// Amount charged in whole units
    pub amount: Amount,
    /// Customer email
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub customer_email: Option<String>,
    /// ISO creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// ISO update timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Delivery progress, when assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub delivery_status: Option<String>,
    /// Carrier tracking code, when shipped
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub tracking_code: Option<String>,
}

/// Paginated transaction history page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    /// Transactions on this page
    pub transactions: Vec<TransactionRecord>,
    /// Total matching transactions
    pub total: u64,
    /// Page number, 1-based
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total pages
    pub total_pages: u32,
    /// Whether a next page exists
    pub has_next: bool,
    /// Whether a previous page exists
    pub has_prev: bool,
}
