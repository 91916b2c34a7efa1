//! Product browsing
//!
//! Paginated listing and search over the catalog. Prices cross the API
//! boundary in cents and are converted to whole units here, exactly once.

use tienda_common::api::{Product, ProductsPage, ProductsQuery};
use tienda_common::Error;
use tracing::instrument;

use super::Storefront;

/// One page of domain products
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    /// Products on this page, prices in whole units
    pub products: Vec<Product>,
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

impl From<ProductsPage> for ProductListing {
    fn from(page: ProductsPage) -> Self {
        Self {
            products: page.products.into_iter().map(Product::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
            has_next: page.has_next,
            has_prev: page.has_prev,
        }
    }
}

impl ProductListing {
    /// An empty result page is an empty state, not an error
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Storefront {
    /// Paginated product listing
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductsQuery) -> Result<ProductListing, Error> {
        let page = self.client().get_products(query).await?;
        Ok(ProductListing::from(page))
    }

    /// Paginated product search
    #[instrument(skip(self))]
    pub async fn search_products(&self, term: &str, page: u32) -> Result<ProductListing, Error> {
        let page = self.client().get_products_search(term, page).await?;
        Ok(ProductListing::from(page))
    }
}

#[cfg(test)]
mod tests {
    use tienda_common::api::ProductRecord;
    use tienda_common::Amount;

    use super::*;

    #[test]
    fn test_listing_converts_prices() {
        let page = ProductsPage {
            products: vec![ProductRecord {
                id: "prod-1".to_string(),
                name: "Audifonos".to_string(),
                description: String::new(),
                price: 3_000_000,
                original_price: None,
                image: String::new(),
                category: "tech".to_string(),
                stock: 3,
                featured: true,
                sku: "SKU-9".to_string(),
            }],
            total: 1,
            page: 1,
            limit: 12,
            total_pages: 1,
            has_next: false,
            has_prev: false,
        };

        let listing = ProductListing::from(page);
        assert_eq!(listing.products[0].price, Amount::from(30_000_u64));
        assert!(!listing.is_empty());
    }
}
