//! Purchase history view
//!
//! Read-only, paginated view over completed transactions. The status filter
//! is applied again client side even when the backend already filtered, so a
//! backend that ignores the filter param still yields correct pages.
//! Pagination is gated by the server-reported `hasNext`/`hasPrev`.

use tienda_common::api::TransactionRecord;
use tienda_common::transaction::{StatusFilter, Transaction};
use tienda_common::Error;
use tracing::instrument;

use super::Storefront;

/// One page of the history view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    /// Transactions on this page, after client-side filtering
    pub transactions: Vec<TransactionRecord>,
    /// Total matching transactions, as reported by the server
    pub total: u64,
    /// Page number, 1-based
    pub page: u32,
    /// Total pages
    pub total_pages: u32,
    /// Whether a next page exists
    pub has_next: bool,
    /// Whether a previous page exists
    pub has_prev: bool,
}

impl HistoryView {
    /// Next page number, when the server reports one
    pub fn next_page(&self) -> Option<u32> {
        self.has_next.then(|| self.page.saturating_add(1))
    }

    /// Previous page number, when the server reports one
    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev.then(|| self.page.saturating_sub(1).max(1))
    }
}

impl Storefront {
    /// Fetch a page of transaction history
    #[instrument(skip(self))]
    pub async fn transaction_history(
        &self,
        page: u32,
        filter: StatusFilter,
    ) -> Result<HistoryView, Error> {
        let response = self
            .guard_session(self.client().get_history(page, filter).await)
            .await?;

        // Defensive double-filtering; correct even if the backend ignored
        // the filter param
        let transactions = response
            .transactions
            .into_iter()
            .filter(|t| filter.matches(t.status))
            .collect();

        Ok(HistoryView {
            transactions,
            total: response.total,
            page: response.page,
            total_pages: response.total_pages,
            has_next: response.has_next,
            has_prev: response.has_prev,
        })
    }

    /// Purchases recorded locally by approved checkouts, newest first
    pub async fn local_purchases(&self, filter: StatusFilter) -> Result<Vec<Transaction>, Error> {
        Ok(self.localstore.list_transactions(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_gated_by_server_flags() {
        let view = HistoryView {
            transactions: Vec::new(),
            total: 40,
            page: 2,
            total_pages: 4,
            has_next: true,
            has_prev: true,
        };
        assert_eq!(view.next_page(), Some(3));
        assert_eq!(view.prev_page(), Some(1));

        let last = HistoryView {
            has_next: false,
            has_prev: true,
            page: 4,
            ..view.clone()
        };
        assert_eq!(last.next_page(), None);
        assert_eq!(last.prev_page(), Some(3));
    }
}
