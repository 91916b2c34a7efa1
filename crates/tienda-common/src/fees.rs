//! Order pricing
//!
//! `total = subtotal + base fee + delivery fee`. The delivery fee is a flat
//! amount, waived when the subtotal is strictly above the free-delivery
//! threshold. These are business invariants of the storefront, not
//! configuration.

use serde::{Deserialize, Serialize};

use crate::amount::{self, Amount};

/// Flat fee applied to every order
pub const BASE_FEE: u64 = 5_000;

/// Flat delivery fee
pub const DELIVERY_FEE: u64 = 8_000;

/// Subtotal above which delivery is free
pub const FREE_DELIVERY_THRESHOLD: u64 = 50_000;

/// Itemized order total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotal {
    /// Sum of line subtotals
    pub subtotal: Amount,
    /// Flat base fee
    pub base_fee: Amount,
    /// Delivery fee, zero when waived
    pub delivery_fee: Amount,
    /// Amount charged
    pub total: Amount,
}

/// Compute the itemized total for an order subtotal
pub fn order_total(subtotal: Amount) -> Result<OrderTotal, amount::Error> {
    let base_fee = Amount::from(BASE_FEE);
    let delivery_fee = if subtotal > Amount::from(FREE_DELIVERY_THRESHOLD) {
        Amount::ZERO
    } else {
        Amount::from(DELIVERY_FEE)
    };

    let total = subtotal
        .checked_add(base_fee)
        .and_then(|amount| amount.checked_add(delivery_fee))
        .ok_or(amount::Error::AmountOverflow)?;

    Ok(OrderTotal {
        subtotal,
        base_fee,
        delivery_fee,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_waived_above_threshold() {
        let totals = order_total(Amount::from(60_000_u64)).expect("total");
        assert_eq!(totals.delivery_fee, Amount::ZERO);
        assert_eq!(totals.total, Amount::from(65_000_u64));
    }

    #[test]
    fn test_delivery_charged_below_threshold() {
        let totals = order_total(Amount::from(30_000_u64)).expect("total");
        assert_eq!(totals.delivery_fee, Amount::from(DELIVERY_FEE));
        assert_eq!(totals.total, Amount::from(43_000_u64));
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly at the threshold still pays delivery
        let totals = order_total(Amount::from(FREE_DELIVERY_THRESHOLD)).expect("total");
        assert_eq!(totals.delivery_fee, Amount::from(DELIVERY_FEE));
        assert_eq!(totals.total, Amount::from(63_000_u64));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(order_total(Amount::from(u64::MAX)).is_err());
    }
}
