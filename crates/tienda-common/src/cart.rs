//! Cart state
//!
//! Line items keyed by product id, with derived totals. Totals are always
//! recomputed from scratch after a mutation rather than adjusted in place,
//! so a missed update cannot drift them out of sync with the items.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::amount::{self, Amount};

/// Product fields needed to open a cart line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    /// Product id
    pub id: String,
    /// Display name
    pub name: String,
    /// Unit price in whole currency units
    pub price: Amount,
    /// Available stock, the quantity ceiling
    pub stock: u32,
}

/// Cart line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id
    pub id: String,
    /// Display name
    pub name: String,
    /// Unit price in whole currency units
    pub price: Amount,
    /// Available stock, the quantity ceiling
    pub stock: u32,
    /// Quantity in the cart, `1 <= quantity <= stock`
    pub quantity: u32,
}

impl CartItem {
    /// Line subtotal
    pub fn subtotal(&self) -> Result<Amount, amount::Error> {
        self.price
            .checked_mul(Amount::from(self.quantity))
            .ok_or(amount::Error::AmountOverflow)
    }
}

/// Whole-cart snapshot
///
/// Persisted as a unit after every mutation and restored as a unit at
/// startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Line items keyed by product id
    pub items: HashMap<String, CartItem>,
    /// Sum of line quantities
    pub total_quantity: u32,
    /// Sum of line subtotals
    pub total_amount: Amount,
}

impl CartState {
    /// Check if the cart has no line items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product to the cart
    ///
    /// An existing line is raised toward its stock ceiling, excess silently
    /// clamped. A new line starts at `quantity` clamped to `[1, stock]`.
    pub fn add_product(
        &mut self,
        product: CartProduct,
        quantity: u32,
    ) -> Result<(), amount::Error> {
        match self.items.get_mut(&product.id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(quantity).min(item.stock);
            }
            None => {
                let quantity = quantity.clamp(1, product.stock.max(1));
                self.items.insert(
                    product.id.clone(),
                    CartItem {
                        id: product.id,
                        name: product.name,
                        price: product.price,
                        stock: product.stock,
                        quantity,
                    },
                );
            }
        }
        self.recompute()
    }

    /// Delete a line unconditionally; returns whether it was present
    pub fn remove_product(&mut self, id: &str) -> Result<bool, amount::Error> {
        let removed = self.items.remove(id).is_some();
        self.recompute()?;
        Ok(removed)
    }

    /// Raise a line quantity by one, clamped at the stock ceiling
    pub fn increment_item(&mut self, id: &str) -> Result<bool, amount::Error> {
        let Some(item) = self.items.get_mut(id) else {
            return Ok(false);
        };
        if item.quantity >= item.stock {
            return Ok(false);
        }
        item.quantity += 1;
        self.recompute()?;
        Ok(true)
    }

    /// Lower a line quantity by one; at quantity one the line is removed
    /// instead of going to zero
    pub fn decrement_item(&mut self, id: &str) -> Result<bool, amount::Error> {
        let Some(item) = self.items.get_mut(id) else {
            return Ok(false);
        };
        if item.quantity == 1 {
            self.items.remove(id);
        } else {
            item.quantity -= 1;
        }
        self.recompute()?;
        Ok(true)
    }

    /// Set an absolute quantity; rejected as a no-op when out of `[1, stock]`
    pub fn update_quantity(&mut self, id: &str, quantity: u32) -> Result<bool, amount::Error> {
        let Some(item) = self.items.get_mut(id) else {
            return Ok(false);
        };
        if quantity == 0 || quantity > item.stock {
            return Ok(false);
        }
        item.quantity = quantity;
        self.recompute()?;
        Ok(true)
    }

    /// Empty all lines and zero the totals
    pub fn clear(&mut self) {
        self.items.clear();
        self.total_quantity = 0;
        self.total_amount = Amount::ZERO;
    }

    /// Overwrite this cart from a persisted snapshot
    ///
    /// Only applied when the in-memory cart is empty, so stale storage never
    /// clobbers live edits; returns whether the snapshot was applied.
    pub fn restore(&mut self, snapshot: CartState) -> bool {
        if !self.is_empty() {
            return false;
        }
        *self = snapshot;
        true
    }

    fn recompute(&mut self) -> Result<(), amount::Error> {
        self.total_quantity = self.items.values().map(|item| item.quantity).sum();
        self.total_amount = Amount::try_sum(
            self.items
                .values()
                .map(CartItem::subtotal)
                .collect::<Result<Vec<_>, _>>()?,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: u64, stock: u32) -> CartProduct {
        CartProduct {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: Amount::from(price),
            stock,
        }
    }

    fn assert_totals(cart: &CartState) {
        let quantity: u32 = cart.items.values().map(|i| i.quantity).sum();
        let amount = Amount::try_sum(
            cart.items
                .values()
                .map(|i| i.subtotal().expect("subtotal")),
        )
        .expect("sum");
        assert_eq!(cart.total_quantity, quantity);
        assert_eq!(cart.total_amount, amount);
    }

    #[test]
    fn test_totals_hold_after_every_mutation() {
        let mut cart = CartState::default();

        cart.add_product(product("a", 1_500, 5), 1).expect("add");
        assert_totals(&cart);

        cart.add_product(product("b", 20_000, 2), 2).expect("add");
        assert_totals(&cart);

        cart.increment_item("a").expect("increment");
        assert_totals(&cart);

        cart.decrement_item("b").expect("decrement");
        assert_totals(&cart);

        cart.update_quantity("a", 4).expect("update");
        assert_totals(&cart);

        cart.remove_product("b").expect("remove");
        assert_totals(&cart);

        assert_eq!(cart.total_quantity, 4);
        assert_eq!(cart.total_amount, Amount::from(6_000_u64));
    }

    #[test]
    fn test_add_existing_clamps_at_stock() {
        let mut cart = CartState::default();
        cart.add_product(product("a", 1_000, 3), 1).expect("add");
        cart.add_product(product("a", 1_000, 3), 10).expect("add");

        assert_eq!(cart.items["a"].quantity, 3);
        assert_totals(&cart);
    }

    #[test]
    fn test_increment_never_exceeds_stock() {
        let mut cart = CartState::default();
        cart.add_product(product("a", 1_000, 2), 2).expect("add");

        assert!(!cart.increment_item("a").expect("increment"));
        assert_eq!(cart.items["a"].quantity, 2);
    }

    #[test]
    fn test_decrement_at_one_removes_line() {
        let mut cart = CartState::default();
        cart.add_product(product("a", 1_000, 5), 1).expect("add");

        assert!(cart.decrement_item("a").expect("decrement"));
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity, 0);
        assert_eq!(cart.total_amount, Amount::ZERO);
    }

    #[test]
    fn test_update_quantity_rejects_out_of_range() {
        let mut cart = CartState::default();
        cart.add_product(product("a", 1_000, 3), 2).expect("add");

        assert!(!cart.update_quantity("a", 0).expect("update"));
        assert!(!cart.update_quantity("a", 4).expect("update"));
        assert_eq!(cart.items["a"].quantity, 2);

        assert!(cart.update_quantity("a", 3).expect("update"));
        assert_eq!(cart.items["a"].quantity, 3);
    }

    #[test]
    fn test_mutations_on_missing_lines_are_noops() {
        let mut cart = CartState::default();
        assert!(!cart.increment_item("missing").expect("increment"));
        assert!(!cart.decrement_item("missing").expect("decrement"));
        assert!(!cart.update_quantity("missing", 2).expect("update"));
        assert!(!cart.remove_product("missing").expect("remove"));
    }

    #[test]
    fn test_restore_only_into_empty_cart() {
        let mut snapshot = CartState::default();
        snapshot
            .add_product(product("a", 2_500, 4), 2)
            .expect("add");

        let mut cart = CartState::default();
        assert!(cart.restore(snapshot.clone()));
        assert_eq!(cart, snapshot);

        let mut live = CartState::default();
        live.add_product(product("b", 9_000, 1), 1).expect("add");
        let before = live.clone();
        assert!(!live.restore(snapshot));
        assert_eq!(live, before);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut cart = CartState::default();
        cart.add_product(product("a", 60_000, 3), 1).expect("add");
        cart.add_product(product("b", 1_500, 10), 4).expect("add");

        let json = serde_json::to_string(&cart).expect("serialize");
        let restored: CartState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, cart);
    }
}
