//! Cart aggregate as seen by the back office.
//!
//! The platform owns carts; the admin only ever holds a read-only, possibly
//! stale copy fetched per customer.

use serde::{Deserialize, Serialize};

use super::{Address, CartId, CustomerId, LineItemId, Money, ProductId};

/// A customer's in-progress order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    /// Optimistic-concurrency version; mutations must present the current value.
    pub version: i64,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    pub total_price: Money,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub billing_address: Option<Address>,
}

impl Cart {
    /// Total number of units across all line items.
    #[must_use]
    pub fn line_item_count(&self) -> u64 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }

    /// The `(id, version)` pair a mutation is keyed on.
    #[must_use]
    pub fn reference(&self) -> CartRef {
        CartRef {
            id: self.id.clone(),
            version: self.version,
        }
    }
}

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Product name in the requested locale, if the product has one.
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: u64,
}

/// Identity and version of a cart, as returned by mutations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartRef {
    pub id: CartId,
    pub version: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line_item(id: &str, quantity: u64) -> LineItem {
        LineItem {
            id: LineItemId::new(id),
            product_id: None,
            name: None,
            quantity,
        }
    }

    #[test]
    fn test_line_item_count_sums_quantities() {
        let cart = Cart {
            id: CartId::new("c-1"),
            version: 3,
            customer_id: None,
            line_items: vec![line_item("a", 2), line_item("b", 3), line_item("c", 0)],
            total_price: Money::new(0, "EUR", 2),
            shipping_address: None,
            billing_address: None,
        };
        assert_eq!(cart.line_item_count(), 5);
    }

    #[test]
    fn test_absent_line_items_count_as_zero() {
        let cart: Cart = serde_json::from_str(
            r#"{
                "id": "c-2",
                "version": 1,
                "totalPrice": {"centAmount": 0, "currencyCode": "EUR", "fractionDigits": 2}
            }"#,
        )
        .unwrap();
        assert!(cart.line_items.is_empty());
        assert_eq!(cart.line_item_count(), 0);
        assert!(cart.shipping_address.is_none());
    }

    #[test]
    fn test_reference_carries_version() {
        let cart: Cart = serde_json::from_str(
            r#"{
                "id": "c-3",
                "version": 7,
                "totalPrice": {"centAmount": 100, "currencyCode": "USD", "fractionDigits": 2}
            }"#,
        )
        .unwrap();
        assert_eq!(
            cart.reference(),
            CartRef {
                id: CartId::new("c-3"),
                version: 7
            }
        );
    }
}
