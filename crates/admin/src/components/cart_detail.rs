//! Detail view shown when a cart row is opened.

use cart_manager_core::{Cart, format_address};
use serde::Serialize;

use crate::messages::{MessageKey, Messages};

/// One line item as listed on the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    pub id: String,
    pub name: String,
    pub quantity: u64,
}

/// A single cart with its rendered totals and addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDetailView {
    pub title: String,
    pub back_label: String,
    pub cart: Cart,
    pub line_items: Vec<LineItemView>,
    pub line_item_count: u64,
    pub total_price: String,
    pub shipping_address: String,
    pub billing_address: String,
}

impl CartDetailView {
    #[must_use]
    pub fn new(cart: Cart, messages: &dyn Messages, locale: &str) -> Self {
        let line_items = cart
            .line_items
            .iter()
            .map(|item| LineItemView {
                id: item.id.to_string(),
                // Products without a name in this locale fall back to their id.
                name: item
                    .name
                    .clone()
                    .or_else(|| item.product_id.as_ref().map(ToString::to_string))
                    .unwrap_or_default(),
                quantity: item.quantity,
            })
            .collect();

        Self {
            title: messages.get(MessageKey::CartTitle).into_owned(),
            back_label: messages.get(MessageKey::Back).into_owned(),
            line_items,
            line_item_count: cart.line_item_count(),
            total_price: cart.total_price.format(locale),
            shipping_address: format_address(cart.shipping_address.as_ref()),
            billing_address: format_address(cart.billing_address.as_ref()),
            cart,
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use cart_manager_core::{CartId, LineItem, LineItemId, Money, ProductId};

    use super::*;
    use crate::messages::DefaultMessages;

    #[test]
    fn test_detail_view() {
        let cart = Cart {
            id: CartId::new("c-9"),
            version: 1,
            customer_id: None,
            line_items: vec![
                LineItem {
                    id: LineItemId::new("li-1"),
                    product_id: Some(ProductId::new("p-1")),
                    name: Some("Espresso Beans".to_string()),
                    quantity: 2,
                },
                LineItem {
                    id: LineItemId::new("li-2"),
                    product_id: Some(ProductId::new("p-2")),
                    name: None,
                    quantity: 1,
                },
            ],
            total_price: Money::new(499, "USD", 2),
            shipping_address: None,
            billing_address: None,
        };

        let view = CartDetailView::new(cart, &DefaultMessages, "en");
        assert_eq!(view.title, "Cart details");
        assert_eq!(view.back_label, "Back");
        assert_eq!(view.line_item_count, 3);
        assert_eq!(view.total_price, "$4.99");
        assert_eq!(view.line_items[0].name, "Espresso Beans");
        assert_eq!(view.line_items[1].name, "p-2");
        assert_eq!(view.shipping_address, "");
    }
}
