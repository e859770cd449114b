//! Conversions from generated GraphQL response types to core domain types.

use cart_manager_core::{Address, Cart, CartId, CartRef, CustomerId, LineItem, LineItemId, Money, ProductId};
use tracing::warn;

use super::super::CommercetoolsError;
use super::queries::{delete_cart, fetch_carts};

/// Fraction digits assumed when the platform reports an out-of-range value.
const DEFAULT_FRACTION_DIGITS: u32 = 2;

/// Shipping and billing addresses are generated as distinct types with the
/// same fields.
macro_rules! convert_address {
    ($address:expr) => {
        $address.map(|a| Address {
            first_name: a.first_name,
            last_name: a.last_name,
            street_name: a.street_name,
            street_number: a.street_number,
            postal_code: a.postal_code,
            city: a.city,
            country: Some(a.country),
        })
    };
}

/// Convert a cart query response into domain carts, preserving order.
pub fn convert_carts(data: fetch_carts::ResponseData) -> Vec<Cart> {
    data.carts
        .results
        .into_iter()
        .map(|cart| {
            let id = CartId::new(cart.id);
            let line_items = cart
                .line_items
                .into_iter()
                .map(|item| {
                    let quantity = u64::try_from(item.quantity).unwrap_or_else(|_| {
                        warn!(cart_id = %id, quantity = item.quantity, "Negative line item quantity");
                        0
                    });
                    LineItem {
                        id: LineItemId::new(item.id),
                        product_id: Some(ProductId::new(item.product_id)),
                        name: item.name,
                        quantity,
                    }
                })
                .collect();

            let total_price = Money {
                cent_amount: cart.total_price.cent_amount,
                currency_code: cart.total_price.currency_code,
                fraction_digits: u32::try_from(cart.total_price.fraction_digits)
                    .unwrap_or(DEFAULT_FRACTION_DIGITS),
            };

            Cart {
                id,
                version: cart.version,
                customer_id: cart.customer_id.map(CustomerId::new),
                line_items,
                total_price,
                shipping_address: convert_address!(cart.shipping_address),
                billing_address: convert_address!(cart.billing_address),
            }
        })
        .collect()
}

/// Convert a delete mutation response; a null payload means the cart is gone.
pub fn convert_deleted_cart(
    data: delete_cart::ResponseData,
    requested: &CartId,
) -> Result<CartRef, CommercetoolsError> {
    data.delete_cart
        .map(|cart| CartRef {
            id: CartId::new(cart.id),
            version: cart.version,
        })
        .ok_or_else(|| CommercetoolsError::NotFound(format!("cart {requested}")))
}
