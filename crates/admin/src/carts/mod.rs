//! Cart data access for the back office.
//!
//! [`CartGateway`] is the only place the admin talks to the platform about
//! carts. It is constructed per customer with an explicit [`CartBackend`], so
//! table code and tests never depend on the transport.

mod gateway;

pub use gateway::{CartGateway, CartsSnapshot};

use std::future::Future;

use cart_manager_core::{Cart, CartId, CartRef, CustomerId};
use thiserror::Error;

use crate::commercetools::{CommercetoolsError, PlatformClient};

/// A parameterized cart listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartQuery {
    /// Platform query predicate, e.g. `customerId="..."`.
    pub filter: String,
    /// Maximum number of carts to return.
    pub limit: u32,
    /// Locale used for localized product names.
    pub locale: String,
}

impl CartQuery {
    /// Build the listing request for all carts of one customer.
    #[must_use]
    pub fn for_customer(customer_id: &CustomerId, limit: u32, locale: &str) -> Self {
        Self {
            filter: customer_predicate(customer_id),
            limit,
            locale: locale.to_string(),
        }
    }
}

/// `customerId="<id>"`, with quotes and backslashes in the id escaped.
#[must_use]
pub fn customer_predicate(customer_id: &CustomerId) -> String {
    let escaped = customer_id
        .as_str()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    format!("customerId=\"{escaped}\"")
}

/// Fetch and delete capability the gateway is built on.
pub trait CartBackend: Send + Sync + 'static {
    /// List carts matching `query`, in platform order.
    fn fetch_carts(
        &self,
        query: &CartQuery,
    ) -> impl Future<Output = Result<Vec<Cart>, CommercetoolsError>> + Send;

    /// Delete one cart if its stored version still equals `version`.
    fn delete_cart(
        &self,
        id: &CartId,
        version: i64,
    ) -> impl Future<Output = Result<CartRef, CommercetoolsError>> + Send;
}

impl CartBackend for PlatformClient {
    fn fetch_carts(
        &self,
        query: &CartQuery,
    ) -> impl Future<Output = Result<Vec<Cart>, CommercetoolsError>> + Send {
        Self::fetch_carts(self, query)
    }

    fn delete_cart(
        &self,
        id: &CartId,
        version: i64,
    ) -> impl Future<Output = Result<CartRef, CommercetoolsError>> + Send {
        Self::delete_cart(self, id, version)
    }
}

/// A batch delete in which at least one cart could not be deleted.
///
/// Only the counts and the first failure are reported; which carts failed is
/// not exposed.
#[derive(Debug, Error)]
#[error("{failed} of {attempted} cart deletions failed: {source}")]
pub struct BatchDeleteError {
    /// Number of deletes that were rejected.
    pub failed: usize,
    /// Number of deletes issued.
    pub attempted: usize,
    /// The first rejection, in request order.
    #[source]
    pub source: CommercetoolsError,
}
