//! GraphQL query definitions for the commercetools platform API.
//!
//! Uses `graphql_client` to generate type-safe Rust code from GraphQL queries.

use graphql_client::GraphQLQuery;

// =============================================================================
// Custom scalar type aliases (used by graphql_client)
// =============================================================================

/// 64-bit integer (versions, cent amounts, quantities).
type Long = i64;

/// IETF language tag, e.g. `en` or `de-DE`.
type Locale = String;

/// ISO 3166-1 alpha-2 country code.
type Country = String;

/// ISO 4217 currency code.
type Currency = String;

// =============================================================================
// Cart queries
// =============================================================================

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/platform/schema.graphql",
    query_path = "graphql/platform/queries/carts.graphql",
    response_derives = "Debug, Clone"
)]
pub struct FetchCarts;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/platform/schema.graphql",
    query_path = "graphql/platform/queries/carts.graphql",
    response_derives = "Debug, Clone"
)]
pub struct DeleteCart;
