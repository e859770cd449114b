//! commercetools platform API client.
//!
//! # Architecture
//!
//! - Uses `graphql-client` crate for type-safe GraphQL queries
//! - OAuth2 client-credentials flow, token cached in memory until shortly
//!   before expiry
//! - Direct API calls to the platform (no local sync)
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_manager_admin::commercetools::PlatformClient;
//!
//! let client = PlatformClient::new(&config.commercetools);
//!
//! let carts = client.fetch_carts(&CartQuery::for_customer(&customer_id, 20, "en")).await?;
//! client.delete_cart(&carts[0].id, carts[0].version).await?;
//! ```

mod platform;

pub use platform::PlatformClient;

use thiserror::Error;

/// Errors that can occur when interacting with the platform API.
#[derive(Debug, Error)]
pub enum CommercetoolsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The presented version no longer matches the stored resource.
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    /// Rate limited by the platform.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Obtaining an access token failed.
    #[error("OAuth error: {0}")]
    OAuth(String),
}

/// A GraphQL error returned by the platform API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Machine-readable error code from `extensions.code`, if present.
    pub code: Option<String>,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map GraphQL errors onto the dedicated variants for the codes callers
/// react to, keeping everything else as a plain GraphQL error.
pub(crate) fn classify_graphql_errors(errors: Vec<GraphQLError>) -> CommercetoolsError {
    let code_message = |code: &str| {
        errors
            .iter()
            .find(|e| e.code.as_deref() == Some(code))
            .map(|e| e.message.clone())
    };

    if let Some(message) = code_message("ConcurrentModification") {
        return CommercetoolsError::ConcurrentModification(message);
    }
    if let Some(message) = code_message("ResourceNotFound") {
        return CommercetoolsError::NotFound(message);
    }
    CommercetoolsError::GraphQL(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(message: &str, code: Option<&str>) -> GraphQLError {
        GraphQLError {
            message: message.to_string(),
            code: code.map(ToString::to_string),
            locations: vec![],
            path: vec![],
        }
    }

    #[test]
    fn test_commercetools_error_display() {
        let err = CommercetoolsError::NotFound("cart-123".to_string());
        assert_eq!(err.to_string(), "Not found: cart-123");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let err = CommercetoolsError::GraphQL(vec![
            error("Field not found", None),
            error("Invalid ID", None),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = CommercetoolsError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_classify_concurrent_modification() {
        let err = classify_graphql_errors(vec![error(
            "Object c-1 has a different version than expected. Expected: 1 - Actual: 2.",
            Some("ConcurrentModification"),
        )]);
        assert!(matches!(err, CommercetoolsError::ConcurrentModification(_)));
    }

    #[test]
    fn test_classify_not_found() {
        let err = classify_graphql_errors(vec![error(
            "The Cart with ID 'c-1' was not found.",
            Some("ResourceNotFound"),
        )]);
        assert!(matches!(err, CommercetoolsError::NotFound(_)));
    }

    #[test]
    fn test_classify_other_codes_stay_graphql() {
        let err = classify_graphql_errors(vec![error("Boom", Some("InvalidInput"))]);
        assert!(matches!(err, CommercetoolsError::GraphQL(ref errors) if errors.len() == 1));
    }
}
