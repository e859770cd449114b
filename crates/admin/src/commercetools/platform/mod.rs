//! commercetools platform GraphQL client with OAuth client-credentials
//! authentication.

use std::sync::Arc;

use cart_manager_core::{Cart, CartId, CartRef};
use chrono::{DateTime, Duration, Utc};
use graphql_client::GraphQLQuery;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::carts::CartQuery;
use crate::config::CommercetoolsConfig;

use super::{CommercetoolsError, GraphQLError, GraphQLErrorLocation, classify_graphql_errors};

mod conversions;
pub mod queries;

use conversions::{convert_carts, convert_deleted_cart};
use queries::{DeleteCart, FetchCarts};

/// Tokens are refreshed this long before the platform expires them.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Default `Retry-After` when a 429 response does not carry one.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Cached OAuth access token.
#[derive(Clone)]
struct AccessToken {
    value: SecretString,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// commercetools platform GraphQL client.
///
/// Cheap to clone; clones share the HTTP connection pool and token cache.
#[derive(Clone)]
pub struct PlatformClient {
    inner: Arc<PlatformClientInner>,
}

struct PlatformClientInner {
    client: reqwest::Client,
    api_url: String,
    auth_url: String,
    project_key: String,
    client_id: String,
    client_secret: SecretString,
    scopes: String,
    token: RwLock<Option<AccessToken>>,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
    #[serde(default)]
    extensions: Option<GraphQLErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorExtensions {
    code: Option<String>,
}

/// OAuth token response from the auth service.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

impl PlatformClient {
    /// Create a new platform client.
    #[must_use]
    pub fn new(config: &CommercetoolsConfig) -> Self {
        Self {
            inner: Arc::new(PlatformClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                auth_url: config.auth_url.trim_end_matches('/').to_string(),
                project_key: config.project_key.clone(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                scopes: config.scopes.clone(),
                token: RwLock::new(None),
            }),
        }
    }

    /// Get the project key.
    #[must_use]
    pub fn project_key(&self) -> &str {
        &self.inner.project_key
    }

    // =========================================================================
    // OAuth
    // =========================================================================

    /// Return a cached token, or obtain a new one via client credentials.
    async fn access_token(&self) -> Result<SecretString, CommercetoolsError> {
        let now = Utc::now();
        if let Some(token) = self.inner.token.read().await.as_ref()
            && token.is_fresh(now)
        {
            return Ok(token.value.clone());
        }

        let mut slot = self.inner.token.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(token) = slot.as_ref()
            && token.is_fresh(now)
        {
            return Ok(token.value.clone());
        }

        let url = format!("{}/oauth/token", self.inner.auth_url);
        let params = [
            ("grant_type", "client_credentials"),
            ("scope", self.inner.scopes.as_str()),
        ];

        let response = self
            .inner
            .client
            .post(&url)
            .basic_auth(
                &self.inner.client_id,
                Some(self.inner.client_secret.expose_secret()),
            )
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CommercetoolsError::OAuth(format!(
                "Token request failed ({status}): {text}"
            )));
        }

        let token_response: TokenResponse = response.json().await?;
        let token = AccessToken {
            value: SecretString::from(token_response.access_token),
            expires_at: Utc::now() + Duration::seconds(token_response.expires_in),
        };
        tracing::debug!(expires_at = %token.expires_at, "Obtained platform access token");

        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next request re-authenticates.
    async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL query.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, CommercetoolsError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let access_token = self.access_token().await?;
        let endpoint = format!("{}/{}/graphql", self.inner.api_url, self.inner.project_key);

        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&endpoint)
            .bearer_auth(access_token.expose_secret())
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(CommercetoolsError::RateLimited(retry_after));
        }

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_token().await;
            return Err(CommercetoolsError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        let graphql_response: GraphQLResponse<Q::ResponseData> = response.json().await?;

        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    code: e.extensions.and_then(|x| x.code),
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(classify_graphql_errors(converted_errors));
        }

        graphql_response.data.ok_or_else(|| {
            CommercetoolsError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                code: None,
                locations: vec![],
                path: vec![],
            }])
        })
    }

    // =========================================================================
    // Cart methods
    // =========================================================================

    /// Fetch carts matching a query predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, query), fields(filter = %query.filter))]
    pub async fn fetch_carts(&self, query: &CartQuery) -> Result<Vec<Cart>, CommercetoolsError> {
        let variables = queries::fetch_carts::Variables {
            filter: Some(query.filter.clone()),
            limit: Some(i64::from(query.limit)),
            locale: Some(query.locale.clone()),
        };

        let response = self.execute::<FetchCarts>(variables).await?;
        tracing::debug!(total = response.carts.total, "Fetched carts");

        Ok(convert_carts(response))
    }

    /// Delete a cart, presenting the version the caller last saw.
    ///
    /// # Errors
    ///
    /// Returns `CommercetoolsError::ConcurrentModification` if the cart changed
    /// since `version`, `CommercetoolsError::NotFound` if it no longer exists.
    #[instrument(skip(self), fields(cart_id = %id))]
    pub async fn delete_cart(
        &self,
        id: &CartId,
        version: i64,
    ) -> Result<CartRef, CommercetoolsError> {
        let variables = queries::delete_cart::Variables {
            cart_id: id.to_string(),
            version,
        };

        let response = self.execute::<DeleteCart>(variables).await?;
        convert_deleted_cart(response, id)
    }
}
