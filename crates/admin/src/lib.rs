//! Cart manager admin library.
//!
//! Back-office screens for a customer's shopping carts: list them, select
//! rows, delete the selection and configure which columns the table shows.
//! The HTTP surface is a JSON API consumed by the host admin shell.
//!
//! # Security
//!
//! The platform API client holds `manage_orders` scope and can delete any
//! cart in the project. Bind to a private interface only.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carts;
pub mod commercetools;
pub mod components;
pub mod config;
pub mod error;
pub mod messages;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::carts::CartBackend;
use crate::state::AppState;

/// Build the application router with request tracing and Sentry layers.
pub fn app<B: CartBackend>(state: AppState<B>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                status = tracing::field::Empty,
                latency_ms = tracing::field::Empty,
            )
        })
        .on_response(
            |response: &axum::http::Response<_>, latency: std::time::Duration, span: &Span| {
                span.record("status", response.status().as_u16());
                span.record(
                    "latency_ms",
                    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                );
                DefaultOnResponse::default().on_response(response, latency, span);
            },
        );

    routes::routes::<B>()
        .layer(trace_layer)
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
