//! Cart manager admin - back-office cart management API.
//!
//! This binary serves the carts JSON API on port 3001.
//!
//! # Architecture
//!
//! - Axum web framework
//! - commercetools GraphQL API for cart queries and deletion
//! - In-memory per-customer table sessions
//!
//! # APIs
//!
//! - commercetools platform API (`manage_orders` scope)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use cart_manager_admin::commercetools::PlatformClient;
use cart_manager_admin::config::AdminConfig;
use cart_manager_admin::messages::{DefaultMessages, MessageCatalog, Messages};
use cart_manager_admin::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Built-in messages, overridden by the configured catalog if it loads.
fn load_messages(config: &AdminConfig) -> Arc<dyn Messages> {
    let Some(path) = &config.messages_path else {
        return Arc::new(DefaultMessages);
    };
    match MessageCatalog::load(path) {
        Ok(catalog) => {
            tracing::info!(path = %path.display(), "Message catalog loaded");
            Arc::new(catalog)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Using built-in messages");
            Arc::new(DefaultMessages)
        }
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = AdminConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cart_manager_admin=info,tower_http=debug".into());

    // JSON format for structured log parsing, text format locally
    let json_layer = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!config.log_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let messages = load_messages(&config);
    let client = PlatformClient::new(&config.commercetools);
    tracing::info!(project_key = %client.project_key(), "commercetools client created");

    let state = AppState::new(Arc::new(client), messages, &config.locale, config.page_size);
    let app = cart_manager_admin::app(state);

    let addr = config.socket_addr();
    tracing::info!("admin listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
