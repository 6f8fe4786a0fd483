//! Application startup and lifecycle management.
//!
//! Builds the router (routes, origin policy, body limit, tracing, panic
//! recovery) and runs the HTTP listener until shutdown.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{DeploymentMode, GatewayConfig, GatewayVariant, DEFAULT_DEV_ORIGIN};
use crate::error::{AppError, ErrorBody, SERVER_ERROR_TEXT};
use crate::handlers::{health_check, not_found, root_info, submit_contact};
use crate::middleware::{origin_policy_middleware, OriginAllowList};
use crate::services::{MockPushProvider, PushProvider, PushoverProvider};

/// JSON body parse limit. A defensive bound, not a business rule.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub variant: GatewayVariant,
    pub push_provider: Arc<dyn PushProvider>,
}

/// Build the request-handling router for the given configuration.
pub fn build_router(config: &GatewayConfig, push_provider: Arc<dyn PushProvider>) -> Router {
    let state = AppState {
        variant: config.variant,
        push_provider,
    };

    let mut router = Router::new()
        .route("/", get(root_info))
        .route("/api/contact", post(submit_contact));

    // The health probe route exists only for long-running deployments.
    if config.deployment == DeploymentMode::Server {
        router = router.route("/health", get(health_check));
    }

    let router = router
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    // One origin-policy component, two enforcement modes.
    let router = match config.variant {
        GatewayVariant::Strict => {
            let allow_list = OriginAllowList::new(&config.origin.allowed_origins);
            router.layer(from_fn_with_state(allow_list, origin_policy_middleware))
        }
        GatewayVariant::Permissive => router.layer(permissive_cors_layer(config)),
    };

    router
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Framework-enforced CORS for the permissive variant: configured origins
/// (single localhost development origin when unset), credentials enabled.
fn permissive_cors_layer(config: &GatewayConfig) -> CorsLayer {
    let configured = if config.origin.allowed_origins.is_empty() {
        vec![DEFAULT_DEV_ORIGIN.to_string()]
    } else {
        config.origin.allowed_origins.clone()
    };

    let origins = configured
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}

/// Last-resort recovery: a panicking handler answers with the generic 500
/// payload instead of tearing down the connection.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(detail = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(SERVER_ERROR_TEXT)),
    )
        .into_response()
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration. The push
    /// provider is selected here: Pushover when enabled, the mock
    /// otherwise.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let push_provider: Arc<dyn PushProvider> = if config.pushover.enabled {
            tracing::info!("Pushover push provider initialized");
            Arc::new(PushoverProvider::new(config.pushover.clone()))
        } else {
            tracing::info!("Pushover provider disabled, using mock push provider");
            Arc::new(MockPushProvider::new(true))
        };

        Self::build_with_provider(config, push_provider).await
    }

    /// Build with an externally supplied provider. Used by tests to observe
    /// delivery attempts.
    pub async fn build_with_provider(
        config: GatewayConfig,
        push_provider: Arc<dyn PushProvider>,
    ) -> Result<Self, AppError> {
        // Port 0 = random port for testing.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(&config, push_provider);

        tracing::info!(
            port = port,
            environment = %config.common.environment,
            "Contact gateway listening"
        );

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped or a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
