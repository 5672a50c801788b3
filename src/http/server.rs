//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router from the registered route table
//! - Wire up middleware (request ID, tracing, limits, timeout, metrics)
//! - Bind server to listener
//! - Stop on the shutdown signal, draining in-flight requests

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{DefaultBodyLimit, MatchedPath, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::http::request::{request_span, UuidRequestId, X_REQUEST_ID};
use crate::http::response::not_found;
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Application state injected into handlers.
///
/// This is the only way handlers reach the database.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub database: Arc<DatabaseManager>,
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
}

impl HttpServer {
    /// Create a new HTTP server serving the given routes.
    pub fn new(state: AppState, routes: RouteTable) -> Self {
        let config = state.config.clone();
        let router = Self::build_router(&config, state, routes);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState, routes: RouteTable) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.server.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )));

        routes
            .into_router()
            .fallback(not_found)
            .with_state(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(layers)
    }

    /// A clone of the fully layered router, e.g. for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Configuration the router was built from.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Record count and latency per matched route.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = request.method().clone();

    let response = next.run(request).await;

    metrics::record_request(method.as_str(), response.status().as_u16(), &route, start);
    response
}
