//! Startup orchestration.
//!
//! # Responsibilities
//! - Register database drivers
//! - Load and validate configuration
//! - Register and boot the database manager
//! - Build the route table and the HTTP server on top of it
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, no retries
//! - Steps run strictly in order; routing only sees a booted manager
//! - Nothing escapes a failed start: pools are closed before returning

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{load_config, AppConfig, ConfigError, ConfigSource};
use crate::database::{install_drivers, DatabaseError, DatabaseManager};
use crate::http::server::{AppState, HttpServer};
use crate::observability::logging::{LogHandle, LoggingError};
use crate::observability::metrics;
use crate::routing::{RouteError, RouteRegistrar, RouteSummary, RouteTable};

/// Startup steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Drivers,
    Configuration,
    Database,
    Routes,
}

/// Fatal startup failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("route registration error: {0}")]
    Routes(#[from] RouteError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Composition root: turns a config source into a ready [`Application`].
pub struct Bootstrap {
    source: ConfigSource,
    log_handle: Option<LogHandle>,
}

impl Bootstrap {
    pub fn new(source: ConfigSource) -> Self {
        Self {
            source,
            log_handle: None,
        }
    }

    /// Apply the configured log level once the config is loaded.
    pub fn with_log_handle(mut self, handle: LogHandle) -> Self {
        self.log_handle = Some(handle);
        self
    }

    /// Run every startup step in order.
    pub async fn run<R>(self, registrar: &R) -> Result<Application, StartupError>
    where
        R: RouteRegistrar + ?Sized,
    {
        let mut stages = Vec::with_capacity(4);

        install_drivers();
        stages.push(Stage::Drivers);
        tracing::debug!("Database drivers registered");

        let config = load_config(&self.source)?;
        if let Some(handle) = &self.log_handle {
            handle.apply(&config.observability)?;
        }
        stages.push(Stage::Configuration);
        tracing::info!(
            source = %self.source,
            bind_address = %config.server.bind_address,
            connections = config.database.connections.len(),
            "Configuration loaded"
        );

        let mut database = DatabaseManager::from_config(&config.database)?;
        database.boot().await?;
        let database = Arc::new(database);
        stages.push(Stage::Database);

        let mut routes = RouteTable::new();
        if let Err(e) = registrar.register(&mut routes, &database) {
            database.close().await;
            return Err(e.into());
        }
        let route_summary = routes.summary();
        tracing::info!(routes = route_summary.len(), "Routes registered");

        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            database: database.clone(),
        };
        let server = HttpServer::new(state, routes);
        stages.push(Stage::Routes);

        Ok(Application {
            config,
            database,
            server,
            routes: route_summary,
            stages,
        })
    }
}

/// A fully started application, ready to serve.
pub struct Application {
    config: Arc<AppConfig>,
    database: Arc<DatabaseManager>,
    server: HttpServer,
    routes: Vec<RouteSummary>,
    stages: Vec<Stage>,
}

impl Application {
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn database(&self) -> &Arc<DatabaseManager> {
        &self.database
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> &[RouteSummary] {
        &self.routes
    }

    /// Startup steps that completed, in order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Publish startup gauges to the installed metrics recorder.
    ///
    /// Call after the exporter is installed; values recorded earlier are
    /// dropped by the no-op default recorder.
    pub fn record_metrics(&self) {
        metrics::record_connections(self.database.connection_names().count());
    }

    /// The layered router, for in-process requests.
    pub fn router(&self) -> axum::Router {
        self.server.router()
    }

    /// Bind the configured server address.
    pub async fn bind(&self) -> Result<TcpListener, StartupError> {
        let listener = TcpListener::bind(&self.config.server.bind_address).await?;
        Ok(listener)
    }

    /// Serve until `shutdown` fires, then close the database pools.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), StartupError> {
        let database = self.database.clone();
        let result = self.server.run(listener, shutdown).await;
        database.close().await;
        result.map_err(StartupError::from)
    }

    /// Release resources without serving.
    pub async fn close(self) {
        self.database.close().await;
    }
}
