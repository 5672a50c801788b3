//! Application routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::database::{DatabaseError, DatabaseManager};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::routing::{RouteError, RouteRegistrar, RouteTable};

/// Registers the application's HTTP routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebRoutes;

impl RouteRegistrar for WebRoutes {
    fn register(&self, routes: &mut RouteTable, _database: &DatabaseManager) -> Result<(), RouteError> {
        routes.get("/", index)?.name("home");
        routes.get("/health", health)?.name("health");
        routes.get("/health/{connection}", connection_health)?.name("health.connection");
        Ok(())
    }
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
struct ConnectionHealth {
    name: String,
    driver: String,
    healthy: bool,
}

#[derive(Debug, Serialize)]
struct HealthReport {
    status: &'static str,
    connections: Vec<ConnectionHealth>,
}

/// Ping every connection; 503 if any is down.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let mut connections = Vec::new();
    for name in state.database.connection_names() {
        let (driver, healthy) = match state.database.connection(name) {
            Ok(conn) => {
                let healthy = match conn.ping().await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(connection = %name, error = %e, "Health check failed");
                        false
                    }
                };
                (conn.driver().to_string(), healthy)
            }
            Err(e) => {
                tracing::warn!(connection = %name, error = %e, "Connection unavailable");
                ("unknown".to_string(), false)
            }
        };
        connections.push(ConnectionHealth {
            name: name.to_string(),
            driver,
            healthy,
        });
    }

    let all_healthy = connections.iter().all(|c| c.healthy);
    let (status, label) = if all_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthReport {
            status: label,
            connections,
        }),
    )
}

/// Ping a single named connection.
async fn connection_health(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ConnectionHealth>, ApiError> {
    let conn = match state.database.connection(&name) {
        Ok(conn) => conn,
        Err(DatabaseError::UnknownConnection(_)) => return Err(ApiError::NotFound),
        Err(e) => return Err(e.into()),
    };
    conn.ping().await?;

    Ok(Json(ConnectionHealth {
        name,
        driver: conn.driver().to_string(),
        healthy: true,
    }))
}
