//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default connection exists)
//! - Validate value ranges (timeouts > 0, pool sizes, addresses)
//! - Reject identifiers that are spliced into session statements
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, ConnectionConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no database connections configured")]
    NoConnections,

    #[error("default connection '{0}' is not configured")]
    UnknownDefaultConnection(String),

    #[error("connection '{connection}': {field} must not be empty")]
    MissingField {
        connection: String,
        field: &'static str,
    },

    #[error("connection '{connection}': {field} '{value}' is not a plain identifier")]
    InvalidIdentifier {
        connection: String,
        field: &'static str,
        value: String,
    },

    #[error("connection '{connection}': {reason}")]
    InvalidPool { connection: String, reason: String },

    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_bind_address(&config.server.bind_address) {
        errors.push(ValidationError::InvalidBindAddress(
            config.server.bind_address.clone(),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("server.request_timeout_secs"));
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue("server.max_body_bytes"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let database = &config.database;
    if database.connections.is_empty() {
        errors.push(ValidationError::NoConnections);
    } else if !database.connections.contains_key(&database.default) {
        errors.push(ValidationError::UnknownDefaultConnection(
            database.default.clone(),
        ));
    }

    for (name, conn) in &database.connections {
        validate_connection(name, conn, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_connection(name: &str, conn: &ConnectionConfig, errors: &mut Vec<ValidationError>) {
    let missing = |field| ValidationError::MissingField {
        connection: name.to_string(),
        field,
    };

    if conn.database.trim().is_empty() {
        errors.push(missing("database"));
    }
    if conn.driver.is_networked() && conn.host.trim().is_empty() {
        errors.push(missing("host"));
    }

    let identifiers = [
        ("charset", conn.charset.as_deref()),
        ("collation", conn.collation.as_deref()),
        ("schema", conn.schema.as_deref()),
    ];
    for (field, value) in identifiers {
        if let Some(value) = value {
            if !is_identifier(value) {
                errors.push(ValidationError::InvalidIdentifier {
                    connection: name.to_string(),
                    field,
                    value: value.to_string(),
                });
            }
        }
    }
    if !conn.prefix.is_empty() && !is_identifier(&conn.prefix) {
        errors.push(ValidationError::InvalidIdentifier {
            connection: name.to_string(),
            field: "prefix",
            value: conn.prefix.clone(),
        });
    }

    let pool = &conn.pool;
    let invalid_pool = |reason: &str| ValidationError::InvalidPool {
        connection: name.to_string(),
        reason: reason.to_string(),
    };
    if pool.max_connections == 0 {
        errors.push(invalid_pool("pool.max_connections must be greater than zero"));
    } else if pool.min_connections > pool.max_connections {
        errors.push(invalid_pool("pool.min_connections exceeds pool.max_connections"));
    }
    if pool.connect_timeout_secs == 0 {
        errors.push(invalid_pool("pool.connect_timeout_secs must be greater than zero"));
    }
}

/// A socket address or `host:port`, as accepted by `TcpListener::bind`.
fn is_bind_address(value: &str) -> bool {
    if value.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match value.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !host.contains(char::is_whitespace) && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

/// ASCII letters, digits and underscores only.
fn is_identifier(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
