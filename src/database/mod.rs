//! Database access subsystem.
//!
//! # Data Flow
//! ```text
//! DatabaseConfig (named profiles)
//!     → manager.rs (register profiles)
//!     → dsn.rs (connection URL + session statements)
//!     → connection.rs (open sqlx pool, verify one connection)
//!     → booted DatabaseManager, shared via Arc
//! ```
//!
//! # Design Decisions
//! - One sqlx `AnyPool` per profile; the driver is picked from the URL
//! - Boot is fail-fast and all-or-nothing
//! - Handlers receive the manager through axum state, never a global

pub mod connection;
pub mod dsn;
pub mod manager;

use thiserror::Error;

pub use connection::DatabaseConnection;
pub use manager::DatabaseManager;

/// Errors raised while registering, booting or using connections.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("database manager is already booted")]
    AlreadyBooted,

    #[error("database manager has not been booted")]
    NotBooted,

    #[error("no database connections registered")]
    NoConnections,

    #[error("connection '{0}' is already registered")]
    DuplicateConnection(String),

    #[error("connection '{0}' is not configured")]
    UnknownConnection(String),

    #[error("connection '{connection}': invalid connection URL: {reason}")]
    InvalidUrl { connection: String, reason: String },

    #[error("connection '{connection}': cannot connect: {source}")]
    Connect {
        connection: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("connection '{connection}': query failed: {source}")]
    Query {
        connection: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Register the sqlx drivers behind `AnyPool` (MySQL, PostgreSQL, SQLite).
///
/// Safe to call more than once.
pub fn install_drivers() {
    sqlx::any::install_default_drivers();
}
