//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the application.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration for the application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings (bind address, limits).
    pub server: ServerConfig,

    /// Database connection profiles.
    pub database: DatabaseConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Named database connections and the one used by default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Name of the connection handed out when no name is given.
    pub default: String,

    /// Connection profiles keyed by name.
    pub connections: BTreeMap<String, ConnectionConfig>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            default: "default".to_string(),
            connections: BTreeMap::new(),
        }
    }
}

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Mysql,
    #[serde(alias = "postgres", alias = "postgresql")]
    Pgsql,
    Sqlite,
}

impl Driver {
    /// Port used when the profile does not name one.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Driver::Mysql => Some(3306),
            Driver::Pgsql => Some(5432),
            Driver::Sqlite => None,
        }
    }

    /// Whether the driver talks to a server over the network.
    pub fn is_networked(self) -> bool {
        !matches!(self, Driver::Sqlite)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Driver::Mysql => "mysql",
            Driver::Pgsql => "pgsql",
            Driver::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

/// A single connection profile.
#[derive(Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    pub driver: Driver,

    /// Server host. Ignored for SQLite.
    #[serde(default)]
    pub host: String,

    /// Server port. Falls back to the driver's well-known port.
    #[serde(default)]
    pub port: Option<u16>,

    /// Schema name, or the file path for SQLite (`:memory:` for in-memory).
    pub database: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Client character set (MySQL `SET NAMES`, PostgreSQL `client_encoding`).
    #[serde(default)]
    pub charset: Option<String>,

    /// Connection collation (MySQL only).
    #[serde(default)]
    pub collation: Option<String>,

    /// Prefix applied to every table name resolved through the connection.
    #[serde(default)]
    pub prefix: String,

    /// PostgreSQL `search_path`.
    #[serde(default)]
    pub schema: Option<String>,

    /// SQLite `PRAGMA foreign_keys`; unset keeps the driver default.
    #[serde(default)]
    pub foreign_keys: Option<bool>,

    #[serde(default)]
    pub pool: PoolConfig,
}

impl ConnectionConfig {
    /// Port after applying the driver default.
    pub fn effective_port(&self) -> Option<u16> {
        self.port.or_else(|| self.driver.default_port())
    }
}

// Hand-written so the password never ends up in logs.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("charset", &self.charset)
            .field("collation", &self.collation)
            .field("prefix", &self.prefix)
            .field("schema", &self.schema)
            .field("foreign_keys", &self.foreign_keys)
            .field("pool", &self.pool)
            .finish()
    }
}

/// Connection pool sizing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of pooled connections.
    pub max_connections: u32,

    /// Connections kept open while idle.
    pub min_connections: u32,

    /// Time allowed to establish a connection, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            connect_timeout_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_aliases() {
        #[derive(Deserialize)]
        struct Wrapper {
            driver: Driver,
        }

        for name in ["pgsql", "postgres", "postgresql"] {
            let w: Wrapper = toml::from_str(&format!("driver = \"{}\"", name)).unwrap();
            assert_eq!(w.driver, Driver::Pgsql);
        }
        let w: Wrapper = toml::from_str("driver = \"mysql\"").unwrap();
        assert_eq!(w.driver, Driver::Mysql);
        assert!(toml::from_str::<Wrapper>("driver = \"oracle\"").is_err());
    }

    #[test]
    fn test_effective_port() {
        let mut conn: ConnectionConfig = toml::from_str(
            r#"
            driver = "mysql"
            host = "db"
            database = "app"
            "#,
        )
        .unwrap();
        assert_eq!(conn.effective_port(), Some(3306));

        conn.port = Some(3307);
        assert_eq!(conn.effective_port(), Some(3307));

        conn.driver = Driver::Sqlite;
        conn.port = None;
        assert_eq!(conn.effective_port(), None);
    }

    #[test]
    fn test_debug_hides_password() {
        let conn: ConnectionConfig = toml::from_str(
            r#"
            driver = "pgsql"
            host = "db"
            database = "app"
            password = "hunter2"
            "#,
        )
        .unwrap();
        let rendered = format!("{:?}", conn);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }
}
