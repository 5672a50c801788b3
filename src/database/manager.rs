//! Connection manager.
//!
//! # Responsibilities
//! - Collect named connection profiles before activation
//! - Open every pool on boot, all or nothing
//! - Hand out booted connections by name
//!
//! # Design Decisions
//! - No global accessor: the booted manager is shared via `Arc` and passed
//!   explicitly to whatever needs data access
//! - Profiles are frozen once booted; a second boot is an error
//! - A failed boot closes every pool it opened and leaves the manager
//!   un-booted

use std::collections::BTreeMap;

use crate::config::{ConnectionConfig, DatabaseConfig};
use crate::database::connection::DatabaseConnection;
use crate::database::DatabaseError;

/// Holds named database connections for the lifetime of the process.
#[derive(Debug)]
pub struct DatabaseManager {
    profiles: BTreeMap<String, ConnectionConfig>,
    connections: BTreeMap<String, DatabaseConnection>,
    default: String,
    booted: bool,
}

impl DatabaseManager {
    /// Create an empty manager whose default connection is named "default".
    pub fn new() -> Self {
        Self {
            profiles: BTreeMap::new(),
            connections: BTreeMap::new(),
            default: "default".to_string(),
            booted: false,
        }
    }

    /// Create a manager with every profile from the database config registered.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let mut manager = Self::new();
        manager.set_default(config.default.clone());
        for (name, profile) in &config.connections {
            manager.add_connection(name.clone(), profile.clone())?;
        }
        Ok(manager)
    }

    /// Name the connection returned by [`default_connection`](Self::default_connection).
    pub fn set_default(&mut self, name: impl Into<String>) {
        self.default = name.into();
    }

    /// Register a connection profile under `name`.
    pub fn add_connection(
        &mut self,
        name: impl Into<String>,
        config: ConnectionConfig,
    ) -> Result<(), DatabaseError> {
        if self.booted {
            return Err(DatabaseError::AlreadyBooted);
        }
        let name = name.into();
        if self.profiles.contains_key(&name) {
            return Err(DatabaseError::DuplicateConnection(name));
        }
        self.profiles.insert(name, config);
        Ok(())
    }

    /// Open every registered connection.
    pub async fn boot(&mut self) -> Result<(), DatabaseError> {
        if self.booted {
            return Err(DatabaseError::AlreadyBooted);
        }
        if self.profiles.is_empty() {
            return Err(DatabaseError::NoConnections);
        }
        if !self.profiles.contains_key(&self.default) {
            return Err(DatabaseError::UnknownConnection(self.default.clone()));
        }

        let mut opened = BTreeMap::new();
        for (name, profile) in &self.profiles {
            match DatabaseConnection::open(name, profile).await {
                Ok(conn) => {
                    tracing::info!(connection = %name, driver = %profile.driver, "Connection ready");
                    opened.insert(name.clone(), conn);
                }
                Err(e) => {
                    tracing::error!(connection = %name, error = %e, "Connection failed, closing opened pools");
                    for conn in opened.values() {
                        conn.close().await;
                    }
                    return Err(e);
                }
            }
        }

        self.connections = opened;
        self.booted = true;

        tracing::info!(
            connections = self.connections.len(),
            default = %self.default,
            "Database manager booted"
        );
        Ok(())
    }

    pub fn is_booted(&self) -> bool {
        self.booted
    }

    /// Look up a booted connection by name.
    pub fn connection(&self, name: &str) -> Result<&DatabaseConnection, DatabaseError> {
        if !self.booted {
            return Err(DatabaseError::NotBooted);
        }
        self.connections
            .get(name)
            .ok_or_else(|| DatabaseError::UnknownConnection(name.to_string()))
    }

    /// The connection named as default.
    pub fn default_connection(&self) -> Result<&DatabaseConnection, DatabaseError> {
        self.connection(&self.default)
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }

    /// Names of all registered profiles, booted or not.
    pub fn connection_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Close every pool. Connections stay registered but become unusable.
    pub async fn close(&self) {
        for (name, conn) in &self.connections {
            conn.close().await;
            tracing::debug!(connection = %name, "Connection pool closed");
        }
    }
}

impl Default for DatabaseManager {
    fn default() -> Self {
        Self::new()
    }
}
