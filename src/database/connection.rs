//! A single named, pooled database connection.

use std::sync::Arc;
use std::time::Duration;

use sqlx::any::AnyPoolOptions;
use sqlx::{AnyPool, Executor};

use crate::config::{ConnectionConfig, Driver};
use crate::database::dsn::{connection_url, session_statements};
use crate::database::DatabaseError;

/// A booted connection profile backed by an sqlx pool.
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    name: String,
    driver: Driver,
    prefix: String,
    pool: AnyPool,
}

impl DatabaseConnection {
    /// Open the pool and prove at least one connection can be established.
    pub(crate) async fn open(name: &str, config: &ConnectionConfig) -> Result<Self, DatabaseError> {
        let url = connection_url(config).map_err(|reason| DatabaseError::InvalidUrl {
            connection: name.to_string(),
            reason,
        })?;
        let statements = Arc::new(session_statements(config));

        tracing::debug!(
            connection = %name,
            driver = %config.driver,
            host = %config.host,
            database = %config.database,
            "Opening connection pool"
        );

        let pool = AnyPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .min_connections(config.pool.min_connections)
            .acquire_timeout(Duration::from_secs(config.pool.connect_timeout_secs))
            .after_connect(move |conn, _meta| {
                let statements = statements.clone();
                Box::pin(async move {
                    for statement in statements.iter() {
                        (&mut *conn).execute(statement.as_str()).await?;
                    }
                    Ok(())
                })
            })
            .connect(&url)
            .await
            .map_err(|source| DatabaseError::Connect {
                connection: name.to_string(),
                source,
            })?;

        Ok(Self {
            name: name.to_string(),
            driver: config.driver,
            prefix: config.prefix.clone(),
            pool,
        })
    }

    /// Connection name as registered with the manager.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Driver the profile was configured with.
    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// The underlying pool, for running queries.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Resolve a table name through the configured prefix.
    pub fn table(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Round-trip a trivial query to check the connection is usable.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|source| DatabaseError::Query {
                connection: self.name.clone(),
                source,
            })?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
