//! Shared utilities for integration tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use app_bootstrap::database::DatabaseManager;
use app_bootstrap::routing::{RouteError, RouteRegistrar, RouteTable};

/// Config with one SQLite connection stored in `dir`, listening on an ephemeral port.
pub fn sqlite_config(dir: &Path) -> String {
    format!(
        r#"
        [server]
        bind_address = "127.0.0.1:0"
        request_timeout_secs = 5

        [observability]
        log_level = "debug"

        [database]
        default = "default"

        [database.connections.default]
        driver = "sqlite"
        database = "{}"
        prefix = "app_"
        foreign_keys = true
        "#,
        dir.join("app.sqlite").display()
    )
}

/// Write `contents` to `app.toml` inside `dir`.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("app.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

/// Registrar that counts invocations and remembers whether the database was booted.
#[derive(Default)]
#[allow(dead_code)]
pub struct CountingRegistrar {
    pub calls: AtomicUsize,
    pub booted_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingRegistrar {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn booted_calls(&self) -> usize {
        self.booted_calls.load(Ordering::SeqCst)
    }
}

impl RouteRegistrar for CountingRegistrar {
    fn register(&self, routes: &mut RouteTable, database: &DatabaseManager) -> Result<(), RouteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if database.is_booted() {
            self.booted_calls.fetch_add(1, Ordering::SeqCst);
        }
        routes.get("/ping", || async { "pong" })?;
        Ok(())
    }
}
