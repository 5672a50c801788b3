//! Failure injection tests for startup.

use app_bootstrap::config::{ConfigError, ConfigSource};
use app_bootstrap::database::DatabaseError;
use app_bootstrap::lifecycle::{Bootstrap, StartupError};

mod common;

#[tokio::test]
async fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let registrar = common::CountingRegistrar::default();

    let err = Bootstrap::new(ConfigSource::File(dir.path().join("absent.toml")))
        .run(&registrar)
        .await
        .err()
        .expect("startup should fail");

    assert!(matches!(err, StartupError::Config(ConfigError::Io { .. })));
    assert_eq!(registrar.calls(), 0, "routing must not run");
}

#[tokio::test]
async fn test_malformed_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "[database.connections.default\ndriver = ");
    let registrar = common::CountingRegistrar::default();

    let err = Bootstrap::new(ConfigSource::File(path))
        .run(&registrar)
        .await
        .err()
        .expect("startup should fail");

    assert!(matches!(err, StartupError::Config(ConfigError::Parse(_))));
    assert_eq!(registrar.calls(), 0);
}

#[tokio::test]
async fn test_invalid_config_reports_every_problem() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(
        dir.path(),
        r#"
        [database]
        default = "primary"

        [database.connections.reports]
        driver = "pgsql"
        database = "reports"
        "#,
    );
    let registrar = common::CountingRegistrar::default();

    let err = Bootstrap::new(ConfigSource::File(path))
        .run(&registrar)
        .await
        .err()
        .expect("startup should fail");

    match err {
        StartupError::Config(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 2, "unknown default + missing host: {errors:?}");
        }
        other => panic!("expected validation failure, got {other}"),
    }
    assert_eq!(registrar.calls(), 0);
}

#[tokio::test]
async fn test_unreachable_database() {
    let registrar = common::CountingRegistrar::default();
    let config = r#"
        [database.connections.default]
        driver = "pgsql"
        host = "127.0.0.1"
        port = 1
        database = "app"
        username = "app"

        [database.connections.default.pool]
        connect_timeout_secs = 2
    "#;

    let err = Bootstrap::new(ConfigSource::Inline(config.into()))
        .run(&registrar)
        .await
        .err()
        .expect("startup should fail");

    assert!(matches!(
        err,
        StartupError::Database(DatabaseError::Connect { ref connection, .. }) if connection == "default"
    ));
    assert_eq!(registrar.calls(), 0, "routing must not run without a database");
}

#[tokio::test]
async fn test_one_bad_connection_fails_the_whole_boot() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::sqlite_config(dir.path());
    config.push_str(
        r#"
        [database.connections.legacy]
        driver = "mysql"
        host = "127.0.0.1"
        port = 1
        database = "legacy"

        [database.connections.legacy.pool]
        connect_timeout_secs = 2
        "#,
    );
    let registrar = common::CountingRegistrar::default();

    let err = Bootstrap::new(ConfigSource::Inline(config))
        .run(&registrar)
        .await
        .err()
        .expect("startup should fail");

    assert!(matches!(err, StartupError::Database(_)));
    assert_eq!(registrar.calls(), 0);
}
