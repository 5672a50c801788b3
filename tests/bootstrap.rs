//! End-to-end startup and serving tests.

use std::time::Duration;

use app_bootstrap::config::ConfigSource;
use app_bootstrap::http::X_REQUEST_ID;
use app_bootstrap::lifecycle::{Bootstrap, Shutdown, Stage};
use app_bootstrap::routes::WebRoutes;

mod common;

#[tokio::test]
async fn test_boots_from_file_and_serves_routes() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), &common::sqlite_config(dir.path()));

    let app = Bootstrap::new(ConfigSource::File(path))
        .run(&WebRoutes)
        .await
        .expect("startup should succeed");

    assert_eq!(
        app.stages(),
        &[Stage::Drivers, Stage::Configuration, Stage::Database, Stage::Routes]
    );
    let database = app.database().clone();
    assert!(database.is_booted());
    assert!(dir.path().join("app.sqlite").exists(), "SQLite file created on boot");

    let listener = app.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = tokio::spawn(async move { app.serve(listener, server_shutdown).await });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    let res = client.get(format!("http://{}/", addr)).send().await.expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key(X_REQUEST_ID));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "app-bootstrap");

    let res = client.get(format!("http://{}/health", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["connections"][0]["name"], "default");
    assert_eq!(body["connections"][0]["driver"], "sqlite");

    let res = client.get(format!("http://{}/health/default", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.get(format!("http://{}/health/missing", addr)).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let res = client
        .get(format!("http://{}/no/such/page", addr))
        .header(X_REQUEST_ID, "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()[X_REQUEST_ID], "req-42");

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should stop after shutdown")
        .unwrap();
    assert!(result.is_ok());
    assert!(database.default_connection().unwrap().is_closed());
}

#[tokio::test]
async fn test_injected_manager_is_usable_by_callers() {
    let dir = tempfile::tempdir().unwrap();
    let app = Bootstrap::new(ConfigSource::Inline(common::sqlite_config(dir.path())))
        .run(&WebRoutes)
        .await
        .expect("startup should succeed");

    let conn = app.database().default_connection().unwrap();
    let table = conn.table("posts");
    assert_eq!(table, "app_posts");

    sqlx::query(&format!("CREATE TABLE {} (id INTEGER PRIMARY KEY, title TEXT NOT NULL)", table))
        .execute(conn.pool())
        .await
        .unwrap();
    sqlx::query(&format!("INSERT INTO {} (title) VALUES ('hello')", table))
        .execute(conn.pool())
        .await
        .unwrap();
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(conn.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);

    app.close().await;
}

#[tokio::test]
async fn test_route_listing() {
    let dir = tempfile::tempdir().unwrap();
    let registrar = common::CountingRegistrar::default();
    let app = Bootstrap::new(ConfigSource::Inline(common::sqlite_config(dir.path())))
        .run(&registrar)
        .await
        .expect("startup should succeed");

    assert_eq!(registrar.calls(), 1);
    assert_eq!(registrar.booted_calls(), 1, "routes registered after the database booted");

    let routes = app.routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].method, "GET");
    assert_eq!(routes[0].path, "/ping");

    app.close().await;
}
