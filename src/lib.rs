//! Application bootstrap library.
//!
//! Loads the connection configuration, boots the database manager and
//! serves the registered routes with the manager injected as state.

pub mod config;
pub mod database;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routes;
pub mod routing;

pub use config::schema::AppConfig;
pub use database::DatabaseManager;
pub use http::HttpServer;
pub use lifecycle::{Application, Bootstrap, Shutdown, StartupError};
pub use routing::{RouteRegistrar, RouteTable};
