//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup, after the database is booted):
//!     RouteRegistrar::register(&mut RouteTable, &DatabaseManager)
//!     → pattern.rs (parse & validate each path)
//!     → table.rs (reject duplicates/conflicts, keep order)
//!     → into_router() → axum Router, immutable at runtime
//! ```
//!
//! # Design Decisions
//! - Routes are data, registered by an explicit call
//! - Deterministic: same registrations always produce the same router
//! - Registration errors are fatal at startup

pub mod pattern;
pub mod table;

use axum::http::Method;
use thiserror::Error;

pub use pattern::{RoutePattern, Segment};
pub use table::{Route, RouteRegistrar, RouteSummary, RouteTable};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("route {method} {path} is already registered")]
    Duplicate { method: Method, path: String },

    #[error("route '{path}' conflicts with '{existing}'")]
    Conflict { path: String, existing: String },

    #[error("method {0} cannot be routed")]
    UnsupportedMethod(Method),
}
