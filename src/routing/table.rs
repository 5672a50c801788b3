//! Route table and registration.
//!
//! # Responsibilities
//! - Store `(method, pattern) → handler` entries in registration order
//! - Reject duplicate and conflicting registrations up front
//! - Compile the table into an axum router
//!
//! # Design Decisions
//! - The table is plain data built by an explicit call, not by side effects
//! - Conflicts are errors here rather than panics inside axum
//! - Routes sharing a path are merged into one method router

use std::fmt;

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;

use crate::database::DatabaseManager;
use crate::http::server::AppState;
use crate::routing::pattern::RoutePattern;
use crate::routing::RouteError;

/// A single registered route.
pub struct Route {
    method: Method,
    pattern: RoutePattern,
    name: Option<String>,
    handler: MethodRouter<AppState>,
}

impl Route {
    /// HTTP method this route answers.
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Attach a human-readable name, shown in route listings.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("name", &self.name)
            .finish()
    }
}

/// Handler-free view of a route, kept after the table is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub method: Method,
    pub path: String,
    pub name: Option<String>,
}

/// Ordered collection of routes for the HTTP server.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` requests matching `path`.
    pub fn add<H, T>(&mut self, method: Method, path: &str, handler: H) -> Result<&mut Route, RouteError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        let pattern = RoutePattern::parse(path)?;
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| RouteError::UnsupportedMethod(method.clone()))?;

        for existing in &self.routes {
            if existing.pattern.as_str() == pattern.as_str() {
                if existing.method == method {
                    return Err(RouteError::Duplicate {
                        method,
                        path: pattern.as_str().to_string(),
                    });
                }
                continue;
            }
            if existing.pattern.conflicts_with(&pattern) {
                return Err(RouteError::Conflict {
                    path: pattern.as_str().to_string(),
                    existing: existing.pattern.as_str().to_string(),
                });
            }
        }

        tracing::debug!(method = %method, path = %pattern, "Route registered");
        self.routes.push(Route {
            method,
            pattern,
            name: None,
            handler: on(filter, handler),
        });
        let last = self.routes.len() - 1;
        Ok(&mut self.routes[last])
    }

    pub fn get<H, T>(&mut self, path: &str, handler: H) -> Result<&mut Route, RouteError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::GET, path, handler)
    }

    pub fn post<H, T>(&mut self, path: &str, handler: H) -> Result<&mut Route, RouteError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::POST, path, handler)
    }

    pub fn put<H, T>(&mut self, path: &str, handler: H) -> Result<&mut Route, RouteError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::PUT, path, handler)
    }

    pub fn patch<H, T>(&mut self, path: &str, handler: H) -> Result<&mut Route, RouteError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::PATCH, path, handler)
    }

    pub fn delete<H, T>(&mut self, path: &str, handler: H) -> Result<&mut Route, RouteError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::DELETE, path, handler)
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Method, path and name of every route.
    pub fn summary(&self) -> Vec<RouteSummary> {
        self.routes
            .iter()
            .map(|r| RouteSummary {
                method: r.method.clone(),
                path: r.pattern.as_str().to_string(),
                name: r.name.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Compile into an axum router still awaiting its state.
    pub fn into_router(self) -> Router<AppState> {
        let mut grouped: Vec<(String, Vec<MethodRouter<AppState>>)> = Vec::new();
        for route in self.routes {
            let path = route.pattern.as_str();
            let existing = grouped.iter().position(|(p, _)| p == path);
            match existing {
                Some(i) => grouped[i].1.push(route.handler),
                None => grouped.push((path.to_string(), vec![route.handler])),
            }
        }

        grouped
            .into_iter()
            .fold(Router::new(), |router, (path, handlers)| {
                match handlers.into_iter().reduce(MethodRouter::merge) {
                    Some(handler) => router.route(&path, handler),
                    None => router,
                }
            })
    }
}

/// Explicit route registration seam.
///
/// Called once at startup, after the database manager is booted.
pub trait RouteRegistrar {
    fn register(&self, routes: &mut RouteTable, database: &DatabaseManager) -> Result<(), RouteError>;
}

impl<F> RouteRegistrar for F
where
    F: Fn(&mut RouteTable, &DatabaseManager) -> Result<(), RouteError>,
{
    fn register(&self, routes: &mut RouteTable, database: &DatabaseManager) -> Result<(), RouteError> {
        self(routes, database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok() -> &'static str {
        "ok"
    }

    #[test]
    fn test_registration_order_and_names() {
        let mut table = RouteTable::new();
        table.get("/", ok).unwrap().name("home");
        table.post("/users", ok).unwrap();
        table.get("/users", ok).unwrap().name("users.index");

        let listing: Vec<_> = table
            .routes()
            .iter()
            .map(|r| (r.method().as_str(), r.pattern().as_str(), r.route_name()))
            .collect();
        assert_eq!(
            listing,
            vec![
                ("GET", "/", Some("home")),
                ("POST", "/users", None),
                ("GET", "/users", Some("users.index")),
            ]
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut table = RouteTable::new();
        table.get("/users/{id}", ok).unwrap();
        let err = table.get("/users/{id}", ok).unwrap_err();
        assert!(matches!(err, RouteError::Duplicate { ref method, .. } if *method == Method::GET));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_conflicting_param_names_rejected() {
        let mut table = RouteTable::new();
        table.get("/users/{id}", ok).unwrap();
        let err = table.delete("/users/{user}", ok).unwrap_err();
        assert!(matches!(
            err,
            RouteError::Conflict { ref existing, .. } if existing == "/users/{id}"
        ));
    }

    #[test]
    fn test_param_and_catch_all_at_same_position_rejected() {
        let mut table = RouteTable::new();
        table.get("/users/{id}", ok).unwrap();
        table.get("/users/me", ok).unwrap();
        table.get("/users/{id}/posts", ok).unwrap();

        let err = table.get("/users/{*rest}", ok).unwrap_err();
        assert!(matches!(
            err,
            RouteError::Conflict { ref path, ref existing }
                if path == "/users/{*rest}" && existing == "/users/{id}"
        ));
        assert_eq!(table.len(), 3);

        // What remains compiles without axum rejecting it
        let state = AppState {
            config: std::sync::Arc::new(crate::config::AppConfig::default()),
            database: std::sync::Arc::new(DatabaseManager::new()),
        };
        let _router: Router = table.into_router().with_state(state);
    }

    #[test]
    fn test_same_path_different_methods_allowed() {
        let mut table = RouteTable::new();
        table.get("/users/{id}", ok).unwrap();
        table.put("/users/{id}", ok).unwrap();
        table.delete("/users/{id}", ok).unwrap();
        assert_eq!(table.len(), 3);
        let _router = table.into_router();
    }

    #[test]
    fn test_invalid_path_propagates() {
        let mut table = RouteTable::new();
        assert!(matches!(
            table.get("/users/:id", ok),
            Err(RouteError::InvalidPath { .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_closure_registrar() {
        let registrar = |routes: &mut RouteTable, _db: &DatabaseManager| -> Result<(), RouteError> {
            routes.get("/ping", ok)?;
            Ok(())
        };
        let mut table = RouteTable::new();
        registrar.register(&mut table, &DatabaseManager::new()).unwrap();
        assert_eq!(table.len(), 1);
    }
}
