//! Route definitions for this application.

pub mod web;

pub use web::WebRoutes;
