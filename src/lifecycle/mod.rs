//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Register drivers → Load config → Boot database → Register routes
//!     → Application (bind, serve)
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain requests → Close pools → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then database, then routes, listener last
//! - Ordered shutdown: stop accept, drain, close database

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Application, Bootstrap, Stage, StartupError};
