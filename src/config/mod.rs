//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or inline TOML
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never changes afterwards
//! - All fields except the connection profiles have defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigSource};
pub use schema::{
    AppConfig, ConnectionConfig, DatabaseConfig, Driver, ObservabilityConfig, PoolConfig,
    ServerConfig,
};
pub use validation::ValidationError;
