//! Application entry point.
//!
//! # Architecture Overview
//!
//! ```text
//!   config/app.toml
//!        │
//!        ▼
//!  ┌───────────┐   ┌──────────┐   ┌──────────────┐   ┌──────────────┐
//!  │  drivers  │──▶│  config  │──▶│   database   │──▶│   routing    │
//!  │ (sqlx any)│   │ load +   │   │   manager    │   │ RouteTable → │
//!  │           │   │ validate │   │   boot()     │   │ axum Router  │
//!  └───────────┘   └──────────┘   └──────┬───────┘   └──────┬───────┘
//!                                        │ Arc              │
//!                                        ▼                  ▼
//!                                 ┌──────────────────────────────┐
//!                                 │  HttpServer (AppState)       │
//!                                 │  request id · trace · limits │
//!                                 └──────────────────────────────┘
//! ```
//!
//! Every step is fatal on failure; the server only starts once the
//! database manager is booted and the routes are registered.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use app_bootstrap::config::ConfigSource;
use app_bootstrap::lifecycle::{Bootstrap, Shutdown};
use app_bootstrap::observability::logging::{init_logging, LogFormat};
use app_bootstrap::observability::metrics::init_metrics;
use app_bootstrap::routes::WebRoutes;

#[derive(Parser)]
#[command(name = "app-bootstrap", version)]
#[command(about = "Boot the database connections and serve the application routes", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "APP_CONFIG", default_value = "config/app.toml", global = true)]
    config: PathBuf,

    /// Log output format.
    #[arg(long, value_enum, env = "APP_LOG_FORMAT", default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Boot everything, then exit without serving
    Check,
    /// Print the registered routes
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let log_handle = init_logging(cli.log_format)?;

    tracing::info!("app-bootstrap v{} starting", env!("CARGO_PKG_VERSION"));

    let app = match Bootstrap::new(ConfigSource::File(cli.config.clone()))
        .with_log_handle(log_handle)
        .run(&WebRoutes)
        .await
    {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Check => {
            tracing::info!("Startup check passed");
            app.close().await;
        }
        Commands::Routes => {
            for route in app.routes() {
                println!(
                    "{:<7} {:<32} {}",
                    route.method.as_str(),
                    route.path,
                    route.name.as_deref().unwrap_or("")
                );
            }
            app.close().await;
        }
        Commands::Serve => {
            if app.config().observability.metrics_enabled {
                let addr = app.config().observability.metrics_address.parse()?;
                init_metrics(addr)?;
                app.record_metrics();
            }

            let listener = app.bind().await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");

            let shutdown = Shutdown::new();
            shutdown.trigger_on_signal();
            app.serve(listener, shutdown.subscribe()).await?;

            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
