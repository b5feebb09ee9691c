//! # Tutoring Session Server
//!
//! REST backend for a tutoring-session marketplace.
//!
//! ## Key Concepts
//! - **Users** sign up by email and hold one role: student, tutor or admin
//! - **Sessions** are proposed by tutors and approved or rejected by admins
//! - **Bookings** let students reserve approved sessions
//! - **Materials** and **notes** hang off sessions
//!
//! Callers authenticate with a bearer token; gated routes compare the
//! caller's stored role with the role the route requires.

mod auth; // Bearer tokens and the role gate
mod config; // Configuration from environment variables
mod db; // Database operations, one module per table
mod error; // Error type and HTTP error responses
mod handlers; // HTTP request handlers
mod middleware; // Authentication/authorization layers
mod routes; // Router assembly
mod state; // Shared application state

#[cfg(test)]
mod test_support;

use crate::config::Config;
use crate::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main application entry point
///
/// This function:
/// 1. Sets up logging
/// 2. Loads configuration from environment variables
/// 3. Connects the database and applies migrations
/// 4. Ensures the configured admin account exists
/// 5. Builds the router and starts the HTTP server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default: info for dependencies, debug for this crate; RUST_LOG overrides
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tutoring_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded: {:?}", config);

    let app_state = AppState::new(&config).await?;
    tracing::info!("Application state initialized");

    if let Some(email) = &config.admin_email {
        let admin = db::users::ensure_admin(&app_state.db, email).await?;
        tracing::info!(email = %admin.email, "Admin account ensured");
    }

    let app = routes::router(app_state, &config);

    let bind_addr = config.bind_address();
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
