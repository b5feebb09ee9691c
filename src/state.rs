//! # Application State
//!
//! The shared state every request handler receives through axum's `State`
//! extractor. Store handles are passed in here, never captured from globals.
//!
//! ## The State Pattern
//! 1. Create the connection pool and token service once at startup
//! 2. Store them in AppState
//! 3. Axum clones the state for each request (cheap: a pool handle and an Arc)

use crate::auth::token::TokenService;
use crate::config::Config;
use crate::db;
use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

/// Shared application state
///
/// - `db`: SQLite connection pool (already reference-counted internally)
/// - `tokens`: bearer token signer/verifier, behind an `Arc`
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Initialize application state
    ///
    /// This function:
    /// 1. Connects to the SQLite database
    /// 2. Runs embedded migrations
    /// 3. Builds the token service from the configured secret and validity window
    ///
    /// # Errors
    /// Returns an error if the database connection or the migrations fail.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::connect(&config.database_url).await?;
        let tokens = Arc::new(TokenService::new(
            config.jwt_secret.as_bytes(),
            config.token_ttl,
        ));

        Ok(AppState { db, tokens })
    }
}
