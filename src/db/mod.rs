//! # Database Module
//!
//! All database-related code, one submodule per table:
//! - `models`: Row types (User, Session, Booking, Material, StudentNote)
//! - `users`: Insert-if-absent, lookups and role changes
//! - `sessions`: Session CRUD and the status state machine
//! - `bookings`: Student bookings against approved sessions
//! - `materials`: Tutor materials attached to sessions
//! - `notes`: Student notes
//!
//! Every function takes the pool explicitly; nothing here holds global state.

use crate::error::AppResult;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub mod bookings;
pub mod materials;
pub mod models;
pub mod notes;
pub mod sessions;
pub mod users;

/// Open the pool and bring the schema up to date.
pub async fn connect(database_url: &str) -> AppResult<SqlitePool> {
    // An in-memory database lives and dies with its connection, so it gets exactly one
    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await?
    } else {
        SqlitePool::connect(database_url).await?
    };

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
