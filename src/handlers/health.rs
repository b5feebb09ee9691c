//! # Health Check Handlers
//!
//! Endpoints that report the server is up. Used by load balancers and
//! monitoring; they never touch the database and never fail.

use axum::Json;
use serde_json::{json, Value};

/// Health check endpoint
///
/// ## Route
/// GET /health
///
/// ## Response
/// ```json
/// {
///   "status": "healthy",
///   "service": "tutoring-server"
/// }
/// ```
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "tutoring-server"
    }))
}

/// GET / banner
pub async fn root() -> &'static str {
    "Tutoring session server is running"
}
