use crate::db::users::normalize_email;
use crate::error::{AppError, AppResult};
use crate::handlers::types::TokenRequest;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `POST /jwt`: sign a token for the supplied email.
///
/// Holding a token grants nothing by itself; every gated route re-reads the
/// caller's stored role.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> AppResult<Json<Value>> {
    let email = normalize_email(&req.email);
    if !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }

    let token = state.tokens.issue(&email)?;
    tracing::debug!(%email, "Token issued");

    Ok(Json(json!({ "token": token })))
}

/// `GET /logout`: tokens are stateless, the client just drops its copy.
pub async fn logout() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
}
