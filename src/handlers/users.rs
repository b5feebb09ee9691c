//! # User Handlers
//!
//! Sign-up (insert-if-absent), lookups, and admin role management.

use crate::db::models::{Role, User};
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::handlers::types::{UpdateRoleRequest, UpsertUserRequest};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

/// Save a user the first time they sign in
///
/// ## Route
/// PUT /user
///
/// ## Behaviour
/// - Unknown email: the user is created with the requested role (default `student`)
/// - Known email: the stored user is returned unchanged
/// - `admin` cannot be requested here; admins are appointed by another admin
///   or through `ADMIN_EMAIL`
pub async fn upsert_user(
    State(state): State<AppState>,
    Json(req): Json<UpsertUserRequest>,
) -> AppResult<Json<User>> {
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }

    let role = match req.role {
        Some(Role::Admin) => {
            return Err(AppError::BadRequest(
                "The admin role cannot be self-assigned".to_string(),
            ))
        }
        Some(role) => role,
        None => Role::Student,
    };

    let user = users::insert_if_absent(&state.db, &req.email, req.name, req.photo_url, role).await?;

    Ok(Json(user))
}

/// GET /user/:email
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<User>> {
    let user = users::find_by_email(&state.db, &email).await?;

    Ok(Json(user))
}

/// GET /users (admin)
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let all = users::list_all(&state.db).await?;

    Ok(Json(all))
}

/// PATCH /users/update/:email (admin)
pub async fn update_role(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> AppResult<Json<User>> {
    let user = users::update_role(&state.db, &email, req.role).await?;

    Ok(Json(user))
}
