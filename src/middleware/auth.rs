use crate::auth::gate;
use crate::db::models::Role;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Any valid bearer token passes; the verified `Identity` goes into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = state.tokens.authenticate(request.headers())?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&state, Role::Admin, request, next).await
}

pub async fn require_tutor(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&state, Role::Tutor, request, next).await
}

pub async fn require_student(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&state, Role::Student, request, next).await
}

async fn require_role(
    state: &AppState,
    role: Role,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = state.tokens.authenticate(request.headers())?;
    let user = gate::authorize(&state.db, &identity, role).await?;

    request.extensions_mut().insert(identity);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
