//! # Material Handlers
//!
//! Tutors attach materials to their own sessions; any signed-in user may
//! read them.

use crate::db::models::{Material, User};
use crate::db::{materials, sessions};
use crate::error::{AppError, AppResult};
use crate::handlers::types::{CreateMaterialRequest, UpdateContentRequest};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

/// POST /materials (tutor of the session)
pub async fn create_material(
    State(state): State<AppState>,
    Extension(tutor): Extension<User>,
    Json(req): Json<CreateMaterialRequest>,
) -> AppResult<(StatusCode, Json<Material>)> {
    let session = sessions::find_by_id(&state.db, &req.session_id).await?;
    if session.tutor_email != tutor.email {
        return Err(AppError::Forbidden(
            "Materials can only be added to your own sessions".to_string(),
        ));
    }

    let material = materials::create(
        &state.db,
        &session.id,
        &tutor.email,
        &req.title,
        req.content.unwrap_or_else(|| json!({})),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(material)))
}

/// GET /materials
pub async fn list_materials(State(state): State<AppState>) -> AppResult<Json<Vec<Material>>> {
    Ok(Json(materials::list_all(&state.db).await?))
}

/// GET /allMaterials/:sessionID
pub async fn list_session_materials(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<Vec<Material>>> {
    Ok(Json(materials::list_by_session(&state.db, &session_id).await?))
}

/// GET /materialToID/:id
pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Material>> {
    Ok(Json(materials::find_by_id(&state.db, &id).await?))
}

/// PUT /updateMaterial/:id (owning tutor)
pub async fn update_material(
    State(state): State<AppState>,
    Extension(tutor): Extension<User>,
    Path(id): Path<String>,
    Json(req): Json<UpdateContentRequest>,
) -> AppResult<Json<Material>> {
    ensure_owner(&state, &tutor, &id).await?;

    Ok(Json(
        materials::update(&state.db, &id, req.title, req.content).await?,
    ))
}

/// DELETE /deleteMaterial/:id (owning tutor)
pub async fn delete_material(
    State(state): State<AppState>,
    Extension(tutor): Extension<User>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    ensure_owner(&state, &tutor, &id).await?;
    materials::delete(&state.db, &id).await?;

    Ok(Json(json!({ "success": true, "id": id })))
}

async fn ensure_owner(state: &AppState, tutor: &User, id: &str) -> AppResult<()> {
    let material = materials::find_by_id(&state.db, id).await?;
    if material.tutor_email != tutor.email {
        return Err(AppError::Forbidden(
            "Only the tutor who uploaded a material may change it".to_string(),
        ));
    }
    Ok(())
}
