use crate::db::models::{StudentNote, User};
use crate::db::notes;
use crate::error::{AppError, AppResult};
use crate::handlers::types::{CreateNoteRequest, UpdateContentRequest};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

// Notes are private: every route below is student-gated and owner-scoped.

/// POST /createNote
pub async fn create_note(
    State(state): State<AppState>,
    Extension(student): Extension<User>,
    Json(req): Json<CreateNoteRequest>,
) -> AppResult<(StatusCode, Json<StudentNote>)> {
    let note = notes::create(
        &state.db,
        &student.email,
        req.session_id,
        &req.title,
        req.content.unwrap_or_else(|| json!({})),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /studentNote
pub async fn list_my_notes(
    State(state): State<AppState>,
    Extension(student): Extension<User>,
) -> AppResult<Json<Vec<StudentNote>>> {
    Ok(Json(notes::list_by_student(&state.db, &student.email).await?))
}

/// GET /studentMaterials/:sessionId
pub async fn list_my_session_notes(
    State(state): State<AppState>,
    Extension(student): Extension<User>,
    Path(session_id): Path<String>,
) -> AppResult<Json<Vec<StudentNote>>> {
    Ok(Json(
        notes::list_by_student_and_session(&state.db, &student.email, &session_id).await?,
    ))
}

/// GET /noteToID/:id
pub async fn get_note(
    State(state): State<AppState>,
    Extension(student): Extension<User>,
    Path(id): Path<String>,
) -> AppResult<Json<StudentNote>> {
    Ok(Json(owned_note(&state, &student, &id).await?))
}

/// PUT /updateNote/:id
pub async fn update_note(
    State(state): State<AppState>,
    Extension(student): Extension<User>,
    Path(id): Path<String>,
    Json(req): Json<UpdateContentRequest>,
) -> AppResult<Json<StudentNote>> {
    owned_note(&state, &student, &id).await?;

    Ok(Json(
        notes::update(&state.db, &id, req.title, req.content).await?,
    ))
}

/// DELETE /deleteNote/:id
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(student): Extension<User>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    owned_note(&state, &student, &id).await?;
    notes::delete(&state.db, &id).await?;

    Ok(Json(json!({ "success": true, "id": id })))
}

async fn owned_note(state: &AppState, student: &User, id: &str) -> AppResult<StudentNote> {
    let note = notes::find_by_id(&state.db, id).await?;
    if note.student_email != student.email {
        return Err(AppError::Forbidden("This note belongs to another student".to_string()));
    }
    Ok(note)
}
