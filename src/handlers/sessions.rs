//! # Session Handlers
//!
//! Tutors propose sessions; admins approve, reject, edit and delete them.
//! Status rules live in `db::sessions`; these handlers only translate
//! request bodies into a [`Transition`].

use crate::db::models::{Session, SessionStatus, User};
use crate::db::sessions::{self, SessionEdit, Transition};
use crate::db::users::normalize_email;
use crate::error::{AppError, AppResult};
use crate::handlers::types::{
    CreateSessionRequest, EditSessionRequest, RejectRequest, StatusChangeRequest,
};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

/// POST /session (tutor): the new session is always `pending`.
pub async fn create_session(
    State(state): State<AppState>,
    Extension(tutor): Extension<User>,
    Json(req): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<Session>)> {
    let tutor_email = tutor.email;

    if let Some(tutor) = &req.tutor {
        if normalize_email(tutor) != tutor_email {
            return Err(AppError::BadRequest(
                "Sessions can only be proposed for yourself".to_string(),
            ));
        }
    }

    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    let session = Session::new(
        title.to_string(),
        req.description,
        tutor_email,
        req.tutor_name,
        req.details.unwrap_or_else(|| json!({})),
    );
    sessions::create(&state.db, &session).await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /session
pub async fn list_sessions(State(state): State<AppState>) -> AppResult<Json<Vec<Session>>> {
    Ok(Json(sessions::list_all(&state.db).await?))
}

/// GET /approved and GET /commonSession
pub async fn list_approved(State(state): State<AppState>) -> AppResult<Json<Vec<Session>>> {
    Ok(Json(
        sessions::list_by_status(&state.db, SessionStatus::Approved).await?,
    ))
}

/// GET /manageSession (admin)
pub async fn list_manageable(State(state): State<AppState>) -> AppResult<Json<Vec<Session>>> {
    Ok(Json(sessions::list_manageable(&state.db).await?))
}

/// GET /getToID/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Session>> {
    Ok(Json(sessions::find_by_id(&state.db, &id).await?))
}

/// PATCH /manageAdmin/update/:id and PATCH /rejectSession/update/:id (admin)
///
/// Body `{ status, price }`; approving requires `price`.
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusChangeRequest>,
) -> AppResult<Json<Session>> {
    let change = requested_transition(req.status, req.price)?;
    let session = sessions::transition(&state.db, &id, change).await?;

    Ok(Json(session))
}

/// PUT /rejectedAdmin/:id (admin): reject with reason and feedback.
pub async fn reject_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> AppResult<Json<Session>> {
    if let Some(status) = req.status {
        if status != SessionStatus::Rejected {
            return Err(AppError::BadRequest(format!(
                "This route only rejects sessions, got status '{}'",
                status
            )));
        }
    }

    let change = Transition::Reject {
        reason: req.reason,
        feedback: req.feedback,
    };
    let session = sessions::transition(&state.db, &id, change).await?;

    Ok(Json(session))
}

/// PUT /updateAdminSession/update/:id (admin): edit everything but the status.
pub async fn edit_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EditSessionRequest>,
) -> AppResult<Json<Session>> {
    if let Some(fee) = req.fee {
        validate_fee(fee)?;
    }

    let edit = SessionEdit {
        title: req.title,
        description: req.description,
        tutor_name: req.tutor_name,
        details: req.details,
        fee: req.fee,
    };

    Ok(Json(sessions::update_details(&state.db, &id, edit).await?))
}

/// DELETE /deleteSession/:id (admin)
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    sessions::delete(&state.db, &id).await?;

    Ok(Json(json!({ "success": true, "id": id })))
}

fn requested_transition(status: SessionStatus, price: Option<f64>) -> AppResult<Transition> {
    match status {
        SessionStatus::Approved => {
            let fee = price.ok_or_else(|| {
                AppError::BadRequest("A price is required to approve a session".to_string())
            })?;
            validate_fee(fee)?;
            Ok(Transition::Approve { fee })
        }
        SessionStatus::Rejected => Ok(Transition::Reject {
            reason: None,
            feedback: None,
        }),
        SessionStatus::Pending => Err(AppError::InvalidTransition(
            "Sessions never return to pending".to_string(),
        )),
    }
}

fn validate_fee(fee: f64) -> AppResult<()> {
    if !fee.is_finite() || fee < 0.0 {
        return Err(AppError::BadRequest(
            "Fee must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_needs_a_valid_price() {
        assert!(matches!(
            requested_transition(SessionStatus::Approved, None),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            requested_transition(SessionStatus::Approved, Some(-1.0)),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(
            requested_transition(SessionStatus::Approved, Some(20.0)).unwrap(),
            Transition::Approve { fee: 20.0 }
        );
    }

    #[test]
    fn pending_is_never_a_target() {
        assert!(matches!(
            requested_transition(SessionStatus::Pending, Some(1.0)),
            Err(AppError::InvalidTransition(_))
        ));
    }
}
