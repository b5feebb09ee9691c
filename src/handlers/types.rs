//! # API Request Types
//!
//! JSON bodies accepted by the handlers. Field aliases accept the camelCase
//! names older clients send (`sessionId`, `photoURL`, ...).

use crate::db::models::{Role, SessionStatus};
use serde::Deserialize;
use serde_json::Value;

/// `POST /jwt`
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

/// `PUT /user`
///
/// `role` may only be `student` (the default) or `tutor`.
#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    pub email: String,
    pub name: Option<String>,
    #[serde(alias = "photo", alias = "photoURL")]
    pub photo_url: Option<String>,
    pub role: Option<Role>,
}

/// `PATCH /users/update/:email`
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// `POST /session`
///
/// The tutor is always the caller. `tutor` may be sent for compatibility
/// but must then name the caller.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(alias = "tutor_email", alias = "tutorEmail")]
    pub tutor: Option<String>,
    #[serde(alias = "tutorName")]
    pub tutor_name: Option<String>,
    pub details: Option<Value>,
}

/// `PATCH /manageAdmin/update/:id` and `PATCH /rejectSession/update/:id`
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: SessionStatus,
    /// Required when `status` is `approved`
    #[serde(alias = "fee")]
    pub price: Option<f64>,
}

/// `PUT /rejectedAdmin/:id`
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
    pub feedback: Option<String>,
    /// Accepted for compatibility; anything but `rejected` is refused
    pub status: Option<SessionStatus>,
}

/// `PUT /updateAdminSession/update/:id`
#[derive(Debug, Deserialize)]
pub struct EditSessionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "tutorName")]
    pub tutor_name: Option<String>,
    pub details: Option<Value>,
    #[serde(alias = "price")]
    pub fee: Option<f64>,
}

/// `POST /sessionBookingInfo`
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(alias = "sessionId")]
    pub session_id: String,
    pub material: Option<Value>,
}

/// `PUT /updateBooked/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub material: Value,
}

/// `POST /materials`
#[derive(Debug, Deserialize)]
pub struct CreateMaterialRequest {
    #[serde(alias = "sessionId", alias = "sessionID")]
    pub session_id: String,
    pub title: String,
    pub content: Option<Value>,
}

/// `POST /createNote`
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(alias = "sessionId")]
    pub session_id: Option<String>,
    pub title: String,
    pub content: Option<Value>,
}

/// `PUT /updateMaterial/:id` and `PUT /updateNote/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    pub title: Option<String>,
    pub content: Option<Value>,
}
