//! # Database Models
//!
//! Data structures that map to database rows. Each struct derives
//! `sqlx::FromRow` for reads and `Serialize` for API responses.
//!
//! ## Conventions
//! - **IDs**: UUID v4 strings generated by the server
//! - **Timestamps**: RFC3339 strings (SQLite stores them as TEXT)
//! - **Payloads**: free-form JSON documents stored in TEXT columns through
//!   `sqlx::types::Json`

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use std::fmt;
use uuid::Uuid;

/// Role stored on a user record. Route gates compare against it for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Student,
    Tutor,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Tutor => "tutor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account
///
/// Created the first time a user signs in (insert-if-absent by email).
/// Only an admin changes the role afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn new(email: String, name: Option<String>, photo_url: Option<String>, role: Role) -> Self {
        let now = Utc::now().to_rfc3339();

        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            photo_url,
            role,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Lifecycle status of a tutoring session
///
/// ```text
///   pending ──► approved
///      │           │
///      └──► rejected ◄┘
/// ```
///
/// Nothing ever goes back to `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Approved => "approved",
            SessionStatus::Rejected => "rejected",
        }
    }

    /// Whether a session in `self` may move to `next`.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Pending, SessionStatus::Approved)
                | (SessionStatus::Pending, SessionStatus::Rejected)
                | (SessionStatus::Approved, SessionStatus::Rejected)
        )
    }

    /// Every status a session may leave to reach `target`.
    pub fn sources_of(target: SessionStatus) -> Vec<SessionStatus> {
        [SessionStatus::Pending, SessionStatus::Approved, SessionStatus::Rejected]
            .into_iter()
            .filter(|from| from.can_transition_to(target))
            .collect()
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tutor-proposed teaching offering, subject to admin approval
///
/// `fee` is set on approval; `reason` and `feedback` on rejection.
/// `details` keeps whatever extra scheduling data the client sends
/// (registration window, class dates, duration, ...).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub tutor_email: String,
    pub tutor_name: Option<String>,
    pub details: Json<Value>,
    pub status: SessionStatus,
    pub fee: Option<f64>,
    pub reason: Option<String>,
    pub feedback: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Session {
    /// New sessions always start out `pending`.
    pub fn new(
        title: String,
        description: Option<String>,
        tutor_email: String,
        tutor_name: Option<String>,
        details: Value,
    ) -> Self {
        let now = Utc::now().to_rfc3339();

        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            tutor_email,
            tutor_name,
            details: Json(details),
            status: SessionStatus::Pending,
            fee: None,
            reason: None,
            feedback: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A student's reservation against an approved session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: String,
    pub student_email: String,
    pub session_id: String,
    pub material: Json<Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl Booking {
    pub fn new(student_email: String, session_id: String, material: Value) -> Self {
        let now = Utc::now().to_rfc3339();

        Self {
            id: Uuid::new_v4().to_string(),
            student_email,
            session_id,
            material: Json(material),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Study material a tutor uploads for one of their sessions
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Material {
    pub id: String,
    pub session_id: String,
    pub tutor_email: String,
    pub title: String,
    pub content: Json<Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl Material {
    pub fn new(session_id: String, tutor_email: String, title: String, content: Value) -> Self {
        let now = Utc::now().to_rfc3339();

        Self {
            id: Uuid::new_v4().to_string(),
            session_id,
            tutor_email,
            title,
            content: Json(content),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A student's personal note, optionally tied to a session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentNote {
    pub id: String,
    pub student_email: String,
    pub session_id: Option<String>,
    pub title: String,
    pub content: Json<Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl StudentNote {
    pub fn new(
        student_email: String,
        session_id: Option<String>,
        title: String,
        content: Value,
    ) -> Self {
        let now = Utc::now().to_rfc3339();

        Self {
            id: Uuid::new_v4().to_string(),
            student_email,
            session_id,
            title,
            content: Json(content),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
