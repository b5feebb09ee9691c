//! # Session Lifecycle Store
//!
//! CRUD for tutoring sessions plus the status state machine.
//!
//! ## Status changes
//! A change is a single conditional update: the row is only written while its
//! status is one that [`SessionStatus::can_transition_to`] allows to reach the
//! target. A change that lost a race against another admin surfaces as
//! `InvalidTransition`, never as a lock error.

use crate::db::models::{Session, SessionStatus};
use crate::error::{AppError, AppResult};
use chrono::Utc;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::query::QueryAs;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;

/// A requested status change together with the data it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Approval always comes with the fee students will pay.
    Approve { fee: f64 },
    Reject {
        reason: Option<String>,
        feedback: Option<String>,
    },
}

impl Transition {
    pub fn target(&self) -> SessionStatus {
        match self {
            Transition::Approve { .. } => SessionStatus::Approved,
            Transition::Reject { .. } => SessionStatus::Rejected,
        }
    }
}

/// Descriptive fields an admin may edit without touching the status.
/// `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default)]
pub struct SessionEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tutor_name: Option<String>,
    pub details: Option<Value>,
    pub fee: Option<f64>,
}

pub async fn create(pool: &SqlitePool, session: &Session) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO sessions
         (id, title, description, tutor_email, tutor_name, details, status, fee, reason, feedback, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&session.id)
    .bind(&session.title)
    .bind(&session.description)
    .bind(&session.tutor_email)
    .bind(&session.tutor_name)
    .bind(&session.details)
    .bind(session.status)
    .bind(session.fee)
    .bind(&session.reason)
    .bind(&session.feedback)
    .bind(&session.created_at)
    .bind(&session.updated_at)
    .execute(pool)
    .await?;

    tracing::info!(session_id = %session.id, tutor = %session.tutor_email, "Session proposed");
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Session> {
    sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn list_all(pool: &SqlitePool) -> AppResult<Vec<Session>> {
    let sessions = sqlx::query_as::<_, Session>("SELECT * FROM sessions ORDER BY created_at, rowid")
        .fetch_all(pool)
        .await?;

    Ok(sessions)
}

pub async fn list_by_status(pool: &SqlitePool, status: SessionStatus) -> AppResult<Vec<Session>> {
    let sessions =
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE status = ? ORDER BY created_at, rowid")
            .bind(status)
            .fetch_all(pool)
            .await?;

    Ok(sessions)
}

/// Sessions an admin still acts on: pending and approved.
pub async fn list_manageable(pool: &SqlitePool) -> AppResult<Vec<Session>> {
    let sessions = sqlx::query_as::<_, Session>(
        "SELECT * FROM sessions WHERE status IN (?, ?) ORDER BY created_at, rowid",
    )
    .bind(SessionStatus::Pending)
    .bind(SessionStatus::Approved)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// Apply a status change and return the updated session.
///
/// One conditional `UPDATE` moves the row only while its status is a legal
/// source for the target. When nothing matched, the row is read back to tell
/// a missing session from one whose status rules the change out.
pub async fn transition(pool: &SqlitePool, id: &str, change: Transition) -> AppResult<Session> {
    let target = change.target();
    let sources = SessionStatus::sources_of(target);
    let now = Utc::now().to_rfc3339();

    let updated = match &change {
        Transition::Approve { fee } => {
            let sql = guarded_update("fee = ?", &sources);
            let query = sqlx::query_as::<_, Session>(&sql)
                .bind(target)
                .bind(*fee)
                .bind(&now)
                .bind(id);
            bind_sources(query, &sources).fetch_optional(pool).await?
        }
        Transition::Reject { reason, feedback } => {
            let sql = guarded_update("reason = ?, feedback = ?", &sources);
            let query = sqlx::query_as::<_, Session>(&sql)
                .bind(target)
                .bind(reason)
                .bind(feedback)
                .bind(&now)
                .bind(id);
            bind_sources(query, &sources).fetch_optional(pool).await?
        }
    };

    match updated {
        Some(session) => {
            tracing::info!(session_id = %id, to = %target, "Session status changed");
            Ok(session)
        }
        None => {
            let current = find_by_id(pool, id).await?.status;
            Err(AppError::InvalidTransition(format!(
                "Session '{}' cannot move from {} to {}",
                id, current, target
            )))
        }
    }
}

/// `UPDATE` that sets `status`, the given columns and `updated_at`, guarded
/// by `id` and `status IN (sources)`. Bind order: status, columns,
/// updated_at, id, sources.
fn guarded_update(columns: &str, sources: &[SessionStatus]) -> String {
    format!(
        "UPDATE sessions SET status = ?, {}, updated_at = ?
         WHERE id = ? AND status IN ({})
         RETURNING *",
        columns,
        vec!["?"; sources.len()].join(", ")
    )
}

fn bind_sources<'q>(
    mut query: QueryAs<'q, Sqlite, Session, SqliteArguments<'q>>,
    sources: &[SessionStatus],
) -> QueryAs<'q, Sqlite, Session, SqliteArguments<'q>> {
    for source in sources {
        query = query.bind(*source);
    }
    query
}

/// Edit descriptive fields. The fee only changes on an approved session;
/// asking for it anywhere else is `BadRequest` and nothing is written.
pub async fn update_details(pool: &SqlitePool, id: &str, edit: SessionEdit) -> AppResult<Session> {
    let result = sqlx::query(
        "UPDATE sessions SET
             title = COALESCE(?, title),
             description = COALESCE(?, description),
             tutor_name = COALESCE(?, tutor_name),
             details = COALESCE(?, details),
             fee = COALESCE(?, fee),
             updated_at = ?
         WHERE id = ? AND (? IS NULL OR status = ?)",
    )
    .bind(edit.title)
    .bind(edit.description)
    .bind(edit.tutor_name)
    .bind(edit.details.map(Json))
    .bind(edit.fee)
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .bind(edit.fee)
    .bind(SessionStatus::Approved)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let current = find_by_id(pool, id).await?.status;
        return Err(AppError::BadRequest(format!(
            "The fee of session '{}' can only be edited once it is approved (it is {})",
            id, current
        )));
    }

    find_by_id(pool, id).await
}

/// Hard delete, allowed from any status.
pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    tracing::info!(session_id = %id, "Session deleted");
    Ok(())
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Session '{}' not found", id))
}
