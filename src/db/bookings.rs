//! # Booking Database Operations
//!
//! A booking ties a student to an approved session.

use crate::db::models::{Booking, SessionStatus};
use crate::error::{AppError, AppResult};
use chrono::Utc;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqlitePool;

/// Book `session_id` for `student_email`.
///
/// The insert is conditional on the session being approved at the moment
/// it runs, so a session rejected or deleted concurrently never receives a
/// fresh booking.
///
/// ## Errors
/// - NotFound: the session does not exist
/// - BadRequest: the session is not approved
pub async fn create(
    pool: &SqlitePool,
    student_email: &str,
    session_id: &str,
    material: Value,
) -> AppResult<Booking> {
    let booking = Booking::new(student_email.to_string(), session_id.to_string(), material);

    let result = sqlx::query(
        "INSERT INTO bookings (id, student_email, session_id, material, created_at, updated_at)
         SELECT ?, ?, ?, ?, ?, ?
         WHERE EXISTS (SELECT 1 FROM sessions WHERE id = ? AND status = ?)",
    )
    .bind(&booking.id)
    .bind(&booking.student_email)
    .bind(&booking.session_id)
    .bind(&booking.material)
    .bind(&booking.created_at)
    .bind(&booking.updated_at)
    .bind(session_id)
    .bind(SessionStatus::Approved)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let status = sqlx::query_scalar::<_, SessionStatus>("SELECT status FROM sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session '{}' not found", session_id)))?;

        return Err(AppError::BadRequest(format!(
            "Session '{}' is {} and cannot be booked",
            session_id, status
        )));
    }

    tracing::info!(booking_id = %booking.id, %session_id, student = %student_email, "Session booked");
    Ok(booking)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Booking> {
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn list_by_student(pool: &SqlitePool, student_email: &str) -> AppResult<Vec<Booking>> {
    let bookings = sqlx::query_as::<_, Booking>(
        "SELECT * FROM bookings WHERE student_email = ? ORDER BY created_at, rowid",
    )
    .bind(student_email)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Replace the material payload of an existing booking.
///
/// An unknown id is `NotFound`; nothing is created.
pub async fn update_material(pool: &SqlitePool, id: &str, material: Value) -> AppResult<Booking> {
    let result = sqlx::query("UPDATE bookings SET material = ?, updated_at = ? WHERE id = ?")
        .bind(Json(material))
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    find_by_id(pool, id).await
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Booking '{}' not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sessions::{self, Transition};
    use crate::test_support::{file_pool, seed_session, test_pool};
    use serde_json::json;

    #[tokio::test]
    async fn books_an_approved_session() {
        let pool = test_pool().await;
        let session = seed_session(&pool, "Math", "t@x.com").await;
        sessions::transition(&pool, &session.id, Transition::Approve { fee: 10.0 })
            .await
            .unwrap();

        let booking = create(&pool, "s@x.com", &session.id, json!({ "paid": true }))
            .await
            .unwrap();

        let listed = list_by_student(&pool, "s@x.com").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, booking.id);
        assert_eq!(listed[0].material.0["paid"], true);
    }

    #[tokio::test]
    async fn pending_session_cannot_be_booked() {
        let pool = test_pool().await;
        let session = seed_session(&pool, "Math", "t@x.com").await;

        let err = create(&pool, "s@x.com", &session.id, json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(list_by_student(&pool, "s@x.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_session_cannot_be_booked() {
        let pool = test_pool().await;

        let err = create(&pool, "s@x.com", "nope", json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn updating_an_unknown_booking_does_not_create_it() {
        let pool = test_pool().await;

        let err = update_material(&pool, "nope", json!({ "link": "x" }))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(matches!(
            find_by_id(&pool, "nope").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn booking_racing_a_rejection_is_refused_cleanly() {
        let (_dir, pool) = file_pool().await;

        for _ in 0..50 {
            let session = seed_session(&pool, "Math", "t@x.com").await;
            sessions::transition(&pool, &session.id, Transition::Approve { fee: 10.0 })
                .await
                .unwrap();

            let booking = {
                let (pool, id) = (pool.clone(), session.id.clone());
                tokio::spawn(async move { create(&pool, "s@x.com", &id, json!({})).await })
            };
            let rejection = {
                let (pool, id) = (pool.clone(), session.id.clone());
                tokio::spawn(async move {
                    sessions::transition(
                        &pool,
                        &id,
                        Transition::Reject {
                            reason: None,
                            feedback: None,
                        },
                    )
                    .await
                })
            };

            assert!(rejection.await.unwrap().is_ok());
            match booking.await.unwrap() {
                Ok(_) | Err(AppError::BadRequest(_)) => {}
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
    }
}
