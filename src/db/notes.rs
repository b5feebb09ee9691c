use crate::db::models::StudentNote;
use crate::error::{AppError, AppResult};
use chrono::Utc;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqlitePool;

pub async fn create(
    pool: &SqlitePool,
    student_email: &str,
    session_id: Option<String>,
    title: &str,
    content: Value,
) -> AppResult<StudentNote> {
    let note = StudentNote::new(student_email.to_string(), session_id, title.to_string(), content);

    sqlx::query(
        "INSERT INTO student_notes (id, student_email, session_id, title, content, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&note.id)
    .bind(&note.student_email)
    .bind(&note.session_id)
    .bind(&note.title)
    .bind(&note.content)
    .bind(&note.created_at)
    .bind(&note.updated_at)
    .execute(pool)
    .await?;

    Ok(note)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<StudentNote> {
    sqlx::query_as::<_, StudentNote>("SELECT * FROM student_notes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn list_by_student(pool: &SqlitePool, student_email: &str) -> AppResult<Vec<StudentNote>> {
    let notes = sqlx::query_as::<_, StudentNote>(
        "SELECT * FROM student_notes WHERE student_email = ? ORDER BY created_at, rowid",
    )
    .bind(student_email)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

pub async fn list_by_student_and_session(
    pool: &SqlitePool,
    student_email: &str,
    session_id: &str,
) -> AppResult<Vec<StudentNote>> {
    let notes = sqlx::query_as::<_, StudentNote>(
        "SELECT * FROM student_notes
         WHERE student_email = ? AND session_id = ?
         ORDER BY created_at, rowid",
    )
    .bind(student_email)
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    title: Option<String>,
    content: Option<Value>,
) -> AppResult<StudentNote> {
    let result = sqlx::query(
        "UPDATE student_notes SET
             title = COALESCE(?, title),
             content = COALESCE(?, content),
             updated_at = ?
         WHERE id = ?",
    )
    .bind(title)
    .bind(content.map(Json))
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    find_by_id(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM student_notes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    Ok(())
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Note '{}' not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;
    use serde_json::json;

    #[tokio::test]
    async fn notes_are_listed_per_student_and_session() {
        let pool = test_pool().await;
        create(&pool, "s@x.com", Some("s1".into()), "Week 1", json!("intro"))
            .await
            .unwrap();
        create(&pool, "s@x.com", None, "Loose", json!("todo"))
            .await
            .unwrap();
        create(&pool, "other@x.com", Some("s1".into()), "Mine", json!(""))
            .await
            .unwrap();

        assert_eq!(list_by_student(&pool, "s@x.com").await.unwrap().len(), 2);

        let for_session = list_by_student_and_session(&pool, "s@x.com", "s1")
            .await
            .unwrap();
        assert_eq!(for_session.len(), 1);
        assert_eq!(for_session[0].title, "Week 1");
    }

    #[tokio::test]
    async fn update_and_delete_require_existing_note() {
        let pool = test_pool().await;
        let note = create(&pool, "s@x.com", None, "Draft", json!({ "body": "a" }))
            .await
            .unwrap();

        let updated = update(&pool, &note.id, Some("Final".into()), None)
            .await
            .unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.content.0["body"], "a");

        delete(&pool, &note.id).await.unwrap();
        assert!(matches!(
            update(&pool, &note.id, None, None).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
