use crate::db::{models::Material, sessions};
use crate::error::{AppError, AppResult};
use chrono::Utc;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqlitePool;

/// Attach a new material to an existing session.
pub async fn create(
    pool: &SqlitePool,
    session_id: &str,
    tutor_email: &str,
    title: &str,
    content: Value,
) -> AppResult<Material> {
    // Fails with NotFound when the session is unknown
    sessions::find_by_id(pool, session_id).await?;

    let material = Material::new(
        session_id.to_string(),
        tutor_email.to_string(),
        title.to_string(),
        content,
    );

    sqlx::query(
        "INSERT INTO materials (id, session_id, tutor_email, title, content, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&material.id)
    .bind(&material.session_id)
    .bind(&material.tutor_email)
    .bind(&material.title)
    .bind(&material.content)
    .bind(&material.created_at)
    .bind(&material.updated_at)
    .execute(pool)
    .await?;

    Ok(material)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Material> {
    sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn list_all(pool: &SqlitePool) -> AppResult<Vec<Material>> {
    let materials = sqlx::query_as::<_, Material>("SELECT * FROM materials ORDER BY created_at, rowid")
        .fetch_all(pool)
        .await?;

    Ok(materials)
}

pub async fn list_by_session(pool: &SqlitePool, session_id: &str) -> AppResult<Vec<Material>> {
    let materials = sqlx::query_as::<_, Material>(
        "SELECT * FROM materials WHERE session_id = ? ORDER BY created_at, rowid",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(materials)
}

/// Strict update: `None` fields are kept, an unknown id is NotFound.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    title: Option<String>,
    content: Option<Value>,
) -> AppResult<Material> {
    let result = sqlx::query(
        "UPDATE materials SET
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
    let result = sqlx::query("DELETE FROM materials WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    Ok(())
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Material '{}' not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_session, test_pool};
    use serde_json::json;

    #[tokio::test]
    async fn material_needs_an_existing_session() {
        let pool = test_pool().await;

        let err = create(&pool, "nope", "t@x.com", "Slides", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_update_delete() {
        let pool = test_pool().await;
        let session = seed_session(&pool, "Math", "t@x.com").await;

        let material = create(&pool, &session.id, "t@x.com", "Slides", json!({ "link": "a" }))
            .await
            .unwrap();
        assert_eq!(list_by_session(&pool, &session.id).await.unwrap().len(), 1);

        let updated = update(&pool, &material.id, None, Some(json!({ "link": "b" })))
            .await
            .unwrap();
        assert_eq!(updated.title, "Slides");
        assert_eq!(updated.content.0["link"], "b");

        delete(&pool, &material.id).await.unwrap();
        assert!(list_all(&pool).await.unwrap().is_empty());
        assert!(matches!(
            delete(&pool, &material.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn updating_unknown_material_is_not_found() {
        let pool = test_pool().await;

        let err = update(&pool, "nope", Some("x".into()), None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(list_all(&pool).await.unwrap().is_empty());
    }
}
