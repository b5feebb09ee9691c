use crate::db::models::{Role, User};
use crate::error::{AppError, AppResult};
use chrono::Utc;
use sqlx::SqlitePool;

/// Emails are compared case-insensitively; store them lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Insert the user unless one with the same email exists, then return the stored row.
///
/// An existing user is returned untouched (a returning user "logging in again").
pub async fn insert_if_absent(
    pool: &SqlitePool,
    email: &str,
    name: Option<String>,
    photo_url: Option<String>,
    role: Role,
) -> AppResult<User> {
    let user = User::new(normalize_email(email), name, photo_url, role);

    sqlx::query(
        "INSERT INTO users (id, email, name, photo_url, role, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(email) DO NOTHING",
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.photo_url)
    .bind(user.role)
    .bind(&user.created_at)
    .bind(&user.updated_at)
    .execute(pool)
    .await?;

    find_by_email(pool, &user.email).await
}

pub async fn find_optional_by_email(pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> AppResult<User> {
    find_optional_by_email(pool, email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", email)))
}

pub async fn list_all(pool: &SqlitePool) -> AppResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at, rowid")
        .fetch_all(pool)
        .await?;

    Ok(users)
}

pub async fn update_role(pool: &SqlitePool, email: &str, role: Role) -> AppResult<User> {
    let email = normalize_email(email);

    let result = sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE email = ?")
        .bind(role)
        .bind(Utc::now().to_rfc3339())
        .bind(&email)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User '{}' not found", email)));
    }

    tracing::info!(%email, %role, "User role updated");
    find_by_email(pool, &email).await
}

/// Make sure `email` exists and holds the admin role.
pub async fn ensure_admin(pool: &SqlitePool, email: &str) -> AppResult<User> {
    let user = insert_if_absent(pool, email, None, None, Role::Admin).await?;
    if user.role == Role::Admin {
        return Ok(user);
    }

    update_role(pool, &user.email, Role::Admin).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;

    #[tokio::test]
    async fn insert_if_absent_keeps_the_first_record() {
        let pool = test_pool().await;

        let first = insert_if_absent(&pool, "A@X.com", Some("Ann".into()), None, Role::Student)
            .await
            .unwrap();
        let second = insert_if_absent(&pool, "a@x.com", Some("Other".into()), None, Role::Tutor)
            .await
            .unwrap();

        assert_eq!(first.email, "a@x.com");
        assert_eq!(second.id, first.id);
        assert_eq!(second.name.as_deref(), Some("Ann"));
        assert_eq!(second.role, Role::Student);
    }

    #[tokio::test]
    async fn update_role_on_unknown_email_is_not_found() {
        let pool = test_pool().await;

        let err = update_role(&pool, "ghost@x.com", Role::Tutor).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn ensure_admin_promotes_existing_user() {
        let pool = test_pool().await;
        insert_if_absent(&pool, "boss@x.com", None, None, Role::Student)
            .await
            .unwrap();

        let admin = ensure_admin(&pool, "boss@x.com").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(list_all(&pool).await.unwrap().len(), 1);
    }
}
