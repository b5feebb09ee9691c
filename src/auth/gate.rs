use crate::auth::token::Identity;
use crate::db::models::{Role, User};
use crate::db::users;
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Check that the caller's stored role is exactly `required`.
///
/// The user record is read on every call, so a role change applies to the
/// very next request. A caller without a user record is `Forbidden`, as is
/// any role other than `required` (an admin does not pass a tutor gate).
pub async fn authorize(pool: &SqlitePool, identity: &Identity, required: Role) -> AppResult<User> {
    let user = users::find_optional_by_email(pool, &identity.email)
        .await?
        .ok_or_else(|| AppError::Forbidden(format!("No account for '{}'", identity.email)))?;

    if user.role != required {
        return Err(AppError::Forbidden(format!(
            "{} role required, caller is {}",
            required, user.role
        )));
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Admin, Role::Admin, true)]
    #[case(Role::Tutor, Role::Tutor, true)]
    #[case(Role::Student, Role::Student, true)]
    #[case(Role::Admin, Role::Tutor, false)]
    #[case(Role::Admin, Role::Student, false)]
    #[case(Role::Tutor, Role::Admin, false)]
    #[case(Role::Tutor, Role::Student, false)]
    #[case(Role::Student, Role::Admin, false)]
    #[case(Role::Student, Role::Tutor, false)]
    #[tokio::test]
    async fn permits_only_matching_role(
        #[case] stored: Role,
        #[case] required: Role,
        #[case] allowed: bool,
    ) {
        let pool = test_pool().await;
        users::insert_if_absent(&pool, "a@x.com", None, None, stored)
            .await
            .unwrap();
        let identity = Identity {
            email: "a@x.com".into(),
        };

        let outcome = authorize(&pool, &identity, required).await;

        if allowed {
            assert_eq!(outcome.unwrap().role, stored);
        } else {
            assert!(matches!(outcome.unwrap_err(), AppError::Forbidden(_)));
        }
    }

    #[tokio::test]
    async fn unknown_user_is_forbidden() {
        let pool = test_pool().await;
        let identity = Identity {
            email: "ghost@x.com".into(),
        };

        let err = authorize(&pool, &identity, Role::Student).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn role_change_applies_immediately() {
        let pool = test_pool().await;
        users::insert_if_absent(&pool, "a@x.com", None, None, Role::Student)
            .await
            .unwrap();
        let identity = Identity {
            email: "a@x.com".into(),
        };
        assert!(authorize(&pool, &identity, Role::Tutor).await.is_err());

        users::update_role(&pool, "a@x.com", Role::Tutor).await.unwrap();

        assert!(authorize(&pool, &identity, Role::Tutor).await.is_ok());
    }
}
