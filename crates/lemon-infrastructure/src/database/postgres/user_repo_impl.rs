// ============================================================================
// Lemon Infrastructure - PostgreSQL User Repository
// File: crates/lemon-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use lemon_core::domain::{NewUser, User};
use lemon_core::error::DomainError;
use lemon_core::repositories::UserRepository;

use super::rows::UserRow;
use crate::database::error::db_error;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, is_superuser, date_joined
            FROM auth_user
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding user by id", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, is_superuser, date_joined
            FROM auth_user
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding user by username", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        info!("Creating user: {}", user.username);

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO auth_user (username, email, password_hash, is_superuser)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, is_superuser, date_joined
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_superuser)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating user", e))?;

        Ok(row.into())
    }
}
