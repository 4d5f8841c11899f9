//! Group membership backed by `auth_group` / `auth_user_groups`

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;

use lemon_core::access::Role;
use lemon_core::domain::UserRef;
use lemon_core::error::DomainError;
use lemon_core::repositories::RoleDirectory;

use super::rows::UserRefRow;
use crate::database::error::db_error;

pub struct PgRoleDirectory {
    pool: PgPool,
}

impl PgRoleDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleDirectory for PgRoleDirectory {
    async fn roles_of(&self, user_id: i32) -> Result<BTreeSet<Role>, DomainError> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT g.name
            FROM auth_group g
            JOIN auth_user_groups ug ON ug.group_id = g.id
            WHERE ug.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("loading roles", e))?;

        Ok(names
            .iter()
            .filter_map(|name| Role::from_group_name(name))
            .collect())
    }

    async fn has_role(&self, user_id: i32, role: Role) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM auth_user_groups ug
                JOIN auth_group g ON g.id = ug.group_id
                WHERE ug.user_id = $1 AND g.name = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(role.group_name())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("checking role", e))
    }

    async fn members(&self, role: Role) -> Result<Vec<UserRef>, DomainError> {
        let rows: Vec<UserRefRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.username
            FROM auth_user u
            JOIN auth_user_groups ug ON ug.user_id = u.id
            JOIN auth_group g ON g.id = ug.group_id
            WHERE g.name = $1
            ORDER BY u.id
            "#,
        )
        .bind(role.group_name())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing group members", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn grant(&self, user_id: i32, role: Role) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO auth_user_groups (user_id, group_id)
            SELECT $1, id FROM auth_group WHERE name = $2
            ON CONFLICT (user_id, group_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role.group_name())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("granting role", e))?;
        Ok(())
    }

    async fn revoke(&self, user_id: i32, role: Role) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            DELETE FROM auth_user_groups
            WHERE user_id = $1
              AND group_id = (SELECT id FROM auth_group WHERE name = $2)
            "#,
        )
        .bind(user_id)
        .bind(role.group_name())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("revoking role", e))?;
        Ok(())
    }
}
