//! Executes an integrity delete plan inside one transaction

use sqlx::PgPool;
use tracing::warn;

use lemon_core::error::DomainError;
use lemon_core::integrity::{plan_delete, Table};

use super::error::db_error;

/// Delete row `id` of `root` with its dependents. Returns `false` when the
/// row does not exist.
pub(crate) async fn delete_with_policy(pool: &PgPool, root: Table, id: i32) -> Result<bool, DomainError> {
    let plan = plan_delete(root);
    let context = format!("deleting {} {}", root.name(), id);
    let mut tx = pool.begin().await.map_err(|e| db_error(&context, e))?;

    for check in &plan.checks {
        let referenced: bool = sqlx::query_scalar(&check.sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| db_error(&context, e))?;
        if referenced {
            warn!(
                "Refusing to delete {} {}: referenced by {}",
                root.name(),
                id,
                check.referenced_by.name()
            );
            return Err(DomainError::Protected {
                table: root.name(),
                referenced_by: check.referenced_by.name(),
            });
        }
    }

    for sql in &plan.updates {
        sqlx::query(sql)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error(&context, e))?;
    }

    let mut removed = 0;
    for sql in &plan.deletes {
        removed = sqlx::query(sql)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error(&context, e))?
            .rows_affected();
    }

    tx.commit().await.map_err(|e| db_error(&context, e))?;
    Ok(removed > 0)
}
