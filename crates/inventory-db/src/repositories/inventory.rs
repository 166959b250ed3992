//! PostgreSQL implementation of InventoryRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use inventory_core::{
    DomainError, Inventory, InventoryLog, InventoryQuery, InventoryRepository, Page, RepoResult,
    Snowflake,
};

use crate::models::InventoryModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of InventoryRepository
#[derive(Clone)]
pub struct PgInventoryRepository {
    pool: PgPool,
}

impl PgInventoryRepository {
    /// Create a new PgInventoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert one audit entry on the caller's connection
async fn insert_log(conn: &mut PgConnection, log: &InventoryLog) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO inventory_logs (
            id, operator_id, operator_name, material_id, material_name, operation_type,
            before_value, after_value, remark, operation_date, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(log.id.into_inner())
    .bind(log.operator_id.into_inner())
    .bind(&log.operator_name)
    .bind(log.material_id.into_inner())
    .bind(&log.material_name)
    .bind(log.operation_type.as_str())
    .bind(&log.before_value)
    .bind(&log.after_value)
    .bind(&log.remark)
    .bind(log.operation_date)
    .bind(log.created_at)
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    #[instrument(skip(self))]
    async fn find_by_material(&self, material_id: Snowflake) -> RepoResult<Option<Inventory>> {
        let result = sqlx::query_as::<_, InventoryModel>(
            r#"
            SELECT id, material_id, price, stock, status, version, created_at, updated_at
            FROM inventories
            WHERE material_id = $1
            "#,
        )
        .bind(material_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Inventory::try_from).transpose()
    }

    #[instrument(skip(self, inventory, log), fields(material_id = %inventory.material_id))]
    async fn create(&self, inventory: &Inventory, log: Option<&InventoryLog>) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO inventories (id, material_id, price, stock, status, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(inventory.id.into_inner())
        .bind(inventory.material_id.into_inner())
        .bind(inventory.price)
        .bind(inventory.stock)
        .bind(inventory.status.as_str())
        .bind(inventory.version)
        .bind(inventory.created_at)
        .bind(inventory.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::InventoryAlreadyExists(inventory.material_id))
        })?;

        if let Some(log) = log {
            insert_log(&mut *tx, log).await?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, inventory, log), fields(material_id = %inventory.material_id))]
    async fn commit(
        &self,
        inventory: &Inventory,
        expected_version: i64,
        log: Option<&InventoryLog>,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE inventories
            SET price = $2, stock = $3, status = $4, version = $5, updated_at = $6
            WHERE material_id = $1 AND version = $7
            "#,
        )
        .bind(inventory.material_id.into_inner())
        .bind(inventory.price)
        .bind(inventory.stock)
        .bind(inventory.status.as_str())
        .bind(inventory.version)
        .bind(inventory.updated_at)
        .bind(expected_version)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            // Dropping `tx` rolls back; tell a missing row from a stale version
            let exists = sqlx::query_scalar::<_, i64>(
                "SELECT version FROM inventories WHERE material_id = $1",
            )
            .bind(inventory.material_id.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;

            return Err(match exists {
                Some(_) => DomainError::VersionConflict(inventory.material_id),
                None => DomainError::InventoryNotFound(inventory.material_id),
            });
        }

        if let Some(log) = log {
            insert_log(&mut *tx, log).await?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &InventoryQuery) -> RepoResult<Page<Inventory>> {
        let material_ids: Option<Vec<i64>> = query
            .material_ids
            .as_ref()
            .map(|ids| ids.iter().map(|id| id.into_inner()).collect());
        let status = query.status.map(|s| s.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM inventories
            WHERE ($1::BIGINT[] IS NULL OR material_id = ANY($1))
              AND ($2::TEXT IS NULL OR status = $2)
            "#,
        )
        .bind(&material_ids)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let rows = sqlx::query_as::<_, InventoryModel>(
            r#"
            SELECT id, material_id, price, stock, status, version, created_at, updated_at
            FROM inventories
            WHERE ($1::BIGINT[] IS NULL OR material_id = ANY($1))
              AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&material_ids)
        .bind(status)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let items = rows
            .into_iter()
            .map(Inventory::try_from)
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(Page { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgInventoryRepository>();
    }
}
