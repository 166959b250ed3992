//! PostgreSQL implementation of InventoryLogRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use inventory_core::{InventoryLog, InventoryLogQuery, InventoryLogRepository, Page, RepoResult};

use crate::models::InventoryLogModel;

use super::error::{contains_pattern, map_db_error};

/// PostgreSQL implementation of InventoryLogRepository
#[derive(Clone)]
pub struct PgInventoryLogRepository {
    pool: PgPool,
}

impl PgInventoryLogRepository {
    /// Create a new PgInventoryLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const LOG_FILTER: &str = r"
    WHERE ($1::TEXT IS NULL OR operator_name ILIKE $1 ESCAPE '\')
      AND ($2::TEXT IS NULL OR material_name ILIKE $2 ESCAPE '\')
      AND ($3::BIGINT IS NULL OR material_id = $3)
      AND ($4::TEXT IS NULL OR operation_type = $4)
      AND ($5::TIMESTAMPTZ IS NULL OR created_at >= $5)
      AND ($6::TIMESTAMPTZ IS NULL OR created_at < $6)
";

#[async_trait]
impl InventoryLogRepository for PgInventoryLogRepository {
    #[instrument(skip(self))]
    async fn list(&self, query: &InventoryLogQuery) -> RepoResult<Page<InventoryLog>> {
        let operator_name = query.operator_name.as_deref().map(contains_pattern);
        let material_name = query.material_name.as_deref().map(contains_pattern);
        let material_id = query.material_id.map(|id| id.into_inner());
        let operation_type = query.operation_type.map(|op| op.as_str());

        let count_sql = format!("SELECT COUNT(*) FROM inventory_logs {LOG_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(&operator_name)
            .bind(&material_name)
            .bind(material_id)
            .bind(operation_type)
            .bind(query.start)
            .bind(query.end)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let select_sql = format!(
            r"
            SELECT id, operator_id, operator_name, material_id, material_name, operation_type,
                   before_value, after_value, remark, operation_date, created_at
            FROM inventory_logs
            {LOG_FILTER}
            ORDER BY created_at DESC, id DESC
            LIMIT $7 OFFSET $8
            "
        );
        let rows = sqlx::query_as::<_, InventoryLogModel>(&select_sql)
            .bind(&operator_name)
            .bind(&material_name)
            .bind(material_id)
            .bind(operation_type)
            .bind(query.start)
            .bind(query.end)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let items = rows
            .into_iter()
            .map(InventoryLog::try_from)
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(Page { items, total })
    }

    #[instrument(skip(self))]
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM inventory_logs WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgInventoryLogRepository>();
    }
}
