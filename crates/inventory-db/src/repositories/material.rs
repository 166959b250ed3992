//! PostgreSQL implementation of MaterialRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use inventory_core::{Material, MaterialQuery, MaterialRepository, RepoResult, Snowflake};

use crate::models::MaterialModel;

use super::error::{contains_pattern, map_db_error};

/// PostgreSQL implementation of MaterialRepository
#[derive(Clone)]
pub struct PgMaterialRepository {
    pool: PgPool,
}

impl PgMaterialRepository {
    /// Create a new PgMaterialRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaterialRepository for PgMaterialRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Material>> {
        let result = sqlx::query_as::<_, MaterialModel>(
            r#"
            SELECT m.id, m.name, m.category_id, c.name AS category_name
            FROM materials m
            LEFT JOIN categories c ON c.id = m.category_id
            WHERE m.id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Material::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Material>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, MaterialModel>(
            r#"
            SELECT m.id, m.name, m.category_id, c.name AS category_name
            FROM materials m
            LEFT JOIN categories c ON c.id = m.category_id
            WHERE m.id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Material::from).collect())
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &MaterialQuery) -> RepoResult<Vec<Material>> {
        let keyword = query.keyword.as_deref().map(contains_pattern);

        let results = sqlx::query_as::<_, MaterialModel>(
            r#"
            SELECT m.id, m.name, m.category_id, c.name AS category_name
            FROM materials m
            LEFT JOIN categories c ON c.id = m.category_id
            WHERE ($1::TEXT IS NULL OR m.name ILIKE $1 ESCAPE '\')
              AND ($2::BIGINT IS NULL OR m.category_id = $2)
            ORDER BY m.id
            "#,
        )
        .bind(&keyword)
        .bind(query.category_id.map(|id| id.into_inner()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Material::from).collect())
    }
}
