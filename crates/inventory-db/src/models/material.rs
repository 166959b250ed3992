//! Material database model

use sqlx::FromRow;

/// Row of `materials` joined with its category name
#[derive(Debug, Clone, FromRow)]
pub struct MaterialModel {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
}
