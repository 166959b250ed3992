//! Inventory log database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for inventory_logs table
#[derive(Debug, Clone, FromRow)]
pub struct InventoryLogModel {
    pub id: i64,
    pub operator_id: i64,
    pub operator_name: String,
    pub material_id: i64,
    pub material_name: String,
    pub operation_type: String,
    pub before_value: String,
    pub after_value: String,
    pub remark: Option<String>,
    pub operation_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
