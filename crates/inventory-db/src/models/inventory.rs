//! Inventory database model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database model for inventories table
#[derive(Debug, Clone, FromRow)]
pub struct InventoryModel {
    pub id: i64,
    pub material_id: i64,
    pub price: Decimal,
    pub stock: i64,
    pub status: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
