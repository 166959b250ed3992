//! Test fixtures
//!
//! Catalog seed data and typed views of API responses.

use inventory_core::{Material, Operator, Snowflake};
use inventory_db::MemoryStore;
use serde::Deserialize;

pub const BOLT: i64 = 9001;
pub const NUT: i64 = 9002;
pub const WASHER: i64 = 9003;
pub const CABLE: i64 = 9004;

/// Register the test catalog in the store
pub fn seed_catalog(store: &MemoryStore) {
    store.insert_material(
        Material::new(Snowflake::new(BOLT), "Steel Bolt M8").with_category(Snowflake::new(1), "Fasteners"),
    );
    store.insert_material(
        Material::new(Snowflake::new(NUT), "Hex Nut M8").with_category(Snowflake::new(1), "Fasteners"),
    );
    store.insert_material(
        Material::new(Snowflake::new(WASHER), "Flat Washer M8").with_category(Snowflake::new(1), "Fasteners"),
    );
    store.insert_material(
        Material::new(Snowflake::new(CABLE), "铜芯电缆 2.5mm").with_category(Snowflake::new(2), "Electrical"),
    );
}

pub fn default_operator() -> Operator {
    Operator::new(Snowflake::new(501), "张三")
}

/// Inventory record as returned by the API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    pub inventory_id: String,
    pub material_id: String,
    pub material_name: Option<String>,
    pub category_name: Option<String>,
    pub price: String,
    pub stock: i64,
    pub status: String,
    pub version: i64,
}

/// Audit entry as returned by the API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogView {
    pub log_id: String,
    pub operator_id: String,
    pub operator_name: String,
    pub material_id: String,
    pub material_name: String,
    pub operation_type: String,
    pub before_value: String,
    pub after_value: String,
    pub remark: Option<String>,
}

/// List envelope
#[derive(Debug, Deserialize)]
pub struct ListView<T> {
    pub list: Vec<T>,
    pub total: i64,
}

/// One batch entry outcome
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemView {
    pub index: usize,
    pub material_id: String,
    pub success: bool,
    pub data: Option<InventoryView>,
    pub error: Option<BatchErrorView>,
}

#[derive(Debug, Deserialize)]
pub struct BatchErrorView {
    pub code: String,
    pub message: String,
}

/// Batch envelope
#[derive(Debug, Deserialize)]
pub struct BatchView {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BatchItemView>,
}
