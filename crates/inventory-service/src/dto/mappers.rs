//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use inventory_core::entities::{Inventory, InventoryLog, Material};

use super::responses::{InventoryLogResponse, InventoryResponse};

// ============================================================================
// Inventory Mappers
// ============================================================================

/// Inventory record joined with its catalog entry
pub struct InventoryWithMaterial<'a> {
    pub inventory: &'a Inventory,
    pub material: Option<&'a Material>,
}

impl<'a> InventoryWithMaterial<'a> {
    pub fn new(inventory: &'a Inventory, material: Option<&'a Material>) -> Self {
        Self {
            inventory,
            material,
        }
    }
}

impl From<InventoryWithMaterial<'_>> for InventoryResponse {
    fn from(details: InventoryWithMaterial<'_>) -> Self {
        let inventory = details.inventory;
        Self {
            inventory_id: inventory.id.to_string(),
            material_id: inventory.material_id.to_string(),
            material_name: details.material.map(|m| m.name.clone()),
            category_name: details.material.and_then(|m| m.category_name.clone()),
            price: inventory.price,
            stock: inventory.stock,
            status: inventory.status,
            version: inventory.version,
            created_at: inventory.created_at,
            updated_at: inventory.updated_at,
        }
    }
}

impl From<&Inventory> for InventoryResponse {
    fn from(inventory: &Inventory) -> Self {
        Self::from(InventoryWithMaterial::new(inventory, None))
    }
}

// ============================================================================
// Audit Log Mappers
// ============================================================================

impl From<&InventoryLog> for InventoryLogResponse {
    fn from(log: &InventoryLog) -> Self {
        Self {
            log_id: log.id.to_string(),
            operator_id: log.operator_id.to_string(),
            operator_name: log.operator_name.clone(),
            material_id: log.material_id.to_string(),
            material_name: log.material_name.clone(),
            operation_type: log.operation_type,
            before_value: log.before_value.clone(),
            after_value: log.after_value.clone(),
            remark: log.remark.clone(),
            operation_date: log.operation_date,
            created_at: log.created_at,
        }
    }
}

impl From<InventoryLog> for InventoryLogResponse {
    fn from(log: InventoryLog) -> Self {
        Self::from(&log)
    }
}
