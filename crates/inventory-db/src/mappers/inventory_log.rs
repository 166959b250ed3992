//! Inventory log entity <-> model mapper

use inventory_core::{DomainError, InventoryLog, Snowflake};

use crate::models::InventoryLogModel;

impl TryFrom<InventoryLogModel> for InventoryLog {
    type Error = DomainError;

    fn try_from(model: InventoryLogModel) -> Result<Self, Self::Error> {
        Ok(InventoryLog {
            id: Snowflake::new(model.id),
            operator_id: Snowflake::new(model.operator_id),
            operator_name: model.operator_name,
            material_id: Snowflake::new(model.material_id),
            material_name: model.material_name,
            operation_type: model
                .operation_type
                .parse()
                .map_err(|e: DomainError| DomainError::DatabaseError(e.to_string()))?,
            before_value: model.before_value,
            after_value: model.after_value,
            remark: model.remark,
            operation_date: model.operation_date,
            created_at: model.created_at,
        })
    }
}
