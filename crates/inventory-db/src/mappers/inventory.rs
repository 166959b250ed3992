//! Inventory entity <-> model mapper

use inventory_core::{DomainError, Inventory, Snowflake};

use crate::models::InventoryModel;

impl TryFrom<InventoryModel> for Inventory {
    type Error = DomainError;

    fn try_from(model: InventoryModel) -> Result<Self, Self::Error> {
        Ok(Inventory {
            id: Snowflake::new(model.id),
            material_id: Snowflake::new(model.material_id),
            price: model.price,
            stock: model.stock,
            status: model
                .status
                .parse()
                .map_err(|e: DomainError| DomainError::DatabaseError(e.to_string()))?,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use inventory_core::InventoryStatus;
    use rust_decimal::Decimal;

    fn model(status: &str) -> InventoryModel {
        InventoryModel {
            id: 1,
            material_id: 2,
            price: Decimal::new(650, 2),
            stock: 3,
            status: status.to_string(),
            version: 4,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_entity() {
        let inventory = Inventory::try_from(model("on_shelf")).unwrap();
        assert_eq!(inventory.material_id, Snowflake::new(2));
        assert_eq!(inventory.status, InventoryStatus::OnShelf);
        assert_eq!(inventory.price.to_string(), "6.50");
        assert_eq!(inventory.version, 4);
    }

    #[test]
    fn test_unknown_status_is_database_error() {
        let err = Inventory::try_from(model("lost")).unwrap_err();
        assert!(err.is_unavailable());
    }
}
