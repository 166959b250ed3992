//! Material entity <-> model mapper

use inventory_core::{Material, Snowflake};

use crate::models::MaterialModel;

impl From<MaterialModel> for Material {
    fn from(model: MaterialModel) -> Self {
        Material {
            id: Snowflake::new(model.id),
            name: model.name,
            category_id: model.category_id.map(Snowflake::new),
            category_name: model.category_name,
        }
    }
}
