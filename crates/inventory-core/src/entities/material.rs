//! Material entity - read-only projection of the material catalog

use crate::value_objects::Snowflake;

/// Material as seen by the inventory ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub id: Snowflake,
    pub name: String,
    pub category_id: Option<Snowflake>,
    pub category_name: Option<String>,
}

impl Material {
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category_id: None,
            category_name: None,
        }
    }

    /// Attach the category the material belongs to
    pub fn with_category(mut self, category_id: Snowflake, category_name: impl Into<String>) -> Self {
        self.category_id = Some(category_id);
        self.category_name = Some(category_name.into());
        self
    }

    /// Case-insensitive substring match on the name
    pub fn name_contains(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(&keyword.to_lowercase())
    }
}
