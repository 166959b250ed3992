//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: text enum columns are parsed back into domain enums
//! - `From<Model> for Entity` where every column maps directly

mod inventory;
mod inventory_log;
mod material;
