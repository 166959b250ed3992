//! Domain entities - core business objects

mod inventory;
mod inventory_log;
mod material;

pub use inventory::{Inventory, InventoryStatus};
pub use inventory_log::{InventoryLog, OperationType};
pub use material::Material;
