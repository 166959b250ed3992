//! Database models - SQLx-compatible structs for PostgreSQL tables

mod inventory;
mod inventory_log;
mod material;

pub use inventory::InventoryModel;
pub use inventory_log::InventoryLogModel;
pub use material::MaterialModel;
