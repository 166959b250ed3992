//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in inventory-core.

mod error;
mod inventory;
mod inventory_log;
mod material;

pub use inventory::PgInventoryRepository;
pub use inventory_log::PgInventoryLogRepository;
pub use material::PgMaterialRepository;
