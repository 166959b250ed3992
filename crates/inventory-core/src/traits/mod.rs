//! Repository traits (ports)

mod repositories;

pub use repositories::{
    InventoryLogQuery, InventoryLogRepository, InventoryQuery, InventoryRepository,
    MaterialQuery, MaterialRepository, Page, RepoResult,
};
