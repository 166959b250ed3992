//! In-memory repositories
//!
//! Implements the same ports as the PostgreSQL repositories. Inventory records
//! and audit entries share one `RwLock` so a commit and its log entry become
//! visible together, mirroring the single transaction used by PostgreSQL.

mod store;

pub use store::{
    MemoryInventoryLogRepository, MemoryInventoryRepository, MemoryMaterialRepository,
    MemoryStore,
};
