//! # inventory-core
//!
//! Domain layer containing entities, value objects, stock ledger rules, and repository traits.
//! Storage and transport live in other crates; this one only defines the ports
//! (`async_trait` repository traits) they implement.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Inventory, InventoryLog, InventoryStatus, Material, OperationType};
pub use error::DomainError;
pub use traits::{
    InventoryLogQuery, InventoryLogRepository, InventoryQuery, InventoryRepository,
    MaterialQuery, MaterialRepository, Page, RepoResult,
};
pub use value_objects::{
    normalize_price, AdjustType, InboundReason, Operator, OutboundReason, PricingPolicy,
    Snowflake, SnowflakeGenerator, SnowflakeParseError, SnapshotField, StockSnapshot,
    PRICE_SCALE,
};
