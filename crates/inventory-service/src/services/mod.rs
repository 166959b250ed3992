//! Business logic services
//!
//! This module contains the stock ledger engine, the audit trail services and
//! the shared dependency container.

pub mod audit;
pub mod context;
pub mod error;
pub mod inventory;
pub mod inventory_log;
pub mod locks;

pub use audit::{compose_remark, AuditEntryBuilder};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use inventory::InventoryService;
pub use inventory_log::InventoryLogService;
pub use locks::MaterialLocks;
