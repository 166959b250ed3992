//! # inventory-service
//!
//! Application layer containing the stock ledger engine, audit trail services, and DTOs.

pub mod dto;
pub mod services;

pub use dto::*;
pub use services::{
    AuditEntryBuilder, InventoryLogService, InventoryService, MaterialLocks, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
