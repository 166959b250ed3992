//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Inventory not found for material: {0}")]
    InventoryNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Inventory already exists for material: {0}")]
    InventoryAlreadyExists(Snowflake),

    #[error("Concurrent update on material {0}, please retry")]
    VersionConflict(Snowflake),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Insufficient stock for material {material_id}: available {available}, requested {requested}")]
    InsufficientStock {
        material_id: Snowflake,
        available: i64,
        requested: i64,
    },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InventoryNotFound(_) => "UNKNOWN_INVENTORY",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InventoryAlreadyExists(_) => "INVENTORY_ALREADY_EXISTS",
            Self::VersionConflict(_) => "CONCURRENCY_CONFLICT",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::DatabaseError(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InventoryNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if this is a conflict error (HTTP 409)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::InventoryAlreadyExists(_)
                | Self::VersionConflict(_)
                | Self::InsufficientStock { .. }
        )
    }

    /// Check if the store could not be reached
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }

    /// Optimistic-lock failures are the only errors worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict(_))
    }
}
