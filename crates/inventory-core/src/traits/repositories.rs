//! Repository traits (ports) - define the interface for data access
//!
//! The ledger only ever writes an inventory record together with its audit
//! entry, so the inventory port exposes `create` / `commit` that take both and
//! persist them as one unit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Inventory, InventoryLog, InventoryStatus, Material, OperationType};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// One page of results plus the total number of matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

// ============================================================================
// Inventory Repository
// ============================================================================

/// Filters for listing inventory records, newest first
#[derive(Debug, Clone, Default)]
pub struct InventoryQuery {
    /// Restrict to these materials; `None` means no restriction
    pub material_ids: Option<Vec<Snowflake>>,
    pub status: Option<InventoryStatus>,
    pub offset: i64,
    pub limit: i64,
}

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Find the record of a material
    async fn find_by_material(&self, material_id: Snowflake) -> RepoResult<Option<Inventory>>;

    /// Insert a new record, with its opening audit entry if any.
    ///
    /// Fails with `InventoryAlreadyExists` if the material already has one.
    async fn create(&self, inventory: &Inventory, log: Option<&InventoryLog>) -> RepoResult<()>;

    /// Persist `inventory` only if the stored version still equals
    /// `expected_version`, writing `log` in the same atomic unit.
    ///
    /// Fails with `VersionConflict` when another writer got there first.
    async fn commit(
        &self,
        inventory: &Inventory,
        expected_version: i64,
        log: Option<&InventoryLog>,
    ) -> RepoResult<()>;

    /// List records ordered by `created_at` DESC, then `id` DESC
    async fn list(&self, query: &InventoryQuery) -> RepoResult<Page<Inventory>>;
}

// ============================================================================
// Inventory Log Repository
// ============================================================================

/// Filters for listing audit entries, newest first
#[derive(Debug, Clone, Default)]
pub struct InventoryLogQuery {
    /// Case-insensitive substring of the operator name
    pub operator_name: Option<String>,
    /// Case-insensitive substring of the material name
    pub material_name: Option<String>,
    pub material_id: Option<Snowflake>,
    pub operation_type: Option<OperationType>,
    /// Inclusive lower bound on `created_at`
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub end: Option<DateTime<Utc>>,
    pub offset: i64,
    pub limit: i64,
}

#[async_trait]
pub trait InventoryLogRepository: Send + Sync {
    /// List entries ordered by `created_at` DESC, then `id` DESC
    async fn list(&self, query: &InventoryLogQuery) -> RepoResult<Page<InventoryLog>>;

    /// Delete entries written before `cutoff`, returning how many were removed
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Material Repository
// ============================================================================

/// Filters for resolving materials by name or category
#[derive(Debug, Clone, Default)]
pub struct MaterialQuery {
    /// Case-insensitive substring of the material name
    pub keyword: Option<String>,
    pub category_id: Option<Snowflake>,
}

impl MaterialQuery {
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.category_id.is_none()
    }
}

/// Read-only access to the material catalog
#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Material>>;

    /// Materials among `ids`; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Material>>;

    async fn search(&self, query: &MaterialQuery) -> RepoResult<Vec<Material>>;
}
