//! Shared in-memory state and the repositories backed by it

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::instrument;

use inventory_core::{
    DomainError, Inventory, InventoryLog, InventoryLogQuery, InventoryLogRepository,
    InventoryQuery, InventoryRepository, Material, MaterialQuery, MaterialRepository, Page,
    RepoResult, Snowflake,
};

#[derive(Default)]
struct LedgerState {
    /// Keyed by material ID
    inventories: HashMap<Snowflake, Inventory>,
    logs: Vec<InventoryLog>,
}

/// Process-local backing store shared by the memory repositories
#[derive(Clone, Default)]
pub struct MemoryStore {
    ledger: Arc<RwLock<LedgerState>>,
    materials: Arc<DashMap<Snowflake, Material>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material in the catalog
    pub fn insert_material(&self, material: Material) {
        self.materials.insert(material.id, material);
    }

    /// Make every repository call fail with `DatabaseError` until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of audit entries currently stored
    pub fn log_count(&self) -> usize {
        self.ledger.read().logs.len()
    }

    pub fn inventories(&self) -> MemoryInventoryRepository {
        MemoryInventoryRepository {
            store: self.clone(),
        }
    }

    pub fn logs(&self) -> MemoryInventoryLogRepository {
        MemoryInventoryLogRepository {
            store: self.clone(),
        }
    }

    pub fn materials(&self) -> MemoryMaterialRepository {
        MemoryMaterialRepository {
            store: self.clone(),
        }
    }

    fn ensure_available(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

fn page_bounds(offset: i64, limit: i64) -> (usize, usize) {
    (
        usize::try_from(offset).unwrap_or(0),
        usize::try_from(limit).unwrap_or(0),
    )
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ============================================================================
// Inventory
// ============================================================================

/// In-memory implementation of InventoryRepository
#[derive(Clone)]
pub struct MemoryInventoryRepository {
    store: MemoryStore,
}

#[async_trait]
impl InventoryRepository for MemoryInventoryRepository {
    #[instrument(skip(self))]
    async fn find_by_material(&self, material_id: Snowflake) -> RepoResult<Option<Inventory>> {
        self.store.ensure_available()?;
        Ok(self.store.ledger.read().inventories.get(&material_id).cloned())
    }

    #[instrument(skip(self, inventory, log), fields(material_id = %inventory.material_id))]
    async fn create(&self, inventory: &Inventory, log: Option<&InventoryLog>) -> RepoResult<()> {
        self.store.ensure_available()?;
        let mut ledger = self.store.ledger.write();

        if ledger.inventories.contains_key(&inventory.material_id) {
            return Err(DomainError::InventoryAlreadyExists(inventory.material_id));
        }

        ledger
            .inventories
            .insert(inventory.material_id, inventory.clone());
        if let Some(log) = log {
            ledger.logs.push(log.clone());
        }
        Ok(())
    }

    #[instrument(skip(self, inventory, log), fields(material_id = %inventory.material_id))]
    async fn commit(
        &self,
        inventory: &Inventory,
        expected_version: i64,
        log: Option<&InventoryLog>,
    ) -> RepoResult<()> {
        self.store.ensure_available()?;
        let mut ledger = self.store.ledger.write();

        let stored = ledger
            .inventories
            .get_mut(&inventory.material_id)
            .ok_or(DomainError::InventoryNotFound(inventory.material_id))?;

        if stored.version != expected_version {
            return Err(DomainError::VersionConflict(inventory.material_id));
        }

        *stored = inventory.clone();
        if let Some(log) = log {
            ledger.logs.push(log.clone());
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &InventoryQuery) -> RepoResult<Page<Inventory>> {
        self.store.ensure_available()?;
        let ledger = self.store.ledger.read();

        let mut matches: Vec<&Inventory> = ledger
            .inventories
            .values()
            .filter(|inv| {
                query
                    .material_ids
                    .as_ref()
                    .map_or(true, |ids| ids.contains(&inv.material_id))
            })
            .filter(|inv| query.status.map_or(true, |status| inv.status == status))
            .collect();
        matches.sort_by_key(|inv| Reverse((inv.created_at, inv.id)));

        let (offset, limit) = page_bounds(query.offset, query.limit);
        Ok(Page {
            total: matches.len() as i64,
            items: matches
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        })
    }
}

// ============================================================================
// Inventory Log
// ============================================================================

/// In-memory implementation of InventoryLogRepository
#[derive(Clone)]
pub struct MemoryInventoryLogRepository {
    store: MemoryStore,
}

impl MemoryInventoryLogRepository {
    fn matches(log: &InventoryLog, query: &InventoryLogQuery) -> bool {
        query
            .operator_name
            .as_deref()
            .map_or(true, |name| contains_ignore_case(&log.operator_name, name))
            && query
                .material_name
                .as_deref()
                .map_or(true, |name| contains_ignore_case(&log.material_name, name))
            && query.material_id.map_or(true, |id| log.material_id == id)
            && query.operation_type.map_or(true, |op| log.operation_type == op)
            && query.start.map_or(true, |start| log.created_at >= start)
            && query.end.map_or(true, |end| log.created_at < end)
    }
}

#[async_trait]
impl InventoryLogRepository for MemoryInventoryLogRepository {
    #[instrument(skip(self))]
    async fn list(&self, query: &InventoryLogQuery) -> RepoResult<Page<InventoryLog>> {
        self.store.ensure_available()?;
        let ledger = self.store.ledger.read();

        let mut matches: Vec<&InventoryLog> = ledger
            .logs
            .iter()
            .filter(|log| Self::matches(log, query))
            .collect();
        matches.sort_by_key(|log| Reverse((log.created_at, log.id)));

        let (offset, limit) = page_bounds(query.offset, query.limit);
        Ok(Page {
            total: matches.len() as i64,
            items: matches
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        })
    }

    #[instrument(skip(self))]
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        self.store.ensure_available()?;
        let mut ledger = self.store.ledger.write();

        let before = ledger.logs.len();
        ledger.logs.retain(|log| !log.is_older_than(cutoff));
        Ok((before - ledger.logs.len()) as u64)
    }
}

// ============================================================================
// Material
// ============================================================================

/// In-memory implementation of MaterialRepository
#[derive(Clone)]
pub struct MemoryMaterialRepository {
    store: MemoryStore,
}

#[async_trait]
impl MaterialRepository for MemoryMaterialRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Material>> {
        self.store.ensure_available()?;
        Ok(self.store.materials.get(&id).map(|m| m.value().clone()))
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Material>> {
        self.store.ensure_available()?;
        Ok(ids
            .iter()
            .filter_map(|id| self.store.materials.get(id).map(|m| m.value().clone()))
            .collect())
    }

    async fn search(&self, query: &MaterialQuery) -> RepoResult<Vec<Material>> {
        self.store.ensure_available()?;
        let mut found: Vec<Material> = self
            .store
            .materials
            .iter()
            .filter(|m| {
                query
                    .keyword
                    .as_deref()
                    .map_or(true, |keyword| m.name_contains(keyword))
            })
            .filter(|m| query.category_id.map_or(true, |id| m.category_id == Some(id)))
            .map(|m| m.value().clone())
            .collect();
        found.sort_by_key(|m| m.id);
        Ok(found)
    }
}
