//! Service context - dependency container for services
//!
//! Holds the repositories, the id generator, the per-material lock table and
//! the ledger settings needed by services.

use std::sync::Arc;

use inventory_common::LedgerConfig;
use inventory_core::traits::{InventoryLogRepository, InventoryRepository, MaterialRepository};
use inventory_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};
use super::locks::MaterialLocks;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Inventory, audit log and material repositories
/// - Snowflake generator for record and log ids
/// - Per-material locks serializing stock mutations
/// - Ledger settings (retries, batch limit, pricing policy, retention)
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    inventory_repo: Arc<dyn InventoryRepository>,
    log_repo: Arc<dyn InventoryLogRepository>,
    material_repo: Arc<dyn MaterialRepository>,

    // Engine state
    snowflake_generator: Arc<SnowflakeGenerator>,
    material_locks: Arc<MaterialLocks>,
    ledger: LedgerConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        inventory_repo: Arc<dyn InventoryRepository>,
        log_repo: Arc<dyn InventoryLogRepository>,
        material_repo: Arc<dyn MaterialRepository>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        ledger: LedgerConfig,
    ) -> Self {
        Self {
            inventory_repo,
            log_repo,
            material_repo,
            snowflake_generator,
            material_locks: Arc::new(MaterialLocks::new()),
            ledger,
        }
    }

    // === Repositories ===

    /// Get the inventory repository
    pub fn inventory_repo(&self) -> &dyn InventoryRepository {
        self.inventory_repo.as_ref()
    }

    /// Get the audit log repository
    pub fn log_repo(&self) -> &dyn InventoryLogRepository {
        self.log_repo.as_ref()
    }

    /// Get the material catalog repository
    pub fn material_repo(&self) -> &dyn MaterialRepository {
        self.material_repo.as_ref()
    }

    // === Engine ===

    /// Get the per-material lock table
    pub fn material_locks(&self) -> &MaterialLocks {
        self.material_locks.as_ref()
    }

    /// Get the ledger settings
    pub fn ledger(&self) -> &LedgerConfig {
        &self.ledger
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("locked_materials", &self.material_locks.len())
            .field("ledger", &self.ledger)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    inventory_repo: Option<Arc<dyn InventoryRepository>>,
    log_repo: Option<Arc<dyn InventoryLogRepository>>,
    material_repo: Option<Arc<dyn MaterialRepository>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    ledger: Option<LedgerConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inventory_repo(mut self, repo: Arc<dyn InventoryRepository>) -> Self {
        self.inventory_repo = Some(repo);
        self
    }

    pub fn log_repo(mut self, repo: Arc<dyn InventoryLogRepository>) -> Self {
        self.log_repo = Some(repo);
        self
    }

    pub fn material_repo(mut self, repo: Arc<dyn MaterialRepository>) -> Self {
        self.material_repo = Some(repo);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn ledger(mut self, ledger: LedgerConfig) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Build the ServiceContext
    ///
    /// The snowflake generator and ledger settings fall back to defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.inventory_repo
                .ok_or_else(|| ServiceError::validation("inventory_repo is required"))?,
            self.log_repo
                .ok_or_else(|| ServiceError::validation("log_repo is required"))?,
            self.material_repo
                .ok_or_else(|| ServiceError::validation("material_repo is required"))?,
            self.snowflake_generator.unwrap_or_default(),
            self.ledger.unwrap_or_default(),
        ))
    }
}
