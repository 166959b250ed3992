//! # inventory-db
//!
//! Persistence layer implementing the `inventory-core` repository traits.
//!
//! ## Overview
//!
//! - PostgreSQL repositories via SQLx (pool, models, mappers, migrations)
//! - An in-memory store implementing the same traits, used by tests and by
//!   the server when no `DATABASE_URL` is configured
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventory_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use inventory_db::PgInventoryRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let inventory_repo = PgInventoryRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{
    MemoryInventoryLogRepository, MemoryInventoryRepository, MemoryMaterialRepository,
    MemoryStore,
};
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgInventoryLogRepository, PgInventoryRepository, PgMaterialRepository};
