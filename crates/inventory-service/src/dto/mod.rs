//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AdjustInventoryRequest, BatchAdjustItem, BatchAdjustRequest, BatchInboundItem,
    BatchInboundRequest, BatchOutboundItem, BatchOutboundRequest, CreateInventoryRequest,
    InboundRequest, ListInventoryLogQuery, ListInventoryQuery, OutboundRequest, PageParams,
    PurgeExpiredLogsQuery, UpdatePriceRequest, UpdateStatusRequest, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};

pub use responses::{
    BatchItemError, BatchItemResult, BatchResponse, HealthChecks, HealthResponse,
    InventoryLogResponse, InventoryResponse, ListResponse, PurgeResponse, ReadinessResponse,
};

pub use mappers::InventoryWithMaterial;
