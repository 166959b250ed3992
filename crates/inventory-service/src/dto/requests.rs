//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names are camelCase on the wire.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use inventory_core::{AdjustType, InboundReason, InventoryStatus, OperationType, OutboundReason, Snowflake};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: u32 = 100;

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative")
            .with_message(Cow::Borrowed("Price must not be negative")));
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank")
            .with_message(Cow::Borrowed("Reason must not be blank")));
    }
    Ok(())
}

// ============================================================================
// Inventory Requests
// ============================================================================

/// Create the inventory record for a material
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRequest {
    pub material_id: Snowflake,

    #[validate(custom(function = "validate_non_negative"))]
    pub price: Option<Decimal>,

    /// Opening stock
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: Option<i64>,

    pub status: Option<InventoryStatus>,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Manual stock adjustment
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdjustInventoryRequest {
    pub adjust_type: AdjustType,

    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: i64,

    #[validate(
        length(min = 1, max = 50, message = "Reason must be 1-50 characters"),
        custom(function = "validate_not_blank")
    )]
    pub reason: String,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,

    /// Business date of the operation
    pub operation_date: Option<DateTime<Utc>>,
}

/// Goods received
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InboundRequest {
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: i64,

    #[validate(custom(function = "validate_non_negative"))]
    pub unit_price: Option<Decimal>,

    #[validate(length(max = 100, message = "Supplier must be at most 100 characters"))]
    pub supplier: Option<String>,

    pub reason: InboundReason,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,

    pub operation_date: Option<DateTime<Utc>>,
}

/// Goods issued
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OutboundRequest {
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: i64,

    #[validate(length(max = 100, message = "Customer must be at most 100 characters"))]
    pub customer: Option<String>,

    pub reason: OutboundReason,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,

    pub operation_date: Option<DateTime<Utc>>,
}

/// Set the unit price
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriceRequest {
    #[validate(custom(function = "validate_non_negative"))]
    pub price: Decimal,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Shelve or unshelve
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: InventoryStatus,
}

// ============================================================================
// Batch Requests
// ============================================================================

/// One entry of a batch adjustment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAdjustItem {
    pub material_id: Snowflake,
    #[serde(flatten)]
    pub request: AdjustInventoryRequest,
}

/// One entry of a batch inbound
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInboundItem {
    pub material_id: Snowflake,
    #[serde(flatten)]
    pub request: InboundRequest,
}

/// One entry of a batch outbound
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutboundItem {
    pub material_id: Snowflake,
    #[serde(flatten)]
    pub request: OutboundRequest,
}

/// Entries are validated one by one so a bad entry only fails itself
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatchAdjustRequest {
    pub items: Vec<BatchAdjustItem>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatchInboundRequest {
    pub items: Vec<BatchInboundItem>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatchOutboundRequest {
    pub items: Vec<BatchOutboundItem>,
}

// ============================================================================
// Query Requests
// ============================================================================

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Page selection shared by list endpoints
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: u32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be 1-100"))]
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size.min(MAX_PAGE_SIZE))
    }
}

/// Inventory list filters
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListInventoryQuery {
    /// Case-insensitive substring of the material name
    #[validate(length(max = 100, message = "Keyword must be at most 100 characters"))]
    pub keyword: Option<String>,

    pub category_id: Option<Snowflake>,

    pub status: Option<InventoryStatus>,
}

fn validate_date_range(query: &ListInventoryLogQuery) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(ValidationError::new("date_range")
                .with_message(Cow::Borrowed("startDate must not be after endDate")));
        }
    }
    Ok(())
}

/// Audit log filters
///
/// Both dates are inclusive calendar days in UTC.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_range"))]
pub struct ListInventoryLogQuery {
    #[validate(length(max = 100, message = "Operator name must be at most 100 characters"))]
    pub operator_name: Option<String>,

    #[validate(length(max = 100, message = "Material name must be at most 100 characters"))]
    pub material_name: Option<String>,

    pub material_id: Option<Snowflake>,

    pub operation_type: Option<OperationType>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
}

/// Retention override for log purging
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurgeExpiredLogsQuery {
    #[validate(range(min = 1, max = 3650, message = "Retention must be 1-3650 days"))]
    pub retention_days: Option<i64>,
}
