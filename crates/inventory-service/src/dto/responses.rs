//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility and
//! prices as two-decimal strings.

use chrono::{DateTime, Utc};
use inventory_core::{InventoryStatus, OperationType};
use rust_decimal::Decimal;
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// One page of results plus the total match count
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub list: Vec<T>,
    pub total: i64,
}

impl<T> ListResponse<T> {
    pub fn new(list: Vec<T>, total: i64) -> Self {
        Self { list, total }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }
}

// ============================================================================
// Inventory Responses
// ============================================================================

/// Inventory record summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResponse {
    pub inventory_id: String,
    pub material_id: String,
    pub material_name: Option<String>,
    pub category_name: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub status: InventoryStatus,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of one batch entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    /// Position in the submitted list
    pub index: usize,
    pub material_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<InventoryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchItemError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItemError {
    pub code: String,
    pub message: String,
}

impl BatchItemResult {
    pub fn succeeded(index: usize, data: InventoryResponse) -> Self {
        Self {
            index,
            material_id: data.material_id.clone(),
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(
        index: usize,
        material_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            index,
            material_id: material_id.into(),
            success: false,
            data: None,
            error: Some(BatchItemError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// Per-entry results of a batch operation
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
}

impl BatchResponse {
    pub fn from_results(results: Vec<BatchItemResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

// ============================================================================
// Audit Log Responses
// ============================================================================

/// Audit log entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLogResponse {
    pub log_id: String,
    pub operator_id: String,
    pub operator_name: String,
    pub material_id: String,
    pub material_name: String,
    pub operation_type: OperationType,
    pub before_value: String,
    pub after_value: String,
    pub remark: Option<String>,
    pub operation_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Result of a retention purge
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResponse {
    pub deleted: u64,
    /// Entries created before this instant were removed
    pub cutoff: DateTime<Utc>,
    pub retention_days: i64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InventoryResponse {
        InventoryResponse {
            inventory_id: "1".to_string(),
            material_id: "2".to_string(),
            material_name: Some("Bolt".to_string()),
            category_name: None,
            price: Decimal::new(600, 2),
            stock: 20,
            status: InventoryStatus::OnShelf,
            version: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_inventory_response_serialization() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["inventoryId"], "1");
        assert_eq!(json["price"], "6.00");
        assert_eq!(json["status"], "on_shelf");
        assert!(json["categoryName"].is_null());
    }

    #[test]
    fn test_batch_response_counts() {
        let response = BatchResponse::from_results(vec![
            BatchItemResult::succeeded(0, sample()),
            BatchItemResult::failed(1, "9", "INSUFFICIENT_STOCK", "not enough"),
        ]);
        assert_eq!((response.total, response.succeeded, response.failed), (2, 1, 1));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["results"][1]["materialId"], "9");
        assert_eq!(json["results"][1]["error"]["code"], "INSUFFICIENT_STOCK");
        assert!(json["results"][1].get("data").is_none());
    }

    #[test]
    fn test_list_response_shape() {
        let json = serde_json::to_value(ListResponse::new(vec![1, 2], 7)).unwrap();
        assert_eq!(json["total"], 7);
        assert_eq!(json["list"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready(true);
        assert!(ready.is_ready());
        assert_eq!(ready.checks.database, "healthy");

        let not_ready = ReadinessResponse::ready(false);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.checks.database, "unhealthy");
    }
}
