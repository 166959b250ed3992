//! Audit log handlers

use axum::{extract::State, Json};
use inventory_service::{
    InventoryLogResponse, InventoryLogService, ListInventoryLogQuery, ListResponse,
    PurgeExpiredLogsQuery, PurgeResponse,
};

use crate::extractors::{CurrentOperator, Pagination, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// List audit entries
///
/// GET /inventory-logs?operatorName=&materialName=&materialId=&operationType=&startDate=&endDate=
pub async fn list_logs(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListInventoryLogQuery>,
    Pagination(page): Pagination,
) -> ApiResult<Json<ListResponse<InventoryLogResponse>>> {
    let service = InventoryLogService::new(state.service_context());
    let response = service.list_logs(query, page).await?;
    Ok(Json(response))
}

/// Purge entries older than the retention window
///
/// DELETE /inventory-logs/expired?retentionDays=
pub async fn purge_expired_logs(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    ValidatedQuery(query): ValidatedQuery<PurgeExpiredLogsQuery>,
) -> ApiResult<Json<PurgeResponse>> {
    let service = InventoryLogService::new(state.service_context());
    let response = service
        .purge_expired(&operator, query.retention_days)
        .await?;
    Ok(Json(response))
}
