//! Inventory handlers
//!
//! Endpoints for inventory records and stock movements. Every mutation
//! requires the operator headers.

use axum::{extract::State, Json};
use inventory_service::{
    AdjustInventoryRequest, BatchAdjustRequest, BatchInboundRequest, BatchOutboundRequest,
    BatchResponse, CreateInventoryRequest, InboundRequest, InventoryResponse, InventoryService,
    ListInventoryQuery, ListResponse, OutboundRequest, UpdatePriceRequest, UpdateStatusRequest,
};

use crate::extractors::{CurrentOperator, MaterialIdPath, Pagination, ValidatedJson, ValidatedQuery};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List inventory records
///
/// GET /inventory?keyword=&categoryId=&status=&page=&pageSize=
pub async fn list_inventory(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListInventoryQuery>,
    Pagination(page): Pagination,
) -> ApiResult<Json<ListResponse<InventoryResponse>>> {
    let service = InventoryService::new(state.service_context());
    let response = service.list(query, page).await?;
    Ok(Json(response))
}

/// Create the inventory record of a material
///
/// POST /inventory
pub async fn create_inventory(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    ValidatedJson(request): ValidatedJson<CreateInventoryRequest>,
) -> ApiResult<Created<Json<InventoryResponse>>> {
    let service = InventoryService::new(state.service_context());
    let response = service.create(&operator, request).await?;
    Ok(Created(Json(response)))
}

/// Get the inventory record of a material
///
/// GET /inventory/{material_id}
pub async fn get_inventory(
    State(state): State<AppState>,
    MaterialIdPath(material_id): MaterialIdPath,
) -> ApiResult<Json<InventoryResponse>> {
    let service = InventoryService::new(state.service_context());
    let response = service.get(material_id).await?;
    Ok(Json(response))
}

/// Add, subtract or set stock
///
/// POST /inventory/{material_id}/adjust
pub async fn adjust_inventory(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    MaterialIdPath(material_id): MaterialIdPath,
    ValidatedJson(request): ValidatedJson<AdjustInventoryRequest>,
) -> ApiResult<Json<InventoryResponse>> {
    let service = InventoryService::new(state.service_context());
    let response = service.adjust(&operator, material_id, request).await?;
    Ok(Json(response))
}

/// Receive stock
///
/// POST /inventory/{material_id}/inbound
pub async fn inbound(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    MaterialIdPath(material_id): MaterialIdPath,
    ValidatedJson(request): ValidatedJson<InboundRequest>,
) -> ApiResult<Json<InventoryResponse>> {
    let service = InventoryService::new(state.service_context());
    let response = service.inbound(&operator, material_id, request).await?;
    Ok(Json(response))
}

/// Ship stock
///
/// POST /inventory/{material_id}/outbound
pub async fn outbound(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    MaterialIdPath(material_id): MaterialIdPath,
    ValidatedJson(request): ValidatedJson<OutboundRequest>,
) -> ApiResult<Json<InventoryResponse>> {
    let service = InventoryService::new(state.service_context());
    let response = service.outbound(&operator, material_id, request).await?;
    Ok(Json(response))
}

/// Change the unit price
///
/// PATCH /inventory/{material_id}/price
pub async fn update_price(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    MaterialIdPath(material_id): MaterialIdPath,
    ValidatedJson(request): ValidatedJson<UpdatePriceRequest>,
) -> ApiResult<Json<InventoryResponse>> {
    let service = InventoryService::new(state.service_context());
    let response = service.update_price(&operator, material_id, request).await?;
    Ok(Json(response))
}

/// Put a record on or off the shelf
///
/// PATCH /inventory/{material_id}/status
pub async fn update_status(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    MaterialIdPath(material_id): MaterialIdPath,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<InventoryResponse>> {
    let service = InventoryService::new(state.service_context());
    let response = service.set_status(&operator, material_id, request).await?;
    Ok(Json(response))
}

/// POST /inventory/batch/adjust
pub async fn batch_adjust(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    ValidatedJson(request): ValidatedJson<BatchAdjustRequest>,
) -> ApiResult<Json<BatchResponse>> {
    let service = InventoryService::new(state.service_context());
    let response = service.batch_adjust(&operator, request).await?;
    Ok(Json(response))
}

/// POST /inventory/batch/inbound
pub async fn batch_inbound(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    ValidatedJson(request): ValidatedJson<BatchInboundRequest>,
) -> ApiResult<Json<BatchResponse>> {
    let service = InventoryService::new(state.service_context());
    let response = service.batch_inbound(&operator, request).await?;
    Ok(Json(response))
}

/// POST /inventory/batch/outbound
pub async fn batch_outbound(
    State(state): State<AppState>,
    CurrentOperator(operator): CurrentOperator,
    ValidatedJson(request): ValidatedJson<BatchOutboundRequest>,
) -> ApiResult<Json<BatchResponse>> {
    let service = InventoryService::new(state.service_context());
    let response = service.batch_outbound(&operator, request).await?;
    Ok(Json(response))
}
