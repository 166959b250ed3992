//! API Integration Tests
//!
//! Every test spawns the full HTTP stack on an ephemeral port backed by the
//! in-memory store, so no external services are required.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::{
    assert_error, assert_json, BatchView, InventoryView, ListView, LogView, TestServer, BOLT,
    CABLE, NUT, WASHER,
};
use reqwest::StatusCode;
use serde_json::json;

async fn create_with_stock(server: &TestServer, material_id: i64, stock: i64) -> InventoryView {
    let response = server
        .post(
            "/api/v1/inventory",
            &json!({ "materialId": material_id.to_string(), "stock": stock, "price": "10.00" }),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn get_inventory(server: &TestServer, material_id: i64) -> InventoryView {
    let response = server
        .get(&format!("/api/v1/inventory/{material_id}"))
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn logs_for(server: &TestServer, material_id: i64) -> ListView<LogView> {
    let response = server
        .get(&format!("/api/v1/inventory-logs?materialId={material_id}&pageSize=100"))
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");

    let response = server.get("/health/ready").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Inventory Records
// ============================================================================

#[tokio::test]
async fn test_create_get_and_enrich() {
    let server = TestServer::start().await.unwrap();

    let created = create_with_stock(&server, BOLT, 100).await;
    assert_eq!(created.material_id, BOLT.to_string());
    assert_eq!(created.stock, 100);
    assert_eq!(created.price, "10.00");
    assert_eq!(created.material_name.as_deref(), Some("Steel Bolt M8"));
    assert_eq!(created.category_name.as_deref(), Some("Fasteners"));

    let fetched = get_inventory(&server, BOLT).await;
    assert_eq!(fetched.inventory_id, created.inventory_id);

    // Opening stock is audited as a move from zero
    let logs = logs_for(&server, BOLT).await;
    assert_eq!(logs.total, 1);
    assert_eq!(logs.list[0].operation_type, "update_stock");
    assert_eq!(logs.list[0].before_value, "0");
    assert_eq!(logs.list[0].after_value, "100");
    assert_eq!(logs.list[0].operator_name, "张三");

    // Second record for the same material
    let response = server
        .post("/api/v1/inventory", &json!({ "materialId": BOLT.to_string() }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "INVENTORY_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_unknown_inventory_is_404() {
    let server = TestServer::start().await.unwrap();

    let response = server.get(&format!("/api/v1/inventory/{NUT}")).await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_INVENTORY");

    let response = server.get("/api/v1/inventory/not-a-number").await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let server = TestServer::start().await.unwrap();
    for material_id in [BOLT, NUT, WASHER, CABLE] {
        create_with_stock(&server, material_id, 5).await;
    }

    let response = server.get("/api/v1/inventory?pageSize=2").await.unwrap();
    let page: ListView<InventoryView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.list.len(), 2);

    let response = server.get("/api/v1/inventory?keyword=m8").await.unwrap();
    let page: ListView<InventoryView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 3);

    let response = server.get("/api/v1/inventory?categoryId=2").await.unwrap();
    let page: ListView<InventoryView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.list[0].material_id, CABLE.to_string());

    let response = server.get("/api/v1/inventory?keyword=nothing-matches").await.unwrap();
    let page: ListView<InventoryView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.list.is_empty());

    let response = server.get("/api/v1/inventory?pageSize=1000").await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

// ============================================================================
// Stock Movements
// ============================================================================

#[tokio::test]
async fn test_stock_scenario() {
    let server = TestServer::start().await.unwrap();
    create_with_stock(&server, BOLT, 100).await;

    let response = server
        .post(
            &format!("/api/v1/inventory/{BOLT}/adjust"),
            &json!({ "adjustType": "add", "quantity": 50, "reason": "盘点" }),
        )
        .await
        .unwrap();
    let record: InventoryView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(record.stock, 150);

    let response = server
        .post(
            &format!("/api/v1/inventory/{BOLT}/outbound"),
            &json!({ "quantity": 200, "reason": "销售", "customer": "ACME" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "INSUFFICIENT_STOCK");
    assert_eq!(get_inventory(&server, BOLT).await.stock, 150);

    let response = server
        .post(
            &format!("/api/v1/inventory/{BOLT}/outbound"),
            &json!({ "quantity": 150, "reason": "销售", "customer": "ACME" }),
        )
        .await
        .unwrap();
    let record: InventoryView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(record.stock, 0);

    // Opening stock, add, outbound; the rejected outbound left no entry
    let logs = logs_for(&server, BOLT).await;
    assert_eq!(logs.total, 3);
    let newest = &logs.list[0];
    assert_eq!(newest.operation_type, "outbound");
    assert_eq!(newest.before_value, "150");
    assert_eq!(newest.after_value, "0");
    assert!(newest.remark.as_deref().unwrap_or_default().contains("customer: ACME"));
}

#[tokio::test]
async fn test_set_is_idempotent_and_audited_twice() {
    let server = TestServer::start().await.unwrap();
    create_with_stock(&server, NUT, 7).await;

    for _ in 0..2 {
        let response = server
            .post(
                &format!("/api/v1/inventory/{NUT}/adjust"),
                &json!({ "adjustType": "set", "quantity": 40, "reason": "盘点" }),
            )
            .await
            .unwrap();
        let record: InventoryView = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(record.stock, 40);
    }

    let logs = logs_for(&server, NUT).await;
    assert_eq!(logs.total, 3);
    assert_eq!(logs.list[0].before_value, logs.list[1].after_value);
    assert_eq!(logs.list[0].after_value, "40");
}

#[tokio::test]
async fn test_concurrent_outbound_never_oversells() {
    let server = TestServer::start().await.unwrap();
    create_with_stock(&server, WASHER, 5).await;

    let path = format!("/api/v1/inventory/{WASHER}/outbound");
    let body = json!({ "quantity": 1, "reason": "销售" });
    let responses = join_all((0..20).map(|_| server.post(&path, &body))).await;

    let mut succeeded = 0;
    let mut insufficient = 0;
    for response in responses {
        match response.unwrap().status() {
            StatusCode::OK => succeeded += 1,
            StatusCode::CONFLICT => insufficient += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(succeeded, 5);
    assert_eq!(insufficient, 15);
    assert_eq!(get_inventory(&server, WASHER).await.stock, 0);
    // Opening stock plus five outbound entries
    assert_eq!(logs_for(&server, WASHER).await.total, 6);
}

#[tokio::test]
async fn test_weighted_average_inbound() {
    let server = TestServer::start().await.unwrap();
    server
        .post("/api/v1/inventory", &json!({ "materialId": CABLE.to_string() }))
        .await
        .unwrap();

    for unit_price in ["5.00", "7.00"] {
        let response = server
            .post(
                &format!("/api/v1/inventory/{CABLE}/inbound"),
                &json!({ "quantity": 10, "unitPrice": unit_price, "reason": "采购", "supplier": "Acme" }),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let record = get_inventory(&server, CABLE).await;
    assert_eq!(record.stock, 20);
    assert_eq!(record.price, "6.00");

    let logs = logs_for(&server, CABLE).await;
    assert_eq!(logs.list[0].operation_type, "inbound");
    assert!(logs.list[0].remark.as_deref().unwrap_or_default().contains("supplier: Acme"));
}

#[tokio::test]
async fn test_last_price_inbound() {
    let server = TestServer::start_with(&[("INBOUND_PRICING_POLICY", "last_price")])
        .await
        .unwrap();
    server
        .post("/api/v1/inventory", &json!({ "materialId": CABLE.to_string() }))
        .await
        .unwrap();

    for unit_price in ["5.00", "7.00"] {
        server
            .post(
                &format!("/api/v1/inventory/{CABLE}/inbound"),
                &json!({ "quantity": 10, "unitPrice": unit_price, "reason": "采购" }),
            )
            .await
            .unwrap();
    }

    assert_eq!(get_inventory(&server, CABLE).await.price, "7.00");
}

#[tokio::test]
async fn test_price_and_status() {
    let server = TestServer::start().await.unwrap();
    create_with_stock(&server, BOLT, 1).await;

    let response = server
        .patch(&format!("/api/v1/inventory/{BOLT}/price"), &json!({ "price": "12.5" }))
        .await
        .unwrap();
    let record: InventoryView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(record.price, "12.50");

    let logs = logs_for(&server, BOLT).await;
    assert_eq!(logs.list[0].operation_type, "update_price");
    assert_eq!(logs.list[0].before_value, "10.00");
    assert_eq!(logs.list[0].after_value, "12.50");

    let response = server
        .patch(&format!("/api/v1/inventory/{BOLT}/status"), &json!({ "status": "on_shelf" }))
        .await
        .unwrap();
    let record: InventoryView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(record.status, "on_shelf");

    let response = server
        .patch(&format!("/api/v1/inventory/{BOLT}/price"), &json!({ "price": "-1" }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

// ============================================================================
// Batch Operations
// ============================================================================

#[tokio::test]
async fn test_batch_is_best_effort() {
    let server = TestServer::start().await.unwrap();
    create_with_stock(&server, BOLT, 10).await;
    create_with_stock(&server, NUT, 1).await;

    let response = server
        .post(
            "/api/v1/inventory/batch/outbound",
            &json!({ "items": [
                { "materialId": BOLT.to_string(), "quantity": 4, "reason": "销售" },
                { "materialId": NUT.to_string(), "quantity": 5, "reason": "销售" },
                { "materialId": WASHER.to_string(), "quantity": 1, "reason": "销售" },
            ]}),
        )
        .await
        .unwrap();
    let batch: BatchView = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(batch.total, 3);
    assert_eq!(batch.succeeded, 1);
    assert_eq!(batch.failed, 2);
    assert!(batch.results[0].success);
    assert_eq!(batch.results[0].data.as_ref().map(|d| d.stock), Some(6));
    assert_eq!(batch.results[1].error.as_ref().map(|e| e.code.as_str()), Some("INSUFFICIENT_STOCK"));
    assert_eq!(batch.results[2].index, 2);
    assert_eq!(batch.results[2].error.as_ref().map(|e| e.code.as_str()), Some("UNKNOWN_INVENTORY"));

    assert_eq!(get_inventory(&server, NUT).await.stock, 1);
}

#[tokio::test]
async fn test_empty_batch_rejected() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/v1/inventory/batch/adjust", &json!({ "items": [] }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

// ============================================================================
// Request Validation
// ============================================================================

#[tokio::test]
async fn test_mutation_without_operator_is_401() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_anonymous("/api/v1/inventory", &json!({ "materialId": BOLT.to_string() }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_OPERATOR");
    assert_eq!(server.store.log_count(), 0);
}

#[tokio::test]
async fn test_unknown_enumerations_are_400() {
    let server = TestServer::start().await.unwrap();
    create_with_stock(&server, BOLT, 10).await;

    let response = server
        .post(
            &format!("/api/v1/inventory/{BOLT}/adjust"),
            &json!({ "adjustType": "multiply", "quantity": 2, "reason": "x" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_REQUEST_BODY");

    let response = server
        .post(
            &format!("/api/v1/inventory/{BOLT}/inbound"),
            &json!({ "quantity": 2, "reason": "捐赠" }),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post(
            &format!("/api/v1/inventory/{BOLT}/outbound"),
            &json!({ "quantity": 0, "reason": "销售" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");

    assert_eq!(get_inventory(&server, BOLT).await.stock, 10);
}

#[tokio::test]
async fn test_store_unavailable_is_503_without_side_effects() {
    let server = TestServer::start().await.unwrap();
    create_with_stock(&server, BOLT, 10).await;
    let entries_before = server.store.log_count();

    server.store.set_unavailable(true);
    let response = server
        .post(
            &format!("/api/v1/inventory/{BOLT}/outbound"),
            &json!({ "quantity": 1, "reason": "销售" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::SERVICE_UNAVAILABLE).await.unwrap();
    assert_eq!(code, "STORE_UNAVAILABLE");
    server.store.set_unavailable(false);

    assert_eq!(get_inventory(&server, BOLT).await.stock, 10);
    assert_eq!(server.store.log_count(), entries_before);
}

// ============================================================================
// Audit Log
// ============================================================================

#[tokio::test]
async fn test_log_filters() {
    let server = TestServer::start().await.unwrap();
    create_with_stock(&server, BOLT, 3).await;
    create_with_stock(&server, CABLE, 3).await;

    let response = server
        .get("/api/v1/inventory-logs?materialName=%E7%94%B5%E7%BC%86")
        .await
        .unwrap();
    let logs: ListView<LogView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(logs.total, 1);
    assert_eq!(logs.list[0].material_id, CABLE.to_string());

    let today = chrono::Utc::now().date_naive();
    let response = server
        .get(&format!(
            "/api/v1/inventory-logs?operationType=update_stock&startDate={today}&endDate={today}"
        ))
        .await
        .unwrap();
    let logs: ListView<LogView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(logs.total, 2);
    assert!(logs.list.iter().all(|log| !log.log_id.is_empty()));
    assert!(logs.list.iter().all(|log| log.operator_id == "501"));

    let response = server
        .get("/api/v1/inventory-logs?startDate=2025-02-01&endDate=2025-01-01")
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_purge_expired_logs() {
    let server = TestServer::start().await.unwrap();
    create_with_stock(&server, BOLT, 3).await;

    let response = server
        .delete("/api/v1/inventory-logs/expired?retentionDays=30")
        .await
        .unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["deleted"], 0);
    assert_eq!(body["retentionDays"], 30);
    assert_eq!(server.store.log_count(), 1);

    let response = server
        .delete("/api/v1/inventory-logs/expired?retentionDays=0")
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
}
