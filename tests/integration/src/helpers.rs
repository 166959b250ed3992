//! Test helpers for integration tests
//!
//! Provides a self-contained test server and request helpers that attach
//! the operator identity headers.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use inventory_api::{create_app, AppState};
use inventory_common::AppConfig;
use inventory_core::{Operator, SnowflakeGenerator};
use inventory_db::MemoryStore;
use inventory_service::ServiceContextBuilder;
use reqwest::header::HeaderValue;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{default_operator, seed_catalog};

pub const OPERATOR_ID_HEADER: &str = "x-operator-id";
pub const OPERATOR_NAME_HEADER: &str = "x-operator-name";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Backing store, for seeding and fault injection
    pub store: MemoryStore,
    pub operator: Operator,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    /// Start a server with the default test configuration
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a server with extra configuration variables
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        let config = test_config(overrides)?;

        let store = MemoryStore::new();
        seed_catalog(&store);

        let service_context = ServiceContextBuilder::new()
            .inventory_repo(Arc::new(store.inventories()))
            .log_repo(Arc::new(store.logs()))
            .material_repo(Arc::new(store.materials()))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
            .ledger(config.ledger.clone())
            .build()?;

        let app = create_app(AppState::new(service_context, config, None))?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            store,
            operator: default_operator(),
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Attach the operator headers; the name goes out as raw UTF-8 bytes
    fn as_operator(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let name = HeaderValue::from_bytes(self.operator.name.as_bytes())?;
        Ok(builder
            .header(OPERATOR_ID_HEADER, self.operator.id.to_string())
            .header(OPERATOR_NAME_HEADER, name))
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a POST request without operator headers
    pub async fn post_anonymous<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request as the test operator
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let builder = self.as_operator(self.client.post(self.url(path)))?;
        Ok(builder.json(body).send().await?)
    }

    /// Make a PATCH request as the test operator
    pub async fn patch<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let builder = self.as_operator(self.client.patch(self.url(path)))?;
        Ok(builder.json(body).send().await?)
    }

    /// Make a DELETE request as the test operator
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let builder = self.as_operator(self.client.delete(self.url(path)))?;
        Ok(builder.send().await?)
    }
}

/// Test configuration: in-memory store and a rate limit tests never hit
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("APP_ENV", "development"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "0"),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000"),
        ("RATE_LIMIT_BURST", "100000"),
        ("WORKER_ID", "1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("error body without code: {body}"))
}
