//! Inventory service
//!
//! Stock ledger engine: creation, adjustments, inbound and outbound movements,
//! price and shelf status changes, batch variants and enriched queries.
//!
//! Every mutation of one material runs under that material's lock and commits
//! with an expected version. A version conflict re-runs the whole
//! read-validate-commit sequence with backoff, up to the configured retries.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use inventory_core::entities::{Inventory, Material};
use inventory_core::traits::{InventoryQuery, MaterialQuery};
use inventory_core::{
    AdjustType, DomainError, InventoryStatus, OperationType, Operator, PricingPolicy, Snowflake,
};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    AdjustInventoryRequest, BatchAdjustRequest, BatchInboundRequest, BatchItemResult,
    BatchOutboundRequest, BatchResponse, CreateInventoryRequest, InboundRequest,
    InventoryResponse, InventoryWithMaterial, ListInventoryQuery, ListResponse, OutboundRequest,
    PageParams, UpdatePriceRequest, UpdateStatusRequest,
};

use super::audit::{compose_remark, AuditEntryBuilder};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Longest accepted operator name
const MAX_OPERATOR_NAME_CHARS: usize = 100;

/// Base delay before the first retry
const RETRY_BASE_DELAY_MS: u64 = 5;

/// Upper bound of the random jitter added to each retry delay
const RETRY_JITTER_MS: u64 = 10;

/// Change applied to a fresh copy of the record on every attempt
#[derive(Debug, Clone, Copy)]
enum Mutation {
    Adjust {
        adjust_type: AdjustType,
        quantity: i64,
    },
    Inbound {
        quantity: i64,
        unit_price: Option<Decimal>,
    },
    Outbound {
        quantity: i64,
    },
    Price(Decimal),
    Status(InventoryStatus),
}

impl Mutation {
    /// Audit type, `None` for changes that are not ledger movements
    fn operation_type(&self) -> Option<OperationType> {
        match self {
            Self::Adjust { .. } => Some(OperationType::UpdateStock),
            Self::Inbound { .. } => Some(OperationType::Inbound),
            Self::Outbound { .. } => Some(OperationType::Outbound),
            Self::Price(_) => Some(OperationType::UpdatePrice),
            Self::Status(_) => None,
        }
    }

    /// Returns false when the record is left unchanged
    fn apply(&self, inventory: &mut Inventory, policy: PricingPolicy) -> Result<bool, DomainError> {
        match *self {
            Self::Adjust {
                adjust_type,
                quantity,
            } => inventory.adjust_stock(adjust_type, quantity)?,
            Self::Inbound {
                quantity,
                unit_price,
            } => inventory.receive(quantity, unit_price, policy)?,
            Self::Outbound { quantity } => inventory.issue(quantity)?,
            Self::Price(price) => inventory.set_price(price)?,
            Self::Status(status) => return Ok(inventory.set_status(status)),
        }
        Ok(true)
    }
}

/// Mutation plus the audit details recorded with it
#[derive(Debug, Clone)]
struct MutationPlan {
    mutation: Mutation,
    remark: Option<String>,
    operation_date: Option<DateTime<Utc>>,
}

impl MutationPlan {
    fn new(mutation: Mutation) -> Self {
        Self {
            mutation,
            remark: None,
            operation_date: None,
        }
    }

    fn remark(mut self, remark: Option<String>) -> Self {
        self.remark = remark;
        self
    }

    fn operation_date(mut self, operation_date: Option<DateTime<Utc>>) -> Self {
        self.operation_date = operation_date;
        self
    }
}

/// Backoff before retry `attempt` (1-based)
///
/// Kept synchronous so the thread-local RNG never lives across an await.
fn retry_delay(attempt: u32) -> Duration {
    let exponential = RETRY_BASE_DELAY_MS << attempt.saturating_sub(1).min(6);
    let jitter = rand::thread_rng().gen_range(0..=RETRY_JITTER_MS);
    Duration::from_millis(exponential + jitter)
}

/// Reject operator identities the audit trail cannot record
fn ensure_operator(operator: &Operator) -> ServiceResult<()> {
    if operator.id.is_zero() {
        return Err(ServiceError::validation("Operator id is required"));
    }
    let name = operator.name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation("Operator name is required"));
    }
    if name.chars().count() > MAX_OPERATOR_NAME_CHARS {
        return Err(ServiceError::validation(
            "Operator name must be at most 100 characters",
        ));
    }
    Ok(())
}

/// Inventory service
pub struct InventoryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InventoryService<'a> {
    /// Create a new InventoryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Record lifecycle
    // ========================================================================

    /// Create the inventory record for a catalog material
    ///
    /// A positive opening stock is recorded as an `update_stock` entry
    /// starting from zero.
    #[instrument(skip(self, operator, request), fields(material_id = %request.material_id))]
    pub async fn create(
        &self,
        operator: &Operator,
        request: CreateInventoryRequest,
    ) -> ServiceResult<InventoryResponse> {
        ensure_operator(operator)?;
        request.validate()?;

        let material_id = request.material_id;
        let material = self
            .ctx
            .material_repo()
            .find_by_id(material_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Material", material_id.to_string()))?;

        let mut inventory = Inventory::new(self.ctx.generate_id(), material_id);
        if let Some(price) = request.price {
            inventory.set_price(price)?;
        }
        if let Some(status) = request.status {
            inventory.set_status(status);
        }

        let opening = inventory.snapshot();
        let opening_stock = request.stock.unwrap_or(0);
        let log = if opening_stock > 0 {
            inventory.stock = opening_stock;
            let entry = AuditEntryBuilder::new(
                operator,
                material_id,
                material.name.clone(),
                OperationType::UpdateStock,
            )
            .transition(opening, inventory.snapshot())
            .remark(compose_remark([request.notes.as_deref()]))
            .build(self.ctx.generate_id());
            Some(entry)
        } else {
            None
        };

        self.ctx
            .inventory_repo()
            .create(&inventory, log.as_ref())
            .await?;

        info!(
            inventory_id = %inventory.id,
            material_id = %material_id,
            stock = inventory.stock,
            operator = %operator.name,
            "Inventory created"
        );

        Ok(InventoryResponse::from(InventoryWithMaterial::new(
            &inventory,
            Some(&material),
        )))
    }

    /// Get the enriched record of one material
    #[instrument(skip(self))]
    pub async fn get(&self, material_id: Snowflake) -> ServiceResult<InventoryResponse> {
        let inventory = self
            .ctx
            .inventory_repo()
            .find_by_material(material_id)
            .await?
            .ok_or(DomainError::InventoryNotFound(material_id))?;

        let material = self.ctx.material_repo().find_by_id(material_id).await?;

        Ok(InventoryResponse::from(InventoryWithMaterial::new(
            &inventory,
            material.as_ref(),
        )))
    }

    /// List records, newest first
    ///
    /// Keyword and category filters are resolved against the material catalog
    /// first; no matching material means an empty page.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: ListInventoryQuery,
        page: PageParams,
    ) -> ServiceResult<ListResponse<InventoryResponse>> {
        query.validate()?;
        page.validate()?;

        let material_query = MaterialQuery {
            keyword: query
                .keyword
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            category_id: query.category_id,
        };

        let material_ids = if material_query.is_empty() {
            None
        } else {
            let matches = self.ctx.material_repo().search(&material_query).await?;
            if matches.is_empty() {
                return Ok(ListResponse::empty());
            }
            Some(matches.into_iter().map(|m| m.id).collect::<Vec<_>>())
        };

        let records = self
            .ctx
            .inventory_repo()
            .list(&InventoryQuery {
                material_ids,
                status: query.status,
                offset: page.offset(),
                limit: page.limit(),
            })
            .await?;

        let ids: Vec<Snowflake> = records.items.iter().map(|i| i.material_id).collect();
        let materials: HashMap<Snowflake, Material> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.ctx
                .material_repo()
                .find_by_ids(&ids)
                .await?
                .into_iter()
                .map(|m| (m.id, m))
                .collect()
        };

        let list = records
            .items
            .iter()
            .map(|inventory| {
                InventoryResponse::from(InventoryWithMaterial::new(
                    inventory,
                    materials.get(&inventory.material_id),
                ))
            })
            .collect();

        Ok(ListResponse::new(list, records.total))
    }

    // ========================================================================
    // Ledger mutations
    // ========================================================================

    /// Add to, subtract from or overwrite the stock level
    #[instrument(skip(self, operator, request), fields(adjust_type = %request.adjust_type, quantity = request.quantity))]
    pub async fn adjust(
        &self,
        operator: &Operator,
        material_id: Snowflake,
        request: AdjustInventoryRequest,
    ) -> ServiceResult<InventoryResponse> {
        ensure_operator(operator)?;
        request.validate()?;

        let plan = MutationPlan::new(Mutation::Adjust {
            adjust_type: request.adjust_type,
            quantity: request.quantity,
        })
        .remark(compose_remark([Some(request.reason), request.notes]))
        .operation_date(request.operation_date);

        self.mutate(operator, material_id, plan).await
    }

    /// Receive goods, re-pricing according to the configured policy
    #[instrument(skip(self, operator, request), fields(quantity = request.quantity))]
    pub async fn inbound(
        &self,
        operator: &Operator,
        material_id: Snowflake,
        request: InboundRequest,
    ) -> ServiceResult<InventoryResponse> {
        ensure_operator(operator)?;
        request.validate()?;

        let plan = MutationPlan::new(Mutation::Inbound {
            quantity: request.quantity,
            unit_price: request.unit_price,
        })
        .remark(compose_remark([
            Some(request.reason.as_str().to_string()),
            request.supplier.map(|s| format!("supplier: {}", s.trim())),
            request.notes,
        ]))
        .operation_date(request.operation_date);

        self.mutate(operator, material_id, plan).await
    }

    /// Issue goods; never drives the stock below zero
    #[instrument(skip(self, operator, request), fields(quantity = request.quantity))]
    pub async fn outbound(
        &self,
        operator: &Operator,
        material_id: Snowflake,
        request: OutboundRequest,
    ) -> ServiceResult<InventoryResponse> {
        ensure_operator(operator)?;
        request.validate()?;

        let plan = MutationPlan::new(Mutation::Outbound {
            quantity: request.quantity,
        })
        .remark(compose_remark([
            Some(request.reason.as_str().to_string()),
            request.customer.map(|c| format!("customer: {}", c.trim())),
            request.notes,
        ]))
        .operation_date(request.operation_date);

        self.mutate(operator, material_id, plan).await
    }

    /// Set the unit price
    #[instrument(skip(self, operator, request))]
    pub async fn update_price(
        &self,
        operator: &Operator,
        material_id: Snowflake,
        request: UpdatePriceRequest,
    ) -> ServiceResult<InventoryResponse> {
        ensure_operator(operator)?;
        request.validate()?;

        let plan = MutationPlan::new(Mutation::Price(request.price))
            .remark(compose_remark([request.notes]));

        self.mutate(operator, material_id, plan).await
    }

    /// Shelve or unshelve; not audited and never touches the stock
    #[instrument(skip(self, operator, request), fields(status = %request.status))]
    pub async fn set_status(
        &self,
        operator: &Operator,
        material_id: Snowflake,
        request: UpdateStatusRequest,
    ) -> ServiceResult<InventoryResponse> {
        ensure_operator(operator)?;

        self.mutate(
            operator,
            material_id,
            MutationPlan::new(Mutation::Status(request.status)),
        )
        .await
    }

    // ========================================================================
    // Batch mutations
    // ========================================================================

    /// Apply each adjustment independently
    #[instrument(skip(self, operator, request), fields(items = request.items.len()))]
    pub async fn batch_adjust(
        &self,
        operator: &Operator,
        request: BatchAdjustRequest,
    ) -> ServiceResult<BatchResponse> {
        ensure_operator(operator)?;
        request.validate()?;
        self.ensure_batch_size(request.items.len())?;

        let mut results = Vec::with_capacity(request.items.len());
        for (index, item) in request.items.into_iter().enumerate() {
            let outcome = self.adjust(operator, item.material_id, item.request).await;
            results.push(batch_result(index, item.material_id, outcome));
        }

        Ok(self.finish_batch("adjust", results))
    }

    /// Apply each inbound independently
    #[instrument(skip(self, operator, request), fields(items = request.items.len()))]
    pub async fn batch_inbound(
        &self,
        operator: &Operator,
        request: BatchInboundRequest,
    ) -> ServiceResult<BatchResponse> {
        ensure_operator(operator)?;
        request.validate()?;
        self.ensure_batch_size(request.items.len())?;

        let mut results = Vec::with_capacity(request.items.len());
        for (index, item) in request.items.into_iter().enumerate() {
            let outcome = self.inbound(operator, item.material_id, item.request).await;
            results.push(batch_result(index, item.material_id, outcome));
        }

        Ok(self.finish_batch("inbound", results))
    }

    /// Apply each outbound independently
    #[instrument(skip(self, operator, request), fields(items = request.items.len()))]
    pub async fn batch_outbound(
        &self,
        operator: &Operator,
        request: BatchOutboundRequest,
    ) -> ServiceResult<BatchResponse> {
        ensure_operator(operator)?;
        request.validate()?;
        self.ensure_batch_size(request.items.len())?;

        let mut results = Vec::with_capacity(request.items.len());
        for (index, item) in request.items.into_iter().enumerate() {
            let outcome = self.outbound(operator, item.material_id, item.request).await;
            results.push(batch_result(index, item.material_id, outcome));
        }

        Ok(self.finish_batch("outbound", results))
    }

    fn ensure_batch_size(&self, len: usize) -> ServiceResult<()> {
        if len == 0 {
            return Err(ServiceError::validation("Batch must contain at least one item"));
        }
        let limit = self.ctx.ledger().batch_limit;
        if len > limit {
            return Err(ServiceError::validation(format!(
                "Batch must contain at most {limit} items, got {len}"
            )));
        }
        Ok(())
    }

    fn finish_batch(&self, kind: &'static str, results: Vec<BatchItemResult>) -> BatchResponse {
        let response = BatchResponse::from_results(results);
        info!(
            kind,
            total = response.total,
            succeeded = response.succeeded,
            failed = response.failed,
            "Batch processed"
        );
        response
    }

    // ========================================================================
    // Engine
    // ========================================================================

    /// Run one planned change under the material lock, retrying on conflicts
    async fn mutate(
        &self,
        operator: &Operator,
        material_id: Snowflake,
        plan: MutationPlan,
    ) -> ServiceResult<InventoryResponse> {
        let material = self.ctx.material_repo().find_by_id(material_id).await?;
        let material_name = material
            .as_ref()
            .map(|m| m.name.clone())
            .unwrap_or_else(|| material_id.to_string());

        let _guard = self.ctx.material_locks().acquire(material_id).await;

        let max_retries = self.ctx.ledger().max_retries;
        let mut attempt = 0;
        let inventory = loop {
            match self
                .try_commit(operator, material_id, &material_name, &plan)
                .await
            {
                Ok(inventory) => break inventory,
                Err(err) if err.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    warn!(
                        material_id = %material_id,
                        attempt,
                        max_retries,
                        "Version conflict, retrying"
                    );
                    tokio::time::sleep(retry_delay(attempt)).await;
                }
                Err(err) => return Err(err.into()),
            }
        };

        info!(
            material_id = %material_id,
            operation = plan.mutation.operation_type().map_or("set_status", |op| op.as_str()),
            stock = inventory.stock,
            price = %inventory.price,
            version = inventory.version,
            operator = %operator.name,
            "Inventory committed"
        );

        Ok(InventoryResponse::from(InventoryWithMaterial::new(
            &inventory,
            material.as_ref(),
        )))
    }

    /// One read-validate-commit pass
    async fn try_commit(
        &self,
        operator: &Operator,
        material_id: Snowflake,
        material_name: &str,
        plan: &MutationPlan,
    ) -> Result<Inventory, DomainError> {
        let repo = self.ctx.inventory_repo();
        let current = repo
            .find_by_material(material_id)
            .await?
            .ok_or(DomainError::InventoryNotFound(material_id))?;

        let mut next = current.clone();
        if !plan
            .mutation
            .apply(&mut next, self.ctx.ledger().pricing_policy)?
        {
            return Ok(current);
        }
        next.version = current.version + 1;

        let log = plan.mutation.operation_type().map(|operation_type| {
            AuditEntryBuilder::new(operator, material_id, material_name, operation_type)
                .transition(current.snapshot(), next.snapshot())
                .remark(plan.remark.clone())
                .operation_date(plan.operation_date)
                .build(self.ctx.generate_id())
        });

        repo.commit(&next, current.version, log.as_ref()).await?;
        Ok(next)
    }
}

fn batch_result(
    index: usize,
    material_id: Snowflake,
    outcome: ServiceResult<InventoryResponse>,
) -> BatchItemResult {
    match outcome {
        Ok(data) => BatchItemResult::succeeded(index, data),
        Err(err) => {
            warn!(index, material_id = %material_id, error = %err, "Batch item rejected");
            BatchItemResult::failed(index, material_id.to_string(), err.error_code(), err.to_string())
        }
    }
}
