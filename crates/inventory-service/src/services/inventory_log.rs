//! Inventory log service
//!
//! Audit trail queries and retention housekeeping.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use inventory_core::traits::InventoryLogQuery;
use inventory_core::Operator;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    InventoryLogResponse, ListInventoryLogQuery, ListResponse, PageParams, PurgeResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Longest retention accepted from configuration or callers
const MAX_RETENTION_DAYS: i64 = 3650;

fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Inventory log service
pub struct InventoryLogService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InventoryLogService<'a> {
    /// Create a new InventoryLogService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List audit entries, newest first
    ///
    /// Name filters are case-insensitive substrings. The date range covers
    /// whole UTC days on both ends.
    #[instrument(skip(self))]
    pub async fn list_logs(
        &self,
        query: ListInventoryLogQuery,
        page: PageParams,
    ) -> ServiceResult<ListResponse<InventoryLogResponse>> {
        query.validate()?;
        page.validate()?;

        let start = query.start_date.and_then(start_of_day);
        // Exclusive bound at the start of the following day
        let end = query
            .end_date
            .and_then(|date| date.succ_opt())
            .and_then(start_of_day);

        let logs = self
            .ctx
            .log_repo()
            .list(&InventoryLogQuery {
                operator_name: non_empty(query.operator_name),
                material_name: non_empty(query.material_name),
                material_id: query.material_id,
                operation_type: query.operation_type,
                start,
                end,
                offset: page.offset(),
                limit: page.limit(),
            })
            .await?;

        Ok(ListResponse::new(
            logs.items.iter().map(InventoryLogResponse::from).collect(),
            logs.total,
        ))
    }

    /// Delete audit entries older than the retention window
    ///
    /// Falls back to the configured retention when none is given.
    #[instrument(skip(self, operator), fields(operator = %operator.name))]
    pub async fn purge_expired(
        &self,
        operator: &Operator,
        retention_days: Option<i64>,
    ) -> ServiceResult<PurgeResponse> {
        let retention_days = retention_days.unwrap_or(self.ctx.ledger().log_retention_days);
        if !(1..=MAX_RETENTION_DAYS).contains(&retention_days) {
            return Err(ServiceError::validation(format!(
                "Retention must be 1-{MAX_RETENTION_DAYS} days, got {retention_days}"
            )));
        }

        let window = Duration::try_days(retention_days)
            .ok_or_else(|| ServiceError::internal("retention window overflow"))?;
        let cutoff = Utc::now() - window;

        let deleted = self.ctx.log_repo().delete_before(cutoff).await?;

        info!(
            deleted,
            retention_days,
            cutoff = %cutoff,
            operator_id = %operator.id,
            "Expired inventory logs purged"
        );

        Ok(PurgeResponse {
            deleted,
            cutoff,
            retention_days,
        })
    }
}
