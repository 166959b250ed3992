//! Inventory log entity - immutable audit record of one ledger mutation

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Kind of mutation an audit entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    UpdateStock,
    UpdatePrice,
    Inbound,
    Outbound,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdateStock => "update_stock",
            Self::UpdatePrice => "update_price",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update_stock" => Ok(Self::UpdateStock),
            "update_price" => Ok(Self::UpdatePrice),
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            other => Err(DomainError::ValidationError(format!(
                "unknown operation type: {other}"
            ))),
        }
    }
}

/// Audit trail entry. Written once with the mutation it describes, never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLog {
    pub id: Snowflake,
    pub operator_id: Snowflake,
    pub operator_name: String,
    pub material_id: Snowflake,
    pub material_name: String,
    pub operation_type: OperationType,
    pub before_value: String,
    pub after_value: String,
    pub remark: Option<String>,
    /// Business date supplied by the caller, if any
    pub operation_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl InventoryLog {
    /// Whether the entry was written strictly before `cutoff`
    #[inline]
    pub fn is_older_than(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }
}
