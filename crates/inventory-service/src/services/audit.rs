//! Audit entry construction
//!
//! Builds the immutable log entry that is committed together with a stock or
//! price change. No validation happens here; the engine only builds an entry
//! once the mutation has been applied successfully.

use chrono::{DateTime, Utc};
use inventory_core::{
    InventoryLog, OperationType, Operator, SnapshotField, Snowflake, StockSnapshot,
};

/// Separator between remark parts
const REMARK_SEPARATOR: &str = " | ";

/// Builder for one audit log entry
#[derive(Debug, Clone)]
pub struct AuditEntryBuilder {
    operator: Operator,
    material_id: Snowflake,
    material_name: String,
    operation_type: OperationType,
    before_value: String,
    after_value: String,
    remark: Option<String>,
    operation_date: Option<DateTime<Utc>>,
}

impl AuditEntryBuilder {
    pub fn new(
        operator: &Operator,
        material_id: Snowflake,
        material_name: impl Into<String>,
        operation_type: OperationType,
    ) -> Self {
        Self {
            operator: operator.clone(),
            material_id,
            material_name: material_name.into(),
            operation_type,
            before_value: String::new(),
            after_value: String::new(),
            remark: None,
            operation_date: None,
        }
    }

    /// Record the before/after state
    ///
    /// Price updates always show the price, every other operation always shows
    /// the stock. A field that changed as a side effect is included as well.
    pub fn transition(mut self, before: StockSnapshot, after: StockSnapshot) -> Self {
        let primary = match self.operation_type {
            OperationType::UpdatePrice => SnapshotField::Price,
            OperationType::UpdateStock | OperationType::Inbound | OperationType::Outbound => {
                SnapshotField::Stock
            }
        };
        let (before_value, after_value) = StockSnapshot::audit_values(&before, &after, primary);
        self.before_value = before_value;
        self.after_value = after_value;
        self
    }

    pub fn remark(mut self, remark: Option<String>) -> Self {
        self.remark = remark;
        self
    }

    pub fn operation_date(mut self, operation_date: Option<DateTime<Utc>>) -> Self {
        self.operation_date = operation_date;
        self
    }

    pub fn build(self, id: Snowflake) -> InventoryLog {
        InventoryLog {
            id,
            operator_id: self.operator.id,
            operator_name: self.operator.name,
            material_id: self.material_id,
            material_name: self.material_name,
            operation_type: self.operation_type,
            before_value: self.before_value,
            after_value: self.after_value,
            remark: self.remark,
            operation_date: self.operation_date,
            created_at: Utc::now(),
        }
    }
}

/// Join the non-empty remark parts
///
/// Returns `None` when nothing is left after trimming.
pub fn compose_remark<I, S>(parts: I) -> Option<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let parts: Vec<String> = parts
        .into_iter()
        .flatten()
        .map(|part| part.as_ref().trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(REMARK_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn operator() -> Operator {
        Operator::new(Snowflake::new(9), "张三")
    }

    #[test]
    fn test_stock_change_renders_integers() {
        let entry = AuditEntryBuilder::new(&operator(), Snowflake::new(1), "Bolt", OperationType::UpdateStock)
            .transition(
                StockSnapshot::new(100, Decimal::new(500, 2)),
                StockSnapshot::new(150, Decimal::new(500, 2)),
            )
            .build(Snowflake::new(77));

        assert_eq!(entry.id, Snowflake::new(77));
        assert_eq!(entry.operator_name, "张三");
        assert_eq!(entry.before_value, "100");
        assert_eq!(entry.after_value, "150");
        assert!(entry.remark.is_none());
    }

    #[test]
    fn test_inbound_with_price_change_renders_both() {
        let entry = AuditEntryBuilder::new(&operator(), Snowflake::new(1), "Bolt", OperationType::Inbound)
            .transition(
                StockSnapshot::new(10, Decimal::new(500, 2)),
                StockSnapshot::new(20, Decimal::new(600, 2)),
            )
            .build(Snowflake::new(1));

        assert_eq!(entry.before_value, r#"{"stock":10,"price":"5.00"}"#);
        assert_eq!(entry.after_value, r#"{"stock":20,"price":"6.00"}"#);
    }

    #[test]
    fn test_price_update_renders_price() {
        let entry = AuditEntryBuilder::new(&operator(), Snowflake::new(1), "Bolt", OperationType::UpdatePrice)
            .transition(
                StockSnapshot::new(3, Decimal::new(5, 0)),
                StockSnapshot::new(3, Decimal::new(1250, 2)),
            )
            .build(Snowflake::new(1));

        assert_eq!(entry.before_value, "5.00");
        assert_eq!(entry.after_value, "12.50");
    }

    #[test]
    fn test_compose_remark() {
        assert_eq!(
            compose_remark([Some("采购"), Some("supplier: ACME"), None, Some("  ")]).as_deref(),
            Some("采购 | supplier: ACME")
        );
        assert!(compose_remark([None, Some("")]).is_none());
        assert_eq!(
            compose_remark([Some("销售".to_string()), Some(format!("customer: {}", "Li"))]).as_deref(),
            Some("销售 | customer: Li")
        );
    }
}
