//! Stock ledger vocabulary: mutation kinds, movement reasons, pricing policy and snapshots

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::Snowflake;

/// Fractional digits kept on every stored price
pub const PRICE_SCALE: u32 = 2;

/// Round half away from zero to [`PRICE_SCALE`] digits and pad, so `6` renders as `6.00`
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut rounded = price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

/// How an adjustment's quantity is applied to the current stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustType {
    Add,
    Subtract,
    Set,
}

impl AdjustType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Set => "set",
        }
    }
}

impl fmt::Display for AdjustType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason attached to an inbound movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InboundReason {
    #[serde(rename = "采购")]
    Purchase,
    #[serde(rename = "退货")]
    CustomerReturn,
    #[serde(rename = "调拨")]
    Transfer,
    #[serde(rename = "盘盈")]
    StocktakeSurplus,
    #[serde(rename = "其他")]
    Other,
}

impl InboundReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "采购",
            Self::CustomerReturn => "退货",
            Self::Transfer => "调拨",
            Self::StocktakeSurplus => "盘盈",
            Self::Other => "其他",
        }
    }
}

impl fmt::Display for InboundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason attached to an outbound movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundReason {
    #[serde(rename = "销售")]
    Sale,
    #[serde(rename = "损耗")]
    Wastage,
    #[serde(rename = "调拨")]
    Transfer,
    #[serde(rename = "盘亏")]
    StocktakeShortage,
    #[serde(rename = "其他")]
    Other,
}

impl OutboundReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "销售",
            Self::Wastage => "损耗",
            Self::Transfer => "调拨",
            Self::StocktakeShortage => "盘亏",
            Self::Other => "其他",
        }
    }
}

impl fmt::Display for OutboundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an inbound unit price folds into the stored price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingPolicy {
    /// `(price * stock + unit_price * quantity) / (stock + quantity)`
    #[default]
    WeightedAverage,
    /// The latest unit price replaces the stored one
    LastPrice,
}

impl PricingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeightedAverage => "weighted_average",
            Self::LastPrice => "last_price",
        }
    }

    /// Price after receiving `quantity` units at `unit_price` on top of `stock` units at `price`.
    ///
    /// Returns `None` on decimal overflow.
    pub fn next_price(
        &self,
        price: Decimal,
        stock: i64,
        unit_price: Decimal,
        quantity: i64,
    ) -> Option<Decimal> {
        match self {
            Self::LastPrice => Some(normalize_price(unit_price)),
            Self::WeightedAverage => {
                let units = stock.checked_add(quantity)?;
                if units <= 0 {
                    return Some(normalize_price(unit_price));
                }
                let held = price.checked_mul(Decimal::from(stock))?;
                let received = unit_price.checked_mul(Decimal::from(quantity))?;
                let total = held.checked_add(received)?;
                total.checked_div(Decimal::from(units)).map(normalize_price)
            }
        }
    }
}

impl fmt::Display for PricingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weighted_average" | "weighted-average" | "average" => Ok(Self::WeightedAverage),
            "last_price" | "last-price" | "last" => Ok(Self::LastPrice),
            other => Err(format!("unknown pricing policy: {other}")),
        }
    }
}

/// Who performed a mutation, as asserted by the upstream gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: Snowflake,
    pub name: String,
}

impl Operator {
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Field of a [`StockSnapshot`] that can appear in an audit value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotField {
    Stock,
    Price,
}

/// Stock and price of one record at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockSnapshot {
    pub stock: i64,
    pub price: Decimal,
}

impl StockSnapshot {
    pub fn new(stock: i64, price: Decimal) -> Self {
        Self { stock, price }
    }

    /// Render the before/after audit values of a transition.
    ///
    /// `primary` is always included; the other field only when it changed.
    /// A single field renders as its bare value (`"150"`, `"6.00"`), both
    /// fields render as a JSON object (`{"stock":20,"price":"6.00"}`).
    pub fn audit_values(before: &Self, after: &Self, primary: SnapshotField) -> (String, String) {
        let stock = primary == SnapshotField::Stock || before.stock != after.stock;
        let price = primary == SnapshotField::Price || before.price != after.price;

        (before.render(stock, price), after.render(stock, price))
    }

    fn render(&self, stock: bool, price: bool) -> String {
        match (stock, price) {
            (true, false) => self.stock.to_string(),
            (false, true) => normalize_price(self.price).to_string(),
            _ => format!(
                r#"{{"stock":{},"price":"{}"}}"#,
                self.stock,
                normalize_price(self.price)
            ),
        }
    }
}
