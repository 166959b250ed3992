//! Value objects - immutable types that represent domain concepts

mod snowflake;
mod stock;

pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use stock::{
    normalize_price, AdjustType, InboundReason, Operator, OutboundReason, PricingPolicy,
    SnapshotField, StockSnapshot, PRICE_SCALE,
};
