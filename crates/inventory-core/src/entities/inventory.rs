//! Inventory entity - current stock, price and shelf status of one material

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{normalize_price, AdjustType, PricingPolicy, Snowflake, StockSnapshot};

/// Shelf status of an inventory record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    OnShelf,
    #[default]
    OffShelf,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnShelf => "on_shelf",
            Self::OffShelf => "off_shelf",
        }
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventoryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_shelf" => Ok(Self::OnShelf),
            "off_shelf" => Ok(Self::OffShelf),
            other => Err(DomainError::ValidationError(format!(
                "unknown inventory status: {other}"
            ))),
        }
    }
}

/// Inventory record entity
///
/// `stock` never goes below zero: every mutator checks before it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub id: Snowflake,
    pub material_id: Snowflake,
    pub price: Decimal,
    pub stock: i64,
    pub status: InventoryStatus,
    /// Bumped on every committed write, used for optimistic concurrency
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inventory {
    /// Create an empty, off-shelf record for a material
    pub fn new(id: Snowflake, material_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            material_id,
            price: normalize_price(Decimal::ZERO),
            stock: 0,
            status: InventoryStatus::OffShelf,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current stock and price
    pub fn snapshot(&self) -> StockSnapshot {
        StockSnapshot::new(self.stock, self.price)
    }

    /// Apply an add / subtract / set adjustment
    pub fn adjust_stock(&mut self, adjust: AdjustType, quantity: i64) -> Result<(), DomainError> {
        Self::ensure_positive(quantity)?;

        let next = match adjust {
            AdjustType::Add => self.checked_add(quantity)?,
            AdjustType::Subtract => self.checked_sub(quantity)?,
            AdjustType::Set => quantity,
        };

        self.stock = next;
        self.touch();
        Ok(())
    }

    /// Receive goods, optionally folding `unit_price` into the price under `policy`
    pub fn receive(
        &mut self,
        quantity: i64,
        unit_price: Option<Decimal>,
        policy: PricingPolicy,
    ) -> Result<(), DomainError> {
        Self::ensure_positive(quantity)?;

        let next_stock = self.checked_add(quantity)?;
        let next_price = match unit_price {
            Some(unit_price) => {
                Self::ensure_price(unit_price)?;
                policy
                    .next_price(self.price, self.stock, unit_price, quantity)
                    .ok_or_else(|| DomainError::ValidationError("price overflow".to_string()))?
            }
            None => self.price,
        };

        self.stock = next_stock;
        self.price = next_price;
        self.touch();
        Ok(())
    }

    /// Issue goods out of stock
    pub fn issue(&mut self, quantity: i64) -> Result<(), DomainError> {
        Self::ensure_positive(quantity)?;

        self.stock = self.checked_sub(quantity)?;
        self.touch();
        Ok(())
    }

    /// Overwrite the unit price
    pub fn set_price(&mut self, price: Decimal) -> Result<(), DomainError> {
        Self::ensure_price(price)?;

        self.price = normalize_price(price);
        self.touch();
        Ok(())
    }

    /// Shelve or unshelve. Returns whether the status changed.
    pub fn set_status(&mut self, status: InventoryStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.touch();
        true
    }

    fn checked_add(&self, quantity: i64) -> Result<i64, DomainError> {
        self.stock
            .checked_add(quantity)
            .ok_or_else(|| DomainError::ValidationError("stock overflow".to_string()))
    }

    fn checked_sub(&self, quantity: i64) -> Result<i64, DomainError> {
        match self.stock.checked_sub(quantity) {
            Some(next) if next >= 0 => Ok(next),
            _ => Err(DomainError::InsufficientStock {
                material_id: self.material_id,
                available: self.stock,
                requested: quantity,
            }),
        }
    }

    fn ensure_positive(quantity: i64) -> Result<(), DomainError> {
        if quantity <= 0 {
            return Err(DomainError::ValidationError(
                "quantity must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_price(price: Decimal) -> Result<(), DomainError> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(DomainError::ValidationError(
                "price must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
