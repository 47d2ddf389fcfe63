//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::table::{DeviceId, TableNumber};

/// Order identifier (`order-{seq}`)
pub type OrderId = String;

/// Order lifecycle status
///
/// Ordered `pending -> preparing -> ready -> closed`. The hub does not
/// enforce the order of transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Closed,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

/// Order line item
///
/// Only `price` and `quantity` are interpreted by the hub; every other field a
/// terminal sends (product id, notes, ...) is kept in `extra` and echoed back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderItem {
    /// Priced item helper
    pub fn priced(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            quantity: Some(quantity),
            extra: Map::new(),
        }
    }

    /// Quantity used for totals: missing or zero counts as one
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.unwrap_or(1).max(1)
    }
}

/// Order record (订单)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub table: TableNumber,
    pub items: Vec<OrderItem>,
    pub total: f64,
    /// True when `total` came from the creator instead of the items
    pub total_overridden: bool,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Originating device
    pub device: DeviceId,
}
