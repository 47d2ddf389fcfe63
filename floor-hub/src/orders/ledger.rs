//! 订单账本 (OrderLedger)
//!
//! Insertion-ordered store of active orders keyed by id. Ids come from a
//! monotonic counter, so two orders created in the same instant never
//! collide.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use shared::error::{AppError, AppResult};
use shared::models::{DeviceId, Order, OrderId, OrderItem, OrderStatus, TableNumber};

use super::money;

/// Side notification raised by a status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusNotice {
    /// pending -> preparing
    SentToKitchen,
    /// preparing -> ready
    ReadyForPayment,
}

impl StatusNotice {
    pub fn for_transition(previous: OrderStatus, next: OrderStatus) -> Option<Self> {
        match (previous, next) {
            (OrderStatus::Pending, OrderStatus::Preparing) => Some(Self::SentToKitchen),
            (OrderStatus::Preparing, OrderStatus::Ready) => Some(Self::ReadyForPayment),
            _ => None,
        }
    }
}

/// Outcome of [`OrderLedger::transition`]
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub order: Order,
    pub previous: OrderStatus,
    pub notice: Option<StatusNotice>,
}

#[derive(Debug, Default)]
pub struct OrderLedger {
    next_seq: u64,
    /// seq -> order, iteration order == creation order
    entries: BTreeMap<u64, Order>,
    index: HashMap<OrderId, u64>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, order_id: &str) -> Option<&Order> {
        self.index.get(order_id).and_then(|seq| self.entries.get(seq))
    }

    fn get_mut(&mut self, order_id: &str) -> AppResult<&mut Order> {
        self.index
            .get(order_id)
            .and_then(|seq| self.entries.get_mut(seq))
            .ok_or_else(|| AppError::order_not_found(order_id))
    }

    /// Create a pending order
    ///
    /// The total is the sum of priced lines unless `total` is given, in which
    /// case it is taken as is and flagged as overridden. The caller checks
    /// that `table` exists.
    pub fn create(
        &mut self,
        table: TableNumber,
        items: Vec<OrderItem>,
        total: Option<f64>,
        device: DeviceId,
    ) -> AppResult<Order> {
        for item in &items {
            money::validate_item(item)?;
        }
        if let Some(total) = total {
            money::validate_total(total)?;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        let (total, total_overridden) = match total {
            Some(explicit) => (money::to_f64(money::to_decimal(explicit)), true),
            None => (money::items_total(&items), false),
        };

        let order = Order {
            id: format!("order-{}", seq),
            table,
            items,
            total,
            total_overridden,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            device,
        };

        self.index.insert(order.id.clone(), seq);
        self.entries.insert(seq, order.clone());
        tracing::debug!(order_id = %order.id, table, total = order.total, "Order created");
        Ok(order)
    }

    /// Append an item; priced items raise the total, overridden or not
    pub fn add_item(&mut self, order_id: &str, item: OrderItem) -> AppResult<Order> {
        money::validate_item(&item)?;
        let order = self.get_mut(order_id)?;
        order.total = money::add_line(order.total, &item);
        order.items.push(item);
        Ok(order.clone())
    }

    /// Set the status; any transition is allowed
    pub fn transition(&mut self, order_id: &str, status: OrderStatus) -> AppResult<StatusTransition> {
        let order = self.get_mut(order_id)?;
        let previous = order.status;
        order.status = status;
        Ok(StatusTransition {
            order: order.clone(),
            previous,
            notice: StatusNotice::for_transition(previous, status),
        })
    }

    pub fn remove(&mut self, order_id: &str) -> Option<Order> {
        let seq = self.index.remove(order_id)?;
        self.entries.remove(&seq)
    }

    /// Orders in `status`, creation order
    pub fn query_by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.entries
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect()
    }
}
