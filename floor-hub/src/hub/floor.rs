//! Table store + order ledger, kept mutually consistent
//!
//! Every path that can drop an order or free a table goes through here so
//! the `activeOrderId` reference and the ledger never disagree.

use shared::error::{AppError, AppResult};
use shared::message::ServerStatus;
use shared::models::{Order, OrderId, OrderItem, TableNumber, TableState};

use crate::orders::OrderLedger;
use crate::tables::TableStore;

#[derive(Debug)]
pub struct Floor {
    pub tables: TableStore,
    pub orders: OrderLedger,
}

impl Floor {
    pub fn new(table_count: u32, table_capacity: u32) -> Self {
        Self {
            tables: TableStore::initialize(table_count, table_capacity),
            orders: OrderLedger::new(),
        }
    }

    /// Detach a device, retiring the table's order if the table is freed
    pub fn detach_device(&mut self, table: TableNumber, device: &str) -> AppResult<TableState> {
        let detached = self.tables.detach_device(table, device)?;
        if let Some(order_id) = detached.retired_order {
            self.retire_order(&order_id);
        }
        Ok(detached.state)
    }

    /// Drop an order from the ledger and from its table, if still referenced
    pub fn retire_order(&mut self, order_id: &str) -> Option<Order> {
        let order = self.orders.remove(order_id)?;
        self.tables.clear_active_order_if_matches(order.table, order_id);
        tracing::info!(order_id = %order_id, table = order.table, "Order retired with its table");
        Some(order)
    }

    /// Create an order and make it the table's active order
    ///
    /// An order previously active on the table stays in the ledger and can
    /// still be addressed by id.
    pub fn open_order(
        &mut self,
        table: TableNumber,
        items: Vec<OrderItem>,
        total: Option<f64>,
        device: String,
    ) -> AppResult<(Order, TableState)> {
        if self.tables.get(table).is_none() {
            return Err(AppError::table_not_found(table));
        }
        let order = self.orders.create(table, items, total, device)?;
        let state = self.tables.set_active_order(table, &order)?;
        Ok((order, state))
    }

    pub fn active_order_of(&self, table: TableNumber) -> Option<&OrderId> {
        self.tables.get(table).and_then(|t| t.active_order_id.as_ref())
    }

    pub fn status(&self, connected_sessions: usize) -> ServerStatus {
        ServerStatus {
            connected_sessions,
            occupied_tables: self.tables.occupied_count(),
            active_orders: self.orders.len(),
        }
    }
}
