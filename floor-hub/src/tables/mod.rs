//! 桌台状态存储 (TableStore)
//!
//! Canonical table number → [`TableState`] mapping. Owns occupancy, the
//! attached device set and the active order reference; knows nothing about
//! the protocol or the order ledger.
//!
//! # 不变量
//!
//! - `occupied == !devices.is_empty()`, `status` follows `occupied`
//! - a device appears at most once per table
//! - a freed table never keeps an active order reference

use std::collections::BTreeMap;

use shared::error::{AppError, AppResult};
use shared::models::{Order, OrderId, TableNumber, TableState};

/// Result of detaching a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detached {
    pub state: TableState,
    /// Active order dropped because the table became free; the caller must
    /// remove it from the ledger
    pub retired_order: Option<OrderId>,
}

/// Table store, iterated in table number order
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: BTreeMap<TableNumber, TableState>,
}

impl TableStore {
    /// Populate tables `1..=count`, all available
    pub fn initialize(count: u32, capacity: u32) -> Self {
        let tables = (1..=count)
            .map(|number| (number, TableState::new(number, capacity)))
            .collect();
        Self { tables }
    }

    pub fn get(&self, number: TableNumber) -> Option<&TableState> {
        self.tables.get(&number)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn get_mut(&mut self, number: TableNumber) -> AppResult<&mut TableState> {
        self.tables
            .get_mut(&number)
            .ok_or_else(|| AppError::table_not_found(number))
    }

    /// Attach a device (idempotent) and mark the table occupied
    pub fn attach_device(&mut self, number: TableNumber, device: &str) -> AppResult<TableState> {
        let table = self.get_mut(number)?;
        if !table.has_device(device) {
            table.devices.push(device.to_string());
        }
        table.sync_occupancy();
        Ok(table.clone())
    }

    /// Detach a device; frees the table when it was the last one
    ///
    /// Freeing clears the active order reference and reports it in
    /// [`Detached::retired_order`]. Detaching a device that is not attached
    /// is not an error.
    pub fn detach_device(&mut self, number: TableNumber, device: &str) -> AppResult<Detached> {
        let table = self.get_mut(number)?;
        table.devices.retain(|d| d != device);
        table.sync_occupancy();

        let retired_order = if table.occupied {
            None
        } else {
            table.active_order_id.take()
        };

        Ok(Detached {
            state: table.clone(),
            retired_order,
        })
    }

    /// Point the table at `order`, replacing any previous reference
    pub fn set_active_order(&mut self, number: TableNumber, order: &Order) -> AppResult<TableState> {
        debug_assert_eq!(order.table, number, "order belongs to another table");
        let table = self.get_mut(number)?;
        table.active_order_id = Some(order.id.clone());
        Ok(table.clone())
    }

    /// Clear the active order only if it is still `order_id`
    ///
    /// Returns whether a reference was cleared. A newer order that replaced
    /// `order_id` is left untouched.
    pub fn clear_active_order_if_matches(&mut self, number: TableNumber, order_id: &str) -> bool {
        match self.tables.get_mut(&number) {
            Some(table) if table.active_order_id.as_deref() == Some(order_id) => {
                table.active_order_id = None;
                true
            }
            _ => false,
        }
    }

    /// Full snapshot ordered by table number
    pub fn snapshot_all(&self) -> Vec<TableState> {
        self.tables.values().cloned().collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.tables.values().filter(|t| t.occupied).count()
    }

    /// Tables that currently have `device` attached
    pub fn tables_with_device(&self, device: &str) -> Vec<TableNumber> {
        self.tables
            .values()
            .filter(|t| t.has_device(device))
            .map(|t| t.number)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderStatus, TableStatus};

    fn order_for(table: TableNumber, id: &str) -> Order {
        Order {
            id: id.to_string(),
            table,
            items: vec![],
            total: 0.0,
            total_overridden: false,
            status: OrderStatus::Pending,
            created_at: chrono::Utc::now(),
            device: "W1".to_string(),
        }
    }

    fn assert_occupancy_invariant(store: &TableStore) {
        for table in store.snapshot_all() {
            assert_eq!(table.occupied, !table.devices.is_empty());
            let expected = if table.occupied {
                TableStatus::Occupied
            } else {
                TableStatus::Available
            };
            assert_eq!(table.status, expected);
        }
    }

    #[test]
    fn test_initialize() {
        let store = TableStore::initialize(20, 4);
        assert_eq!(store.len(), 20);
        let snapshot = store.snapshot_all();
        assert_eq!(snapshot.first().map(|t| t.number), Some(1));
        assert_eq!(snapshot.last().map(|t| t.number), Some(20));
        assert!(snapshot.iter().all(|t| !t.occupied && t.capacity == 4));
        assert_eq!(store.occupied_count(), 0);
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut store = TableStore::initialize(5, 4);
        store.attach_device(3, "W1").unwrap();
        let state = store.attach_device(3, "W1").unwrap();
        assert_eq!(state.devices, vec!["W1".to_string()]);
        assert!(state.occupied);
        assert_eq!(state.status, TableStatus::Occupied);
        assert_occupancy_invariant(&store);
    }

    #[test]
    fn test_attach_keeps_insertion_order() {
        let mut store = TableStore::initialize(5, 4);
        store.attach_device(2, "W2").unwrap();
        store.attach_device(2, "W1").unwrap();
        let state = store.attach_device(2, "K1").unwrap();
        assert_eq!(state.devices, vec!["W2", "W1", "K1"]);
    }

    #[test]
    fn test_attach_unknown_table() {
        let mut store = TableStore::initialize(5, 4);
        let err = store.attach_device(6, "W1").unwrap_err();
        assert_eq!(err.to_payload().kind, "table_not_found");
        assert!(store.attach_device(0, "W1").is_err());
    }

    #[test]
    fn test_detach_last_device_frees_table_and_retires_order() {
        let mut store = TableStore::initialize(5, 4);
        store.attach_device(3, "W1").unwrap();
        store.set_active_order(3, &order_for(3, "order-1")).unwrap();

        let detached = store.detach_device(3, "W1").unwrap();
        assert!(!detached.state.occupied);
        assert_eq!(detached.state.status, TableStatus::Available);
        assert!(detached.state.active_order_id.is_none());
        assert_eq!(detached.retired_order.as_deref(), Some("order-1"));
        assert_occupancy_invariant(&store);
    }

    #[test]
    fn test_detach_with_remaining_devices_keeps_order() {
        let mut store = TableStore::initialize(5, 4);
        store.attach_device(1, "W1").unwrap();
        store.attach_device(1, "W2").unwrap();
        store.set_active_order(1, &order_for(1, "order-1")).unwrap();

        let detached = store.detach_device(1, "W1").unwrap();
        assert!(detached.state.occupied);
        assert_eq!(detached.state.devices, vec!["W2"]);
        assert_eq!(detached.state.active_order_id.as_deref(), Some("order-1"));
        assert!(detached.retired_order.is_none());
    }

    #[test]
    fn test_detach_absent_device_is_noop() {
        let mut store = TableStore::initialize(5, 4);
        let detached = store.detach_device(4, "ghost").unwrap();
        assert!(!detached.state.occupied);
        assert!(detached.retired_order.is_none());
        assert!(store.detach_device(9, "ghost").is_err());
    }

    #[test]
    fn test_set_active_order_replaces_previous() {
        let mut store = TableStore::initialize(5, 4);
        store.set_active_order(2, &order_for(2, "order-1")).unwrap();
        let state = store.set_active_order(2, &order_for(2, "order-2")).unwrap();
        assert_eq!(state.active_order_id.as_deref(), Some("order-2"));
    }

    #[test]
    fn test_clear_active_order_if_matches() {
        let mut store = TableStore::initialize(5, 4);
        store.set_active_order(2, &order_for(2, "order-1")).unwrap();
        store.set_active_order(2, &order_for(2, "order-2")).unwrap();

        // stale id leaves the newer order in place
        assert!(!store.clear_active_order_if_matches(2, "order-1"));
        assert_eq!(
            store.get(2).unwrap().active_order_id.as_deref(),
            Some("order-2")
        );

        assert!(store.clear_active_order_if_matches(2, "order-2"));
        assert!(store.get(2).unwrap().active_order_id.is_none());
        assert!(!store.clear_active_order_if_matches(42, "order-2"));
    }

    #[test]
    fn test_tables_with_device() {
        let mut store = TableStore::initialize(5, 4);
        store.attach_device(1, "W1").unwrap();
        store.attach_device(4, "W1").unwrap();
        store.attach_device(4, "W2").unwrap();
        assert_eq!(store.tables_with_device("W1"), vec![1, 4]);
        assert_eq!(store.tables_with_device("W2"), vec![4]);
        assert!(store.tables_with_device("W3").is_empty());
        assert_eq!(store.occupied_count(), 2);
    }
}
