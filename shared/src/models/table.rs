//! Table Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Table number (1..N, fixed at startup)
pub type TableNumber = u32;

/// Terminal identifier attached to a table
pub type DeviceId = String;

/// Table status tag (桌台状态)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Occupied => write!(f, "occupied"),
        }
    }
}

/// Table state (桌台实时状态)
///
/// `occupied` and `status` are derived from `devices`; only the table store
/// mutates them, always through [`TableState::sync_occupancy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub number: TableNumber,
    pub occupied: bool,
    /// Attached devices, in attach order, no duplicates
    pub devices: Vec<DeviceId>,
    pub active_order_id: Option<String>,
    pub capacity: u32,
    pub label: String,
    pub status: TableStatus,
}

impl TableState {
    /// Create an available table with no devices and no order
    pub fn new(number: TableNumber, capacity: u32) -> Self {
        Self {
            number,
            occupied: false,
            devices: Vec::new(),
            active_order_id: None,
            capacity,
            label: format!("Table {}", number),
            status: TableStatus::Available,
        }
    }

    /// Re-derive `occupied` and `status` from the device set
    pub fn sync_occupancy(&mut self) {
        self.occupied = !self.devices.is_empty();
        self.status = if self.occupied {
            TableStatus::Occupied
        } else {
            TableStatus::Available
        };
    }

    pub fn has_device(&self, device: &str) -> bool {
        self.devices.iter().any(|d| d == device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_available() {
        let table = TableState::new(3, 4);
        assert_eq!(table.label, "Table 3");
        assert!(!table.occupied);
        assert_eq!(table.status, TableStatus::Available);
        assert!(table.active_order_id.is_none());
    }

    #[test]
    fn test_sync_occupancy() {
        let mut table = TableState::new(1, 4);
        table.devices.push("W1".to_string());
        table.sync_occupancy();
        assert!(table.occupied);
        assert_eq!(table.status, TableStatus::Occupied);

        table.devices.clear();
        table.sync_occupancy();
        assert!(!table.occupied);
        assert_eq!(table.status, TableStatus::Available);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(TableState::new(2, 6)).unwrap();
        assert_eq!(json["number"], 2);
        assert_eq!(json["status"], "available");
        assert_eq!(json["activeOrderId"], serde_json::Value::Null);
        assert_eq!(json["capacity"], 6);
    }
}
