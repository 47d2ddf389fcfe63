//! Outbound protocol (hub -> terminals)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorPayload;
use crate::models::{DeviceId, Order, OrderId, OrderStatus, TableNumber, TableState};

/// `identified` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identified {
    pub success: bool,
    pub message: String,
    pub profile: Value,
    pub protocol_version: u16,
}

/// Hub counters (`server-status`, also served on `/health`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub connected_sessions: usize,
    pub occupied_tables: usize,
    pub active_orders: usize,
}

/// `joined-room` / `left-room` ack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAck {
    pub room: String,
    pub success: bool,
}

/// `table-selected` / `table-released`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDeviceChange {
    pub table: TableNumber,
    pub device: DeviceId,
    pub state: TableState,
}

/// `table-status-changed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStatusChange {
    pub number: TableNumber,
    pub occupied: bool,
    pub devices: Vec<DeviceId>,
}

impl From<&TableState> for TableStatusChange {
    fn from(state: &TableState) -> Self {
        Self {
            number: state.number,
            occupied: state.occupied,
            devices: state.devices.clone(),
        }
    }
}

/// `table-order-created`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOrderCreated {
    pub order: Order,
    pub table: TableState,
}

/// `order-status-changed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChange {
    pub order_id: OrderId,
    pub new_status: OrderStatus,
    pub previous_status: OrderStatus,
    pub order: Order,
}

/// `orders-by-status` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersByStatus {
    pub status: OrderStatus,
    pub orders: Vec<Order>,
}

/// Closed set of outbound events
///
/// Serialized adjacently tagged; [`ServerEvent::to_outbound`] splits the tag
/// into the transport event name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    Identified(Identified),
    ServerStatus(ServerStatus),
    JoinedRoom(RoomAck),
    LeftRoom(RoomAck),
    /// Full table snapshot
    TableStates(Vec<TableState>),
    /// Same snapshot under the name older displays listen to
    TableStatesUpdated(Vec<TableState>),
    TableSelected(TableDeviceChange),
    TableReleased(TableDeviceChange),
    TableStatusChanged(TableStatusChange),
    TableOrderCreated(TableOrderCreated),
    OrderCreated(Order),
    OrderStatusChanged(OrderStatusChange),
    OrderUpdated(Order),
    /// pending -> preparing
    KitchenNewOrder(Order),
    /// preparing -> ready
    OrderReadyForPayment(Order),
    OrdersByStatus(OrdersByStatus),
    OperationError(ErrorPayload),
    // Peer relays, payload passed through untouched
    WaiterSubmitOrder(Value),
    CashierReply(Value),
    SpecialOrderNew(Value),
    PaymentMade(Value),
    SpecialOrderCancelled(Value),
}

/// Event name + JSON payload, ready for a transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl ServerEvent {
    /// Split into transport event name and payload
    pub fn to_outbound(&self) -> Result<OutboundMessage, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}

impl OutboundMessage {
    /// Decode back into a typed event (terminal side / tests)
    pub fn to_event(&self) -> Result<ServerEvent, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outbound_names() {
        let cases = [
            (ServerEvent::TableStates(vec![]), "table-states"),
            (ServerEvent::TableStatesUpdated(vec![]), "table-states-updated"),
            (ServerEvent::KitchenNewOrder(sample_order()), "kitchen-new-order"),
            (
                ServerEvent::OrderReadyForPayment(sample_order()),
                "order-ready-for-payment",
            ),
            (ServerEvent::PaymentMade(json!({ "amount": 10 })), "payment-made"),
        ];
        for (event, name) in cases {
            assert_eq!(event.to_outbound().unwrap().event, name);
        }
    }

    #[test]
    fn test_outbound_payload_is_untagged() {
        let msg = ServerEvent::OperationError(ErrorPayload {
            message: "Table 99 not found".into(),
            kind: "table_not_found".into(),
        })
        .to_outbound()
        .unwrap();
        assert_eq!(msg.event, "operation-error");
        assert_eq!(
            msg.data,
            json!({ "message": "Table 99 not found", "kind": "table_not_found" })
        );
    }

    #[test]
    fn test_relay_payload_passthrough() {
        let payload = json!({ "ticket": 12, "items": ["ceviche"] });
        let msg = ServerEvent::SpecialOrderNew(payload.clone())
            .to_outbound()
            .unwrap();
        assert_eq!(msg.data, payload);
        assert_eq!(
            msg.to_event().unwrap(),
            ServerEvent::SpecialOrderNew(payload)
        );
    }

    #[test]
    fn test_status_change_camel_case() {
        let msg = ServerEvent::OrderStatusChanged(OrderStatusChange {
            order_id: "order-1".into(),
            new_status: OrderStatus::Preparing,
            previous_status: OrderStatus::Pending,
            order: sample_order(),
        })
        .to_outbound()
        .unwrap();
        assert_eq!(msg.data["orderId"], "order-1");
        assert_eq!(msg.data["newStatus"], "preparing");
        assert_eq!(msg.data["previousStatus"], "pending");
    }

    fn sample_order() -> Order {
        Order {
            id: "order-1".into(),
            table: 1,
            items: vec![],
            total: 0.0,
            total_overridden: false,
            status: OrderStatus::Pending,
            created_at: chrono::Utc::now(),
            device: "W1".into(),
        }
    }
}
