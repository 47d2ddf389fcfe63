//! Inbound protocol (terminal -> hub)

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{DeviceId, OrderId, OrderItem, OrderStatus, Role, TableNumber};

/// Every inbound event name, in protocol order
pub const CLIENT_EVENTS: &[&str] = &[
    "identify",
    "set-role",
    "join-room",
    "leave-room",
    "get-table-states",
    "select-table",
    "release-table",
    "create-order",
    "update-order-status",
    "add-order-item",
    "get-orders-by-status",
    "waiter-submit-order",
    "cashier-reply",
    "special-order-new",
    "payment-made",
    "special-order-cancelled",
];

/// `select-table` / `release-table` payload
///
/// `device` defaults to the sending session's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDevice {
    pub table: TableNumber,
    #[serde(default)]
    pub device: Option<DeviceId>,
}

/// `create-order` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub table: TableNumber,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Explicit total; when present the items are not summed
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub device: Option<DeviceId>,
}

/// `update-order-status` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// `add-order-item` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderItemRequest {
    pub order_id: OrderId,
    pub item: OrderItem,
}

/// `get-orders-by-status` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersByStatusQuery {
    pub status: OrderStatus,
}

/// Closed set of inbound events, one variant per protocol event name
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Free-form terminal profile
    Identify(Value),
    /// `None` clears the role without leaving any room
    SetRole(Option<Role>),
    JoinRoom(String),
    LeaveRoom(String),
    GetTableStates,
    SelectTable(TableDevice),
    ReleaseTable(TableDevice),
    CreateOrder(CreateOrderRequest),
    UpdateOrderStatus(UpdateOrderStatusRequest),
    AddOrderItem(AddOrderItemRequest),
    GetOrdersByStatus(OrdersByStatusQuery),
    WaiterSubmitOrder(Value),
    CashierReply(Value),
    SpecialOrderNew(Value),
    PaymentMade(Value),
    SpecialOrderCancelled(Value),
}

fn parse<T: DeserializeOwned>(event: &str, data: Value) -> AppResult<T> {
    serde_json::from_value(data)
        .map_err(|e| AppError::invalid_payload(format!("Invalid '{}' payload: {}", event, e)))
}

impl ClientEvent {
    /// Decode an inbound event from its name and raw JSON payload
    ///
    /// Unknown names and shapes that do not match the event's payload type
    /// are rejected; nothing reaches the stores unless it decodes.
    pub fn decode(event: &str, data: Value) -> AppResult<Self> {
        let decoded = match event {
            "identify" => Self::Identify(data),
            "set-role" => {
                let role: Option<String> = parse(event, data)?;
                Self::SetRole(role.filter(|r| !r.is_empty()).map(Role::from))
            }
            "join-room" => Self::JoinRoom(parse(event, data)?),
            "leave-room" => Self::LeaveRoom(parse(event, data)?),
            "get-table-states" => Self::GetTableStates,
            "select-table" => Self::SelectTable(parse(event, data)?),
            "release-table" => Self::ReleaseTable(parse(event, data)?),
            "create-order" => Self::CreateOrder(parse(event, data)?),
            "update-order-status" => Self::UpdateOrderStatus(parse(event, data)?),
            "add-order-item" => Self::AddOrderItem(parse(event, data)?),
            "get-orders-by-status" => Self::GetOrdersByStatus(parse(event, data)?),
            "waiter-submit-order" => Self::WaiterSubmitOrder(data),
            "cashier-reply" => Self::CashierReply(data),
            "special-order-new" => Self::SpecialOrderNew(data),
            "payment-made" => Self::PaymentMade(data),
            "special-order-cancelled" => Self::SpecialOrderCancelled(data),
            other => return Err(AppError::unknown_event(other)),
        };
        Ok(decoded)
    }

    /// Protocol name of this event
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identify(_) => "identify",
            Self::SetRole(_) => "set-role",
            Self::JoinRoom(_) => "join-room",
            Self::LeaveRoom(_) => "leave-room",
            Self::GetTableStates => "get-table-states",
            Self::SelectTable(_) => "select-table",
            Self::ReleaseTable(_) => "release-table",
            Self::CreateOrder(_) => "create-order",
            Self::UpdateOrderStatus(_) => "update-order-status",
            Self::AddOrderItem(_) => "add-order-item",
            Self::GetOrdersByStatus(_) => "get-orders-by-status",
            Self::WaiterSubmitOrder(_) => "waiter-submit-order",
            Self::CashierReply(_) => "cashier-reply",
            Self::SpecialOrderNew(_) => "special-order-new",
            Self::PaymentMade(_) => "payment-made",
            Self::SpecialOrderCancelled(_) => "special-order-cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_decode_select_table() {
        let event =
            ClientEvent::decode("select-table", json!({ "table": 3, "device": "W1" })).unwrap();
        assert_eq!(
            event,
            ClientEvent::SelectTable(TableDevice {
                table: 3,
                device: Some("W1".to_string()),
            })
        );
    }

    #[test]
    fn test_decode_create_order_defaults() {
        let event = ClientEvent::decode("create-order", json!({ "table": 5 })).unwrap();
        match event {
            ClientEvent::CreateOrder(req) => {
                assert_eq!(req.table, 5);
                assert!(req.items.is_empty());
                assert!(req.total.is_none());
                assert!(req.device.is_none());
            }
            other => panic!("Expected CreateOrder, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_status_update_camel_case() {
        let event = ClientEvent::decode(
            "update-order-status",
            json!({ "orderId": "order-1", "status": "preparing" }),
        )
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::UpdateOrderStatus(UpdateOrderStatusRequest {
                order_id: "order-1".to_string(),
                status: OrderStatus::Preparing,
            })
        );
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let err = ClientEvent::decode(
            "update-order-status",
            json!({ "orderId": "order-1", "status": "eaten" }),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPayload);
    }

    #[test]
    fn test_decode_rejects_malformed_shape() {
        let err = ClientEvent::decode("select-table", json!("table three")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPayload);
        assert!(err.message.contains("select-table"));
    }

    #[test]
    fn test_decode_unknown_event() {
        let err = ClientEvent::decode("teleport", Value::Null).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownEvent);
    }

    #[test]
    fn test_decode_set_role() {
        assert_eq!(
            ClientEvent::decode("set-role", json!("waiter")).unwrap(),
            ClientEvent::SetRole(Some(Role::Waiter))
        );
        assert_eq!(
            ClientEvent::decode("set-role", Value::Null).unwrap(),
            ClientEvent::SetRole(None)
        );
        assert_eq!(
            ClientEvent::decode("set-role", json!("")).unwrap(),
            ClientEvent::SetRole(None)
        );
    }

    #[test]
    fn test_payloadless_events_ignore_data() {
        assert_eq!(
            ClientEvent::decode("get-table-states", Value::Null).unwrap(),
            ClientEvent::GetTableStates
        );
    }

    #[test]
    fn test_every_name_round_trips() {
        for name in CLIENT_EVENTS {
            let data = match *name {
                "set-role" => json!("waiter"),
                "join-room" | "leave-room" => json!("kitchen"),
                "select-table" | "release-table" => json!({ "table": 1 }),
                "create-order" => json!({ "table": 1 }),
                "update-order-status" => json!({ "orderId": "o", "status": "ready" }),
                "add-order-item" => json!({ "orderId": "o", "item": {} }),
                "get-orders-by-status" => json!({ "status": "pending" }),
                _ => json!({}),
            };
            let event = ClientEvent::decode(name, data).unwrap();
            assert_eq!(event.name(), *name);
        }
    }
}
