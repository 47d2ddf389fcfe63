//! Floor hub event protocol
//!
//! 这些类型在 floor-hub 和各终端 (waiter / cashier / kitchen display) 之间共享。
//!
//! ```text
//! terminal ── ClientEvent ──▶ hub ── ServerEvent ──▶ terminals
//!             (event name,          (OutboundMessage:
//!              JSON payload)          event name + data)
//! ```

pub mod client;
pub mod server;

pub use client::{
    AddOrderItemRequest, CLIENT_EVENTS, ClientEvent, CreateOrderRequest, OrdersByStatusQuery,
    TableDevice, UpdateOrderStatusRequest,
};
pub use server::{
    Identified, OrderStatusChange, OrdersByStatus, OutboundMessage, RoomAck, ServerEvent,
    ServerStatus, TableDeviceChange, TableOrderCreated, TableStatusChange,
};

/// 协议版本号
pub const PROTOCOL_VERSION: u16 = 1;
