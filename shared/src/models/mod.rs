//! Floor state models shared by the hub and its terminals

pub mod order;
pub mod role;
pub mod table;

pub use order::{Order, OrderId, OrderItem, OrderStatus};
pub use role::Role;
pub use table::{DeviceId, TableNumber, TableState, TableStatus};
