//! Shared types for the floor hub
//!
//! Floor state models, the event protocol and error types used by the hub
//! and by terminal clients.

pub mod error;
pub mod message;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode, ErrorPayload};
pub use message::{ClientEvent, OutboundMessage, PROTOCOL_VERSION, ServerEvent};
pub use models::{Order, OrderId, OrderItem, OrderStatus, Role, TableNumber, TableState};
