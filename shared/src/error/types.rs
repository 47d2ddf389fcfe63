//! Error types and the wire error payload

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error with structured error code
///
/// Every failure of an inbound event is expressed as an `AppError` and
/// reported to the originating session only, as an [`ErrorPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    // ==================== Convenience constructors ====================

    pub fn table_not_found(table: u32) -> Self {
        Self::with_message(ErrorCode::TableNotFound, format!("Table {} not found", table))
    }

    pub fn order_not_found(order_id: &str) -> Self {
        Self::with_message(
            ErrorCode::OrderNotFound,
            format!("Order {} not found", order_id),
        )
    }

    /// Create an invalid payload error
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidPayload, msg)
    }

    pub fn unknown_event(name: &str) -> Self {
        Self::with_message(ErrorCode::UnknownEvent, format!("Unknown event '{}'", name))
    }

    pub fn hub_unavailable() -> Self {
        Self::new(ErrorCode::HubUnavailable)
    }

    /// Wire payload for the `operation-error` event
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            message: self.message.clone(),
            kind: self.code.kind().to_string(),
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Error payload sent to the originating session
///
/// ```json
/// { "message": "Table 42 not found", "kind": "table_not_found" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_payloads() {
        let payload = AppError::table_not_found(42).to_payload();
        assert_eq!(payload.kind, "table_not_found");
        assert_eq!(payload.message, "Table 42 not found");

        let payload = AppError::order_not_found("order-7").to_payload();
        assert_eq!(payload.kind, "order_not_found");
        assert!(payload.message.contains("order-7"));
    }

    #[test]
    fn test_default_message() {
        let err = AppError::new(ErrorCode::HubUnavailable);
        assert_eq!(err.to_string(), "Hub is not running");
    }

    #[test]
    fn test_payload_shape() {
        let json = serde_json::to_value(AppError::invalid_payload("bad").to_payload()).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "bad", "kind": "invalid_payload" }));
    }
}
