//! Error codes for the floor hub protocol
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire; [`ErrorCode::kind`] gives the snake_case
/// tag that clients match on in `operation-error` payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Payload could not be decoded or failed validation
    InvalidPayload = 2,
    /// Event name is not part of the protocol
    UnknownEvent = 3,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Hub actor is no longer running
    HubUnavailable = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Wire tag used in the `kind` field of error payloads
    pub const fn kind(&self) -> &'static str {
        match self {
            ErrorCode::Success => "success",
            ErrorCode::Unknown => "unknown",
            ErrorCode::InvalidPayload | ErrorCode::UnknownEvent => "invalid_payload",
            ErrorCode::OrderNotFound => "order_not_found",
            ErrorCode::TableNotFound => "table_not_found",
            ErrorCode::InternalError | ErrorCode::HubUnavailable => "internal_error",
        }
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::InvalidPayload => "Invalid payload",
            ErrorCode::UnknownEvent => "Unknown event",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::HubUnavailable => "Hub is not running",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::InvalidPayload),
            3 => Ok(ErrorCode::UnknownEvent),
            4001 => Ok(ErrorCode::OrderNotFound),
            7001 => Ok(ErrorCode::TableNotFound),
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::HubUnavailable),
            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(ErrorCode::TableNotFound.kind(), "table_not_found");
        assert_eq!(ErrorCode::OrderNotFound.kind(), "order_not_found");
        assert_eq!(ErrorCode::InvalidPayload.kind(), "invalid_payload");
        assert_eq!(ErrorCode::UnknownEvent.kind(), "invalid_payload");
    }

    #[test]
    fn test_u16_conversion() {
        for code in [
            ErrorCode::Success,
            ErrorCode::InvalidPayload,
            ErrorCode::OrderNotFound,
            ErrorCode::TableNotFound,
            ErrorCode::HubUnavailable,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableNotFound).unwrap();
        assert_eq!(json, "7001");
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);
    }
}
