//! Unified error system for the floor hub
//!
//! - [`ErrorCode`]: Standardized error codes
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Error type with code and message
//! - [`ErrorPayload`]: Wire shape sent to the originating session
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::table_not_found(42);
//! assert_eq!(err.code, ErrorCode::TableNotFound);
//! assert_eq!(err.to_payload().kind, "table_not_found");
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorPayload};
