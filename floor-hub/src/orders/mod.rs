//! Order ledger and money arithmetic
//!
//! - **ledger**: active orders, status transitions and their notices
//! - **money**: decimal totals and input bounds

pub mod ledger;
pub mod money;

pub use ledger::{OrderLedger, StatusNotice, StatusTransition};
