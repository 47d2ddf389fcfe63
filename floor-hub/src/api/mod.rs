//! HTTP API
//!
//! Only operational endpoints; floor traffic goes over Socket.IO.

pub mod health;

use axum::{Router, routing::get};

use crate::hub::HubHandle;

pub fn router(hub: HubHandle) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .with_state(hub)
}
