//! Socket.IO transport (namespace `/`)
//!
//! Handlers submit to the hub queue in their synchronous body and return a
//! ready future. socketioxide spawns that future, so submitting from inside
//! it could reorder two rapid events from the same socket.

use serde_json::Value;
use shared::message::CLIENT_EVENTS;
use socketioxide::SocketIo;
use socketioxide::extract::{SocketRef, TryData};
use socketioxide::layer::SocketIoLayer;
use socketioxide::socket::DisconnectReason;

use crate::hub::HubHandle;
use crate::sessions::OutboxReceiver;

/// Build the Socket.IO layer bound to `hub`
pub fn layer(hub: HubHandle) -> SocketIoLayer {
    let (layer, io) = SocketIo::new_layer();
    io.ns("/", move |socket: SocketRef| {
        on_connect(socket, hub.clone());
        async {}
    });
    layer
}

fn on_connect(socket: SocketRef, hub: HubHandle) {
    let session_id = socket.id.to_string();
    let outbox = match hub.connect(&session_id) {
        Ok(rx) => rx,
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Rejecting socket, hub unavailable");
            return;
        }
    };
    tracing::debug!(session_id = %session_id, "Socket connected");

    tokio::spawn(forward_outbound(socket.clone(), outbox));

    for &name in CLIENT_EVENTS {
        let hub = hub.clone();
        socket.on(name, move |socket: SocketRef, TryData(data): TryData<Value>| {
            // payload-less emits arrive as a parse error
            let data = data.unwrap_or(Value::Null);
            if let Err(e) = hub.submit(&socket.id.to_string(), name, data) {
                tracing::warn!(event = name, error = %e, "Dropping inbound event");
            }
            async {}
        });
    }

    socket.on_disconnect(move |socket: SocketRef, reason: DisconnectReason| {
        let session_id = socket.id.to_string();
        tracing::info!(session_id = %session_id, reason = ?reason, "Socket disconnected");
        if let Err(e) = hub.disconnect(&session_id) {
            tracing::warn!(session_id = %session_id, error = %e, "Disconnect not delivered");
        }
        async {}
    });
}

/// Emit a session's outbound messages in order until either side closes
async fn forward_outbound(socket: SocketRef, mut outbox: OutboxReceiver) {
    while let Some(msg) = outbox.recv().await {
        if let Err(e) = socket.emit(msg.event.as_str(), &msg.data) {
            tracing::debug!(session_id = %socket.id, event = %msg.event, error = %e, "Emit failed, stopping forwarder");
            break;
        }
    }
}
