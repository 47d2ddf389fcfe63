//! Transports feeding the hub
//!
//! A transport maps its connections to session ids, forwards raw inbound
//! events through [`HubHandle::submit`](crate::hub::HubHandle::submit) and
//! drains each session's outbox back to the wire.

pub mod socketio;
