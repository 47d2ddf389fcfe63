//! Floor hub core
//!
//! 单写者模型: one task owns every store and applies client events one at a
//! time. Each event yields a list of [`Dispatch`]es which the
//! [`BroadcastRouter`] delivers before the next event is taken.
//!
//! ```text
//! transport ──HubCommand──▶ actor ──▶ Hub::handle ──▶ Vec<Dispatch>
//!                                                      │
//!                           session outboxes ◀── BroadcastRouter
//! ```

pub mod actor;
pub mod floor;
mod handlers;
pub mod reconciler;
pub mod router;


pub use actor::{HubCommand, HubHandle};
pub use floor::Floor;
pub use reconciler::{DisconnectReconciler, ReconcileReport};
pub use router::{Audience, BroadcastRouter, Dispatch};

use shared::error::AppError;
use shared::message::{ClientEvent, ServerEvent, ServerStatus};

use crate::core::Config;
use crate::sessions::{ConnectionRegistry, Outbox};

#[derive(Debug)]
pub struct Hub {
    floor: Floor,
    sessions: ConnectionRegistry,
}

impl Hub {
    pub fn new(table_count: u32, table_capacity: u32) -> Self {
        tracing::info!(tables = table_count, capacity = table_capacity, "Floor initialized");
        Self {
            floor: Floor::new(table_count, table_capacity),
            sessions: ConnectionRegistry::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.table_count, config.table_capacity)
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn sessions(&self) -> &ConnectionRegistry {
        &self.sessions
    }

    pub fn status(&self) -> ServerStatus {
        self.floor.status(self.sessions.len())
    }

    /// Register a session; it receives nothing until it asks
    pub fn connect(&mut self, session_id: &str, outbox: Outbox) {
        self.sessions.register(session_id, outbox);
        tracing::info!(session_id = %session_id, sessions = self.sessions.len(), "Session connected");
    }

    /// Apply one client event
    ///
    /// Failures never touch the stores and come back as a single
    /// `operation-error` to the sender.
    pub fn handle(&mut self, session_id: &str, event: ClientEvent) -> Vec<Dispatch> {
        if !self.sessions.contains(session_id) {
            tracing::warn!(session_id = %session_id, event = event.name(), "Event from unregistered session ignored");
            return Vec::new();
        }

        let name = event.name();
        tracing::debug!(session_id = %session_id, event = name, "Handling client event");
        match self.apply(session_id, event) {
            Ok(dispatches) => dispatches,
            Err(err) => {
                tracing::warn!(
                    session_id = %session_id,
                    event = name,
                    code = err.code.code(),
                    category = err.code.category().name(),
                    error = %err,
                    "Client event rejected"
                );
                Self::reject(session_id, err)
            }
        }
    }

    /// Error reply for the sender only
    pub fn reject(session_id: &str, err: AppError) -> Vec<Dispatch> {
        vec![Dispatch::reply(
            session_id,
            ServerEvent::OperationError(err.to_payload()),
        )]
    }

    /// Reconcile a lost session and push the resulting floor to everyone else
    pub fn disconnect(&mut self, session_id: &str) -> Vec<Dispatch> {
        match DisconnectReconciler::reconcile(&mut self.floor, &mut self.sessions, session_id) {
            Some(_) => vec![Dispatch::all_except(
                session_id,
                ServerEvent::TableStates(self.floor.tables.snapshot_all()),
            )],
            None => {
                tracing::debug!(session_id = %session_id, "Disconnect for unknown session ignored");
                Vec::new()
            }
        }
    }

    /// Route dispatches to session outboxes
    pub fn deliver(&self, dispatches: Vec<Dispatch>) -> usize {
        BroadcastRouter::deliver(&self.sessions, dispatches)
    }
}
