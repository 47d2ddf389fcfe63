//! Hub task and its handle
//!
//! Transports never touch the stores; they push [`HubCommand`]s into one
//! queue and the hub task applies them in arrival order.

use serde_json::Value;
use shared::error::{AppError, AppResult};
use shared::message::{ClientEvent, ServerStatus};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::Hub;
use crate::sessions::{Outbox, OutboxReceiver, SessionId, outbox};

#[derive(Debug)]
pub enum HubCommand {
    Connect {
        session_id: SessionId,
        outbox: Outbox,
    },
    Event {
        session_id: SessionId,
        event: ClientEvent,
    },
    /// Inbound event that failed to decode; answered in queue order
    Rejected {
        session_id: SessionId,
        error: AppError,
    },
    Disconnect {
        session_id: SessionId,
    },
    Status {
        reply: oneshot::Sender<ServerStatus>,
    },
}

impl Hub {
    /// Apply a single command and deliver what it produced
    pub fn execute(&mut self, command: HubCommand) {
        let dispatches = match command {
            HubCommand::Connect { session_id, outbox } => {
                self.connect(&session_id, outbox);
                return;
            }
            HubCommand::Event { session_id, event } => self.handle(&session_id, event),
            HubCommand::Rejected { session_id, error } => {
                tracing::warn!(session_id = %session_id, error = %error, "Malformed client event");
                if self.sessions.contains(&session_id) {
                    Self::reject(&session_id, error)
                } else {
                    Vec::new()
                }
            }
            HubCommand::Disconnect { session_id } => self.disconnect(&session_id),
            HubCommand::Status { reply } => {
                let _ = reply.send(self.status());
                return;
            }
        };
        self.deliver(dispatches);
    }

    /// Consume commands until cancelled or every handle is dropped
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<HubCommand>, shutdown: CancellationToken) {
        tracing::info!("🎯 Floor hub started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Floor hub shutting down");
                    break;
                }

                command = commands.recv() => {
                    match command {
                        Some(command) => self.execute(command),
                        None => {
                            tracing::info!("Hub command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!(sessions = self.sessions.len(), "Floor hub stopped");
    }
}

/// Cloneable sender side of the hub queue
#[derive(Debug, Clone)]
pub struct HubHandle {
    tx: mpsc::UnboundedSender<HubCommand>,
}

impl HubHandle {
    /// Spawn the hub task on the current runtime
    pub fn spawn(hub: Hub, shutdown: CancellationToken) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(hub.run(rx, shutdown));
        (Self { tx }, task)
    }

    fn send(&self, command: HubCommand) -> AppResult<()> {
        self.tx.send(command).map_err(|_| AppError::hub_unavailable())
    }

    /// Register a session and get the receiving end of its outbox
    pub fn connect(&self, session_id: &str) -> AppResult<OutboxReceiver> {
        let (tx, rx) = outbox();
        self.send(HubCommand::Connect {
            session_id: session_id.to_string(),
            outbox: tx,
        })?;
        Ok(rx)
    }

    pub fn dispatch(&self, session_id: &str, event: ClientEvent) -> AppResult<()> {
        self.send(HubCommand::Event {
            session_id: session_id.to_string(),
            event,
        })
    }

    /// Decode a raw transport event and queue it
    ///
    /// Decode failures are queued too, so the error reply keeps its place
    /// among the sender's other messages.
    pub fn submit(&self, session_id: &str, name: &str, data: Value) -> AppResult<()> {
        match ClientEvent::decode(name, data) {
            Ok(event) => self.dispatch(session_id, event),
            Err(error) => self.send(HubCommand::Rejected {
                session_id: session_id.to_string(),
                error,
            }),
        }
    }

    pub fn disconnect(&self, session_id: &str) -> AppResult<()> {
        self.send(HubCommand::Disconnect {
            session_id: session_id.to_string(),
        })
    }

    pub async fn status(&self) -> AppResult<ServerStatus> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Status { reply })?;
        rx.await.map_err(|_| AppError::hub_unavailable())
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }
}
