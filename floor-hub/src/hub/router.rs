//! 广播路由 (BroadcastRouter)
//!
//! Turns `(audience, event)` pairs into per-session outbox sends. Each event
//! is serialized once and shared between recipients.

use std::sync::Arc;

use shared::message::ServerEvent;

use crate::sessions::{ConnectionRegistry, Session, SessionId};

/// Who receives an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every registered session
    Global,
    /// Sessions subscribed to the room
    Room(String),
    /// Everyone but the sender
    AllExcept(SessionId),
    /// Reply to a single session
    Session(SessionId),
}

/// Event addressed to an audience
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub audience: Audience,
    pub event: ServerEvent,
}

impl Dispatch {
    pub fn global(event: ServerEvent) -> Self {
        Self {
            audience: Audience::Global,
            event,
        }
    }

    pub fn room(room: impl Into<String>, event: ServerEvent) -> Self {
        Self {
            audience: Audience::Room(room.into()),
            event,
        }
    }

    pub fn all_except(session_id: &str, event: ServerEvent) -> Self {
        Self {
            audience: Audience::AllExcept(session_id.to_string()),
            event,
        }
    }

    pub fn reply(session_id: &str, event: ServerEvent) -> Self {
        Self {
            audience: Audience::Session(session_id.to_string()),
            event,
        }
    }
}

pub struct BroadcastRouter;

impl BroadcastRouter {
    /// Sessions an audience resolves to right now
    pub fn resolve<'a>(registry: &'a ConnectionRegistry, audience: &Audience) -> Vec<&'a Session> {
        match audience {
            Audience::Global => registry.iter().collect(),
            Audience::Room(room) => registry.members(room).collect(),
            Audience::AllExcept(sender) => registry.iter().filter(|s| &s.id != sender).collect(),
            Audience::Session(id) => registry.get(id).into_iter().collect(),
        }
    }

    /// Deliver dispatches in order; returns the number of queued messages
    ///
    /// Sessions whose transport already went away are skipped; their
    /// disconnect is on its way through the hub queue.
    pub fn deliver(registry: &ConnectionRegistry, dispatches: Vec<Dispatch>) -> usize {
        let mut queued = 0;
        for dispatch in dispatches {
            let msg = match dispatch.event.to_outbound() {
                Ok(msg) => Arc::new(msg),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize outbound event");
                    continue;
                }
            };
            for session in Self::resolve(registry, &dispatch.audience) {
                if session.send(Arc::clone(&msg)) {
                    queued += 1;
                } else {
                    tracing::debug!(session_id = %session.id, event = %msg.event, "Outbox closed, dropping message");
                }
            }
        }
        queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::{OutboxReceiver, outbox};
    use shared::message::RoomAck;

    fn setup(ids: &[&str]) -> (ConnectionRegistry, Vec<OutboxReceiver>) {
        let mut registry = ConnectionRegistry::new();
        let rx = ids
            .iter()
            .map(|id| {
                let (tx, rx) = outbox();
                registry.register(id, tx);
                rx
            })
            .collect();
        (registry, rx)
    }

    fn drain(rx: &mut OutboxReceiver) -> Vec<String> {
        let mut names = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            names.push(msg.event.clone());
        }
        names
    }

    #[test]
    fn test_resolve_audiences() {
        let (mut registry, _rx) = setup(&["a", "b", "c"]);
        registry.join("b", "cashier");

        let ids = |audience: Audience| {
            let mut ids: Vec<_> = BroadcastRouter::resolve(&registry, &audience)
                .into_iter()
                .map(|s| s.id.clone())
                .collect();
            ids.sort();
            ids
        };

        assert_eq!(ids(Audience::Global), vec!["a", "b", "c"]);
        assert_eq!(ids(Audience::Room("cashier".into())), vec!["b"]);
        assert_eq!(ids(Audience::Room("kitchen".into())), Vec::<String>::new());
        assert_eq!(ids(Audience::AllExcept("a".into())), vec!["b", "c"]);
        assert_eq!(ids(Audience::Session("c".into())), vec!["c"]);
        assert!(ids(Audience::Session("ghost".into())).is_empty());
    }

    #[test]
    fn test_deliver_preserves_order_per_session() {
        let (registry, mut rx) = setup(&["a", "b"]);
        let queued = BroadcastRouter::deliver(
            &registry,
            vec![
                Dispatch::global(ServerEvent::TableStates(vec![])),
                Dispatch::reply(
                    "a",
                    ServerEvent::JoinedRoom(RoomAck {
                        room: "kitchen".into(),
                        success: true,
                    }),
                ),
                Dispatch::global(ServerEvent::TableStatesUpdated(vec![])),
            ],
        );
        assert_eq!(queued, 5);
        assert_eq!(
            drain(&mut rx[0]),
            vec!["table-states", "joined-room", "table-states-updated"]
        );
        assert_eq!(drain(&mut rx[1]), vec!["table-states", "table-states-updated"]);
    }

    #[test]
    fn test_deliver_skips_closed_outbox() {
        let (registry, mut rx) = setup(&["a", "b"]);
        drop(rx.remove(0));
        let queued =
            BroadcastRouter::deliver(&registry, vec![Dispatch::global(ServerEvent::TableStates(vec![]))]);
        assert_eq!(queued, 1);
        assert_eq!(drain(&mut rx[0]), vec!["table-states"]);
    }
}
