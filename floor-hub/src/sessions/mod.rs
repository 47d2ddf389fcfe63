//! 连接注册表 (ConnectionRegistry)
//!
//! Live sessions with their profile, role, rooms, tracked devices and the
//! outbox the transport drains. Only the hub task touches the registry, so
//! it is a plain map.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::message::OutboundMessage;
use shared::models::{DeviceId, Role};
use tokio::sync::mpsc;

/// Transport-assigned connection id
pub type SessionId = String;

/// Per-session ordered delivery channel
pub type Outbox = mpsc::UnboundedSender<Arc<OutboundMessage>>;
pub type OutboxReceiver = mpsc::UnboundedReceiver<Arc<OutboundMessage>>;

pub fn outbox() -> (Outbox, OutboxReceiver) {
    mpsc::unbounded_channel()
}

#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub profile: Option<Value>,
    pub role: Option<Role>,
    pub rooms: BTreeSet<String>,
    /// Devices this session attached to tables
    pub devices: BTreeSet<DeviceId>,
    pub connected_at: DateTime<Utc>,
    outbox: Outbox,
}

impl Session {
    fn new(id: SessionId, outbox: Outbox) -> Self {
        Self {
            id,
            profile: None,
            role: None,
            rooms: BTreeSet::new(),
            devices: BTreeSet::new(),
            connected_at: Utc::now(),
            outbox,
        }
    }

    pub fn is_identified(&self) -> bool {
        self.profile.is_some()
    }

    pub fn in_room(&self, room: &str) -> bool {
        self.rooms.contains(room)
    }

    /// Queue a message; false once the transport side is gone
    pub fn send(&self, msg: Arc<OutboundMessage>) -> bool {
        self.outbox.send(msg).is_ok()
    }
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: HashMap<SessionId, Session>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session; a previous session with the same id is replaced
    pub fn register(&mut self, id: &str, outbox: Outbox) -> bool {
        let replaced = self
            .sessions
            .insert(id.to_string(), Session::new(id.to_string(), outbox))
            .is_some();
        if replaced {
            tracing::warn!(session_id = %id, "Session re-registered, previous state dropped");
        }
        replaced
    }

    pub fn remove(&mut self, id: &str) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn identified_count(&self) -> usize {
        self.sessions.values().filter(|s| s.is_identified()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// Sessions subscribed to `room`
    pub fn members<'a>(&'a self, room: &str) -> impl Iterator<Item = &'a Session> {
        self.sessions.values().filter(move |s| s.in_room(room))
    }

    pub fn identify(&mut self, id: &str, profile: Value) -> bool {
        match self.sessions.get_mut(id) {
            Some(session) => {
                session.profile = Some(profile);
                true
            }
            None => false,
        }
    }

    /// Record the role and join its room
    ///
    /// The room of a previous role is kept: a session that changes role keeps
    /// receiving the old role's traffic until it leaves the room itself.
    pub fn set_role(&mut self, id: &str, role: Option<Role>) -> bool {
        let Some(session) = self.sessions.get_mut(id) else {
            return false;
        };
        if let Some(role) = &role {
            session.rooms.insert(role.room().to_string());
        }
        session.role = role;
        true
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.sessions.get(id).and_then(|s| s.role.as_ref())
    }

    pub fn join(&mut self, id: &str, room: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(session) => {
                session.rooms.insert(room.to_string());
                true
            }
            None => false,
        }
    }

    /// Leaving a room the session never joined still succeeds
    pub fn leave(&mut self, id: &str, room: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(session) => {
                session.rooms.remove(room);
                true
            }
            None => false,
        }
    }

    pub fn track_device(&mut self, id: &str, device: &str) {
        if let Some(session) = self.sessions.get_mut(id) {
            session.devices.insert(device.to_string());
        }
    }

    pub fn untrack_device(&mut self, id: &str, device: &str) {
        if let Some(session) = self.sessions.get_mut(id) {
            session.devices.remove(device);
        }
    }

    /// Whether any live session has attached `device`
    pub fn is_tracked(&self, device: &str) -> bool {
        self.sessions.values().any(|s| s.devices.contains(device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry_with(ids: &[&str]) -> (ConnectionRegistry, Vec<OutboxReceiver>) {
        let mut registry = ConnectionRegistry::new();
        let receivers = ids
            .iter()
            .map(|id| {
                let (tx, rx) = outbox();
                registry.register(id, tx);
                rx
            })
            .collect();
        (registry, receivers)
    }

    #[test]
    fn test_register_and_remove() {
        let (mut registry, _rx) = registry_with(&["s1", "s2"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("s1"));
        assert!(registry.remove("s1").is_some());
        assert!(registry.remove("s1").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reregister_resets_state() {
        let (mut registry, _rx) = registry_with(&["s1"]);
        registry.join("s1", "kitchen");
        let (tx, _rx2) = outbox();
        assert!(registry.register("s1", tx));
        assert!(!registry.get("s1").unwrap().in_room("kitchen"));
    }

    #[test]
    fn test_identify() {
        let (mut registry, _rx) = registry_with(&["s1", "s2"]);
        assert!(registry.identify("s1", json!({ "name": "Tablet 1" })));
        assert!(!registry.identify("ghost", json!({})));
        assert_eq!(registry.identified_count(), 1);
    }

    #[test]
    fn test_set_role_keeps_previous_room() {
        let (mut registry, _rx) = registry_with(&["s1"]);
        registry.set_role("s1", Some(Role::Waiter));
        registry.set_role("s1", Some(Role::Cashier));

        let session = registry.get("s1").unwrap();
        assert_eq!(session.role, Some(Role::Cashier));
        assert!(session.in_room("waiter"));
        assert!(session.in_room("cashier"));

        registry.set_role("s1", None);
        assert!(registry.role("s1").is_none());
        assert!(registry.get("s1").unwrap().in_room("cashier"));
    }

    #[test]
    fn test_rooms() {
        let (mut registry, _rx) = registry_with(&["s1", "s2", "s3"]);
        registry.join("s1", "kitchen");
        registry.join("s3", "kitchen");
        let mut members: Vec<_> = registry.members("kitchen").map(|s| s.id.clone()).collect();
        members.sort();
        assert_eq!(members, vec!["s1", "s3"]);

        assert!(registry.leave("s1", "kitchen"));
        assert!(registry.leave("s2", "never-joined"));
        assert_eq!(registry.members("kitchen").count(), 1);
    }

    #[test]
    fn test_track_devices() {
        let (mut registry, _rx) = registry_with(&["s1"]);
        registry.track_device("s1", "W1");
        registry.track_device("s1", "W1");
        registry.track_device("s1", "W2");
        registry.untrack_device("s1", "W2");
        let devices: Vec<_> = registry.get("s1").unwrap().devices.iter().cloned().collect();
        assert_eq!(devices, vec!["W1"]);
        assert!(registry.is_tracked("W1"));
        assert!(!registry.is_tracked("W2"));
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (registry, mut receivers) = registry_with(&["s1"]);
        let msg = Arc::new(OutboundMessage {
            event: "table-states".into(),
            data: json!([]),
        });
        assert!(registry.get("s1").unwrap().send(msg.clone()));
        assert_eq!(receivers[0].try_recv().unwrap().event, "table-states");

        receivers.clear();
        assert!(!registry.get("s1").unwrap().send(msg));
    }
}
