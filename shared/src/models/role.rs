//! Session role

use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional role of a session
///
/// Open set of string tags. `waiter` and `cashier` drive the role-gated relays;
/// any other tag is accepted and only used as a room name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Waiter,
    Cashier,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Waiter => "waiter",
            Self::Cashier => "cashier",
            Self::Other(tag) => tag,
        }
    }

    /// Broadcast room the role subscribes to
    pub fn room(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "waiter" => Self::Waiter,
            "cashier" => Self::Cashier,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
