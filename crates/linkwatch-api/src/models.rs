// ── Wire models ──
//
// Records returned by the remote user resource. Only `name` and `email`
// are required; the rest of a record is tolerated but not interpreted.

use serde::{Deserialize, Serialize};

/// One user record as returned by the remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            id: None,
            username: None,
        }
    }
}
