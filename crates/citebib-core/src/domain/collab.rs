//! Collaborative session metadata attached to a bibliography

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub name: String,
    pub id: String,
}

impl Collaborator {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Shared-editing state: open flag, roster, change log and admin.
///
/// While `open` is true the admin is always on the roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollabSession {
    pub open: bool,
    pub id: String,
    pub admin_id: String,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    #[serde(default)]
    pub preferences: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub changelog: Vec<serde_json::Value>,
    #[serde(default)]
    pub password: String,
}

impl CollabSession {
    /// A fresh open session with the admin as the only collaborator
    pub fn open_with_admin(id: String, admin: Collaborator, password: String) -> Self {
        Self {
            open: true,
            id,
            admin_id: admin.id.clone(),
            collaborators: vec![admin],
            preferences: BTreeMap::new(),
            changelog: Vec::new(),
            password,
        }
    }

    pub fn admin(&self) -> Option<&Collaborator> {
        self.collaborators.iter().find(|c| c.id == self.admin_id)
    }
}
