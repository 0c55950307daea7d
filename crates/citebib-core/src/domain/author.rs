//! Author entries inside a record

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::fresh_id;

/// A CSL name entry with a stable handle for per-author editing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub given: String,
    #[serde(default)]
    pub family: String,
    /// Institutional or single-token names that should not be split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(default)]
    pub id: String,
    /// Source-specific extras (ORCID, affiliation, sequence, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Author {
    /// An empty author slot for manual entry
    pub fn empty() -> Self {
        Self {
            id: fresh_id(),
            ..Default::default()
        }
    }

    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
            id: fresh_id(),
            ..Default::default()
        }
    }

    /// Split a display name on whitespace: the first token is the given
    /// name and the remainder the family name.
    pub fn from_full_name(name: &str) -> Self {
        let mut tokens = name.split_whitespace();
        let given = tokens.next().unwrap_or_default().to_string();
        let family = tokens.collect::<Vec<_>>().join(" ");
        Self::new(given, family)
    }

    /// Convert a list of display names, dropping blanks
    pub fn from_full_names<I, S>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|n| !n.as_ref().trim().is_empty())
            .map(|n| Self::from_full_name(n.as_ref()))
            .collect()
    }

    pub fn display_name(&self) -> String {
        if let Some(literal) = &self.literal {
            return literal.clone();
        }
        match (self.given.is_empty(), self.family.is_empty()) {
            (false, false) => format!("{} {}", self.given, self.family),
            (true, false) => self.family.clone(),
            (false, true) => self.given.clone(),
            (true, true) => String::new(),
        }
    }
}
