//! Bibliography: a named, ordered group of citations sharing one style

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Citation, CollabSession, TagRef};

pub const DEFAULT_BIBLIOGRAPHY_TITLE: &str = "Untitled Bibliography";

/// The citation style a bibliography renders with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationStyle {
    pub name: String,
    pub code: String,
}

impl CitationStyle {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

impl Default for CitationStyle {
    fn default() -> Self {
        Self::new("APA 7th edition", "apa")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bibliography {
    pub id: String,
    pub title: String,
    pub style: CitationStyle,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collab: Option<CollabSession>,
    /// In-progress citation, not yet part of `citations`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_citation: Option<Citation>,
}

impl Bibliography {
    /// An empty bibliography with the default title
    pub fn new(id: String, style: CitationStyle, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: DEFAULT_BIBLIOGRAPHY_TITLE.to_string(),
            style,
            date_created: now,
            date_modified: now,
            citations: Vec::new(),
            tags: Vec::new(),
            collab: None,
            edited_citation: None,
        }
    }

    pub fn citation(&self, citation_id: &str) -> Option<&Citation> {
        self.citations.iter().find(|c| c.id == citation_id)
    }

    pub fn checked_citations(&self) -> Vec<Citation> {
        self.citations.iter().filter(|c| c.is_checked).cloned().collect()
    }

    pub fn is_collab_open(&self) -> bool {
        self.collab.as_ref().is_some_and(|c| c.open)
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.date_modified = now;
    }
}
