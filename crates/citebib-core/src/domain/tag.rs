//! Tag references attached to bibliographies

use serde::{Deserialize, Serialize};

use super::fresh_id;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TagRef {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: fresh_id(),
            label: label.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
