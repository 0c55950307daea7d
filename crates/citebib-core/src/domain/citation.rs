//! Citation: one reference entry in a bibliography

use serde::{Deserialize, Serialize};

use super::{fresh_id, Record};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub id: String,
    pub content: Record,
    /// Transient selection state
    #[serde(default)]
    pub is_checked: bool,
}

impl Citation {
    /// Wrap content under a fresh id, mirrored into `content.id`
    pub fn new(content: Record) -> Self {
        Self::with_id(fresh_id(), content)
    }

    pub fn with_id(id: String, content: Record) -> Self {
        Self {
            content: content.with_id(id.clone()),
            id,
            is_checked: false,
        }
    }

    /// An unchecked copy with a fresh id
    pub fn reidentified(&self) -> Self {
        Self::new(self.content.clone())
    }

    pub fn unchecked(mut self) -> Self {
        self.is_checked = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordType;

    #[test]
    fn test_new_mirrors_id_into_content() {
        let citation = Citation::new(Record::new(RecordType::Book));
        assert!(!citation.id.is_empty());
        assert_eq!(citation.content.id, citation.id);
        assert!(!citation.is_checked);
    }

    #[test]
    fn test_reidentified_is_distinct() {
        let mut original = Citation::new(Record::new(RecordType::Webpage).with_title("A"));
        original.is_checked = true;
        let copy = original.reidentified();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.content.id, copy.id);
        assert_eq!(copy.content.title, original.content.title);
        assert!(!copy.is_checked);
    }

    #[test]
    fn test_serializes_camel_case() {
        let citation = Citation::new(Record::new(RecordType::Book));
        let value = serde_json::to_value(&citation).unwrap();
        assert_eq!(value["isChecked"], false);
    }
}
