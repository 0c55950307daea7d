//! Snapshot persistence
//!
//! The whole collection is stored as one JSON blob under a fixed key in an
//! opaque async key-value store.

mod file;
mod memory;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;

use async_trait::async_trait;

use crate::domain::Collection;
use crate::error::PersistenceError;

/// Key the collection snapshot is stored under
pub const COLLECTION_KEY: &str = "bibliographies";

/// Async key-value storage for serialized snapshots.
///
/// `put` replaces the whole value for a key; partial writes never happen.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Store `value` under `key`, replacing what was there.
    async fn put(&self, key: &str, value: String) -> Result<(), PersistenceError>;
}

pub fn encode_collection(collection: &Collection) -> Result<String, PersistenceError> {
    serde_json::to_string(collection).map_err(|e| PersistenceError::Encode(e.to_string()))
}

/// Decode a stored snapshot, clearing selection state on every citation
pub fn decode_collection(blob: &str) -> Result<Collection, PersistenceError> {
    let collection: Collection =
        serde_json::from_str(blob).map_err(|e| PersistenceError::Corrupt {
            key: COLLECTION_KEY.to_string(),
            message: e.to_string(),
        })?;

    Ok(collection
        .into_inner()
        .into_iter()
        .map(|mut bib| {
            for citation in &mut bib.citations {
                citation.is_checked = false;
            }
            bib
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Citation, CitationStyle, Record, RecordType};
    use crate::store::{transitions, Action};

    #[test]
    fn test_decode_resets_checked() {
        let collection = Collection::new().apply(Action::CreateBibliography {
            style: CitationStyle::default(),
        });
        let id = collection.bibliographies()[0].id.clone();
        let citation = Citation::new(Record::new(RecordType::Book).with_title("Dune"));
        let collection =
            transitions::commit_citation(&collection, &id, citation, chrono::Utc::now());
        let collection = transitions::toggle_all_checked(&collection, &id);
        assert!(collection.get(&id).unwrap().citations[0].is_checked);

        let blob = encode_collection(&collection).unwrap();
        let decoded = decode_collection(&blob).unwrap();
        assert!(!decoded.get(&id).unwrap().citations[0].is_checked);
        assert_eq!(decoded.get(&id).unwrap().citations[0].content.title.as_deref(), Some("Dune"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_collection("{not json"),
            Err(PersistenceError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_encoded_shape_is_camel_case_array() {
        let collection = Collection::new().apply(Action::CreateBibliography {
            style: CitationStyle::default(),
        });
        let value: serde_json::Value =
            serde_json::from_str(&encode_collection(&collection).unwrap()).unwrap();
        assert!(value.is_array());
        assert!(value[0].get("dateModified").is_some());
        assert!(value[0].get("dateCreated").is_some());
    }
}
