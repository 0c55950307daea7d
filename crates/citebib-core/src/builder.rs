//! Record construction for the manual-entry and resolution paths

use crate::domain::{fresh_id, Author, Record, RecordType, StructuredDate};

/// Builds records with internally generated ids for the record and its authors
pub struct CitationRecordBuilder;

impl CitationRecordBuilder {
    /// A minimal record for manual entry: the chosen type and one empty author
    pub fn manual_stub(kind: RecordType) -> Record {
        let mut record = Record::new(kind).with_id(fresh_id());
        record.author = vec![Author::empty()];
        record
    }

    /// Finish a resolver's output: a record id if the source gave none, a
    /// fresh id on every author, and an `accessed` stamp if none was set
    pub fn from_resolved(raw: Record) -> Record {
        let mut record = if raw.id.is_empty() {
            raw.with_id(fresh_id())
        } else {
            raw
        };
        record.author = std::mem::take(&mut record.author)
            .into_iter()
            .map(|author| Author {
                id: fresh_id(),
                ..author
            })
            .collect();
        if record.accessed.is_none() {
            record.accessed = Some(StructuredDate::now());
        }
        record
    }
}
