//! citebib-core: bibliography collection engine and identifier resolution
//!
//! This library provides:
//! - Domain models (bibliographies, citations, CSL-style records)
//! - A pure reducer over the collection plus a store that persists snapshots
//! - Merge of local and remote collections for collaborative sessions
//! - Snapshot persistence adapters (in-memory and file-backed)
//! - Resolution of URLs, DOIs, ISBNs, PMIDs and PMCIDs into records

pub mod builder;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod merge;
pub mod persistence;
#[cfg(feature = "native")]
pub mod sources;
pub mod store;

pub use builder::CitationRecordBuilder;
pub use config::{CitebibConfig, ResolverConfig, StorageConfig};
pub use domain::{
    Author, Bibliography, Citation, CitationStyle, CollabSession, Collaborator, Collection,
    Record, RecordType, StructuredDate, TagRef,
};
pub use error::{ConfigError, PersistenceError};
pub use merge::{merge_collections, MergeReport};
pub use persistence::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore, COLLECTION_KEY};
#[cfg(feature = "native")]
pub use sources::{IdentifierResolver, Resolver, SourceError};
pub use store::{Action, BibliographyField, BibliographyStore, NewCitation};

pub use citebib_identifiers::{classify, IdentifierKind};
