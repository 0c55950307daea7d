//! Domain models for citebib
//!
//! - Collection: every bibliography, in order
//! - Bibliography: a named group of citations sharing one style
//! - Citation: a Record plus transient selection state
//! - Record: normalized CSL-style content keyed by its `type`
//! - CollabSession: shared-editing roster and change log

mod author;
mod bibliography;
mod citation;
mod collab;
mod collection;
mod date;
pub(crate) mod lenient;
mod record;
mod tag;

pub use author::*;
pub use bibliography::*;
pub use citation::*;
pub use collab::*;
pub use collection::*;
pub use date::*;
pub use record::*;
pub use tag::*;

/// Generate a fresh identifier for a bibliography, citation or author
pub fn fresh_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
