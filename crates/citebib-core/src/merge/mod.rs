//! Reconciliation of local and remote collections for shared editing

mod session;

pub use session::*;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::Collection;

/// Which side each bibliography in a merged collection came from
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Local bibliographies kept because the remote side lacks them
    pub kept_local: Vec<String>,
    /// Local bibliographies replaced by a remote one with the same id
    pub replaced: Vec<String>,
    /// Remote bibliographies not present locally
    pub added: Vec<String>,
}

/// Merge an incoming collection into a local one.
///
/// Incoming bibliographies win on id collision. The result is every local
/// bibliography the incoming side does not carry, in local order, followed
/// by the incoming bibliographies in their order.
pub fn merge_collections(local: &Collection, incoming: &Collection) -> Collection {
    merge_collections_with_report(local, incoming).0
}

pub fn merge_collections_with_report(
    local: &Collection,
    incoming: &Collection,
) -> (Collection, MergeReport) {
    let incoming_ids: HashSet<&str> = incoming.iter().map(|b| b.id.as_str()).collect();
    let local_ids: HashSet<&str> = local.iter().map(|b| b.id.as_str()).collect();

    let mut report = MergeReport::default();
    for bib in local {
        if incoming_ids.contains(bib.id.as_str()) {
            report.replaced.push(bib.id.clone());
        } else {
            report.kept_local.push(bib.id.clone());
        }
    }
    report.added = incoming
        .iter()
        .filter(|b| !local_ids.contains(b.id.as_str()))
        .map(|b| b.id.clone())
        .collect();

    let merged = local
        .iter()
        .filter(|b| !incoming_ids.contains(b.id.as_str()))
        .chain(incoming.iter())
        .cloned()
        .collect();

    (merged, report)
}
