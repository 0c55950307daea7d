//! Collaboration merge integration tests

mod common;

use chrono::Utc;
use citebib_core::domain::{Bibliography, CitationStyle, Collaborator, Collection};
use citebib_core::merge::{merge_collections, merge_collections_with_report};
use citebib_core::persistence::decode_collection;
use citebib_core::store::{Action, BibliographyStore};
use common::fixtures::load_snapshot_fixture;
use proptest::prelude::*;

fn bib(id: &str, title: &str) -> Bibliography {
    let mut bib = Bibliography::new(id.to_string(), CitationStyle::default(), Utc::now());
    bib.title = title.to_string();
    bib
}

fn stored() -> Collection {
    decode_collection(&load_snapshot_fixture("two_bibliographies.json")).unwrap()
}

#[test]
fn test_incoming_snapshot_replaces_shared_bibliography() {
    let local = stored();
    let mut remote_shared = local.get("bib-shared").unwrap().clone();
    remote_shared.title = "Shared thesis sources (remote)".to_string();
    let incoming = Collection::from(vec![remote_shared, bib("bib-new", "From a collaborator")]);

    let (merged, report) = merge_collections_with_report(&local, &incoming);
    let ids: Vec<&str> = merged.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["bib-reading", "bib-shared", "bib-new"]);
    assert_eq!(
        merged.get("bib-shared").unwrap().title,
        "Shared thesis sources (remote)"
    );
    assert_eq!(report.replaced, vec!["bib-shared"]);
    assert_eq!(report.added, vec!["bib-new"]);
}

#[test]
fn test_merge_through_store() {
    let mut store = BibliographyStore::from_collection(stored());
    let incoming = Collection::from(vec![bib("bib-reading", "Replaced")]);
    store.dispatch(Action::MergeCollections { incoming });
    let ids: Vec<&str> = store.collection().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["bib-shared", "bib-reading"]);
    assert!(store.collection().get("bib-reading").unwrap().citations.is_empty());
}

#[test]
fn test_disable_collapses_roster_to_admin() {
    let mut store = BibliographyStore::from_collection(stored());
    store.dispatch(Action::DisableCollaboration {
        bibliography_id: "bib-shared".to_string(),
    });
    let collab = store.collection().get("bib-shared").unwrap().collab.clone().unwrap();
    assert!(!collab.open);
    assert_eq!(collab.collaborators, vec![Collaborator::new("Ada", "user-1")]);
    assert!(collab.changelog.is_empty());
    assert_eq!(collab.password, "hunter2");

    store.dispatch(Action::ReEnableCollaboration {
        bibliography_id: "bib-shared".to_string(),
    });
    let collab = store.collection().get("bib-shared").unwrap().collab.clone().unwrap();
    assert!(collab.open);
    assert_eq!(collab.admin().map(|a| a.name.as_str()), Some("Ada"));
}

#[test]
fn test_enable_collaboration_on_plain_bibliography() {
    let mut store = BibliographyStore::from_collection(stored());
    store.dispatch(Action::EnableCollaboration {
        bibliography_id: "bib-reading".to_string(),
        session_id: "session-2".to_string(),
        admin: None,
        password: String::new(),
    });
    assert!(store.collection().get("bib-reading").unwrap().collab.is_none());

    store.dispatch(Action::EnableCollaboration {
        bibliography_id: "bib-reading".to_string(),
        session_id: "session-2".to_string(),
        admin: Some(Collaborator::new("Grace", "user-2")),
        password: "secret".to_string(),
    });
    let bib = store.collection().get("bib-reading").unwrap();
    assert!(bib.is_collab_open());
    let collab = bib.collab.as_ref().unwrap();
    assert_eq!(collab.id, "session-2");
    assert_eq!(collab.admin_id, "user-2");
    assert_eq!(collab.collaborators.len(), 1);
}

// === Property-Based Tests ===

fn arb_collection() -> impl Strategy<Value = Collection> {
    prop::collection::vec(("[a-e]", "[A-Z][a-z]{0,6}"), 0..6).prop_map(|entries| {
        let mut seen = std::collections::HashSet::new();
        entries
            .into_iter()
            .filter(|(id, _)| seen.insert(id.clone()))
            .map(|(id, title)| bib(&id, &title))
            .collect::<Collection>()
    })
}

proptest! {
    #[test]
    fn test_merge_is_idempotent(local in arb_collection(), incoming in arb_collection()) {
        let once = merge_collections(&local, &incoming);
        let twice = merge_collections(&once, &incoming);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_with_self_is_identity(local in arb_collection()) {
        prop_assert_eq!(merge_collections(&local, &local), local);
    }

    #[test]
    fn test_merge_keeps_every_incoming_bibliography(local in arb_collection(), incoming in arb_collection()) {
        let merged = merge_collections(&local, &incoming);
        for bib in &incoming {
            prop_assert_eq!(merged.get(&bib.id), Some(bib));
        }
    }
}
