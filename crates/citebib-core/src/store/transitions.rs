//! Pure collection transitions
//!
//! Every function takes a snapshot and returns a new one; the input is never
//! modified. An operation addressed at a bibliography or citation that does
//! not exist returns the input unchanged.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::builder::CitationRecordBuilder;
use crate::domain::{
    fresh_id, Bibliography, Citation, CitationStyle, Collection, Record, RecordType, TagRef,
};

/// A bibliography field that can be replaced wholesale
#[derive(Clone, Debug, PartialEq)]
pub enum BibliographyField {
    Title(String),
    Style(CitationStyle),
    Tags(Vec<TagRef>),
}

impl BibliographyField {
    pub fn key(&self) -> &'static str {
        match self {
            BibliographyField::Title(_) => "title",
            BibliographyField::Style(_) => "style",
            BibliographyField::Tags(_) => "tags",
        }
    }
}

/// What to add through [`add_citation`]
#[derive(Clone, Debug, PartialEq)]
pub enum NewCitation {
    /// Ready-made content (import or resolution); appended directly
    Content(Record),
    /// Manual entry of the given type; opens the edited-citation slot
    Manual(RecordType),
}

/// Apply `f` to the bibliography with `bibliography_id`, if present
pub(crate) fn update_bibliography<F>(
    collection: &Collection,
    bibliography_id: &str,
    f: F,
) -> Collection
where
    F: FnOnce(&mut Bibliography),
{
    let mut next = collection.clone();
    if let Some(bib) = next
        .bibliographies_mut()
        .iter_mut()
        .find(|b| b.id == bibliography_id)
    {
        f(bib);
    }
    next
}

fn id_set(citations: &[Citation]) -> HashSet<&str> {
    citations.iter().map(|c| c.id.as_str()).collect()
}

pub fn create_bibliography(
    collection: &Collection,
    style: CitationStyle,
    now: DateTime<Utc>,
) -> Collection {
    let mut next = collection.clone();
    next.bibliographies_mut()
        .push(Bibliography::new(fresh_id(), style, now));
    next
}

pub fn update_bibliography_field(
    collection: &Collection,
    bibliography_id: &str,
    field: BibliographyField,
    now: DateTime<Utc>,
) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        match field {
            BibliographyField::Title(title) => bib.title = title,
            BibliographyField::Style(style) => bib.style = style,
            BibliographyField::Tags(tags) => {
                let mut seen = HashSet::new();
                bib.tags = tags
                    .into_iter()
                    .filter(|t| seen.insert(t.id.clone()))
                    .collect();
            }
        }
        bib.touch(now);
    })
}

pub fn delete_bibliography(collection: &Collection, bibliography_id: &str) -> Collection {
    collection
        .iter()
        .filter(|b| b.id != bibliography_id)
        .cloned()
        .collect()
}

/// Append ready content as a new citation, or open the edited-citation slot
/// with a manual stub.
pub fn add_citation(
    collection: &Collection,
    bibliography_id: &str,
    new: NewCitation,
    now: DateTime<Utc>,
) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        match new {
            NewCitation::Content(content) => bib.citations.push(Citation::new(content)),
            NewCitation::Manual(kind) => {
                let stub = CitationRecordBuilder::manual_stub(kind);
                bib.edited_citation = Some(Citation::with_id(stub.id.clone(), stub));
            }
        }
        bib.touch(now);
    })
}

/// Copy an existing citation into the edited-citation slot
pub fn set_edited_citation(
    collection: &Collection,
    bibliography_id: &str,
    citation_id: &str,
) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        if let Some(citation) = bib.citation(citation_id).cloned() {
            bib.edited_citation = Some(citation);
        }
    })
}

pub fn update_edited_citation_content(
    collection: &Collection,
    bibliography_id: &str,
    content: Record,
    now: DateTime<Utc>,
) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        if let Some(edited) = bib.edited_citation.as_mut() {
            edited.content = content.with_id(edited.id.clone());
            bib.touch(now);
        }
    })
}

/// Replace the citation with the same id in place, or append it as new
pub fn commit_citation(
    collection: &Collection,
    bibliography_id: &str,
    citation: Citation,
    now: DateTime<Utc>,
) -> Collection {
    let mut citation = citation;
    citation.content.id = citation.id.clone();

    update_bibliography(collection, bibliography_id, |bib| {
        match bib.citations.iter_mut().find(|c| c.id == citation.id) {
            Some(existing) => *existing = citation.unchecked(),
            None => bib.citations.push(citation),
        }
        bib.touch(now);
    })
}

pub fn toggle_checked(
    collection: &Collection,
    bibliography_id: &str,
    citation_id: &str,
) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        if let Some(citation) = bib.citations.iter_mut().find(|c| c.id == citation_id) {
            citation.is_checked = !citation.is_checked;
        }
    })
}

/// Master toggle: uncheck everything when all are checked, otherwise check
/// everything (a mixed state resolves to all checked).
pub fn toggle_all_checked(collection: &Collection, bibliography_id: &str) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        let target = !bib.citations.iter().all(|c| c.is_checked);
        for citation in &mut bib.citations {
            citation.is_checked = target;
        }
    })
}

pub fn uncheck_all(collection: &Collection, bibliography_id: &str) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        for citation in &mut bib.citations {
            citation.is_checked = false;
        }
    })
}

pub fn delete_checked(
    collection: &Collection,
    bibliography_id: &str,
    now: DateTime<Utc>,
) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        bib.citations.retain(|c| !c.is_checked);
        bib.touch(now);
    })
}

/// Append a re-identified copy of every checked citation; originals and
/// copies all end up unchecked.
pub fn duplicate_checked(
    collection: &Collection,
    bibliography_id: &str,
    now: DateTime<Utc>,
) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        let copies: Vec<Citation> = bib
            .citations
            .iter()
            .filter(|c| c.is_checked)
            .map(Citation::reidentified)
            .collect();
        for citation in &mut bib.citations {
            citation.is_checked = false;
        }
        bib.citations.extend(copies);
        bib.touch(now);
    })
}

/// Move citations verbatim from one bibliography to another.
///
/// Both bibliographies must exist and differ; otherwise nothing changes.
pub fn move_checked(
    collection: &Collection,
    from_id: &str,
    to_id: &str,
    citations: &[Citation],
    now: DateTime<Utc>,
) -> Collection {
    if from_id == to_id || !collection.contains(from_id) || !collection.contains(to_id) {
        return collection.clone();
    }

    let moved_ids = id_set(citations);
    let mut next = collection.clone();
    for bib in next.bibliographies_mut().iter_mut() {
        if bib.id == to_id {
            bib.citations.extend(citations.iter().cloned());
            bib.touch(now);
        } else if bib.id == from_id {
            bib.citations.retain(|c| !moved_ids.contains(c.id.as_str()));
            bib.touch(now);
        }
    }
    next
}

/// Fan the given citations out into every bibliography.
///
/// Each bibliography first drops any citation whose id collides with one of
/// the given citations and clears selection on the rest, then receives its
/// own freshly identified copies.
pub fn copy_checked(
    collection: &Collection,
    citations: &[Citation],
    now: DateTime<Utc>,
) -> Collection {
    let copied_ids = id_set(citations);
    let mut next = collection.clone();
    for bib in next.bibliographies_mut().iter_mut() {
        bib.citations.retain(|c| !copied_ids.contains(c.id.as_str()));
        for citation in &mut bib.citations {
            citation.is_checked = false;
        }
        bib.citations
            .extend(citations.iter().map(Citation::reidentified));
        bib.touch(now);
    }
    next
}

/// A new bibliography seeded with the given citations, ids preserved.
///
/// Removing them from their source is a separate step for the caller.
pub fn create_bibliography_from_checked(
    collection: &Collection,
    style: CitationStyle,
    citations: &[Citation],
    now: DateTime<Utc>,
) -> Collection {
    let mut bib = Bibliography::new(fresh_id(), style, now);
    bib.citations = citations.to_vec();

    let mut next = collection.clone();
    next.bibliographies_mut().push(bib);
    next
}

pub fn delete_all_bibliographies() -> Collection {
    Collection::new()
}

/// Attach a tag; a tag whose id is already present is ignored
pub fn add_tag(
    collection: &Collection,
    bibliography_id: &str,
    tag: TagRef,
    now: DateTime<Utc>,
) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        if !bib.tags.iter().any(|t| t.id == tag.id) {
            bib.tags.push(tag);
            bib.touch(now);
        }
    })
}

pub fn remove_tag(
    collection: &Collection,
    bibliography_id: &str,
    tag_id: &str,
    now: DateTime<Utc>,
) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        let before = bib.tags.len();
        bib.tags.retain(|t| t.id != tag_id);
        if bib.tags.len() != before {
            bib.touch(now);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(now: DateTime<Utc>) -> (Collection, String) {
        let collection = create_bibliography(&Collection::new(), CitationStyle::default(), now);
        let id = collection.bibliographies()[0].id.clone();
        (collection, id)
    }

    fn with_titles(collection: &Collection, bib_id: &str, titles: &[&str]) -> Collection {
        let now = Utc::now();
        titles.iter().fold(collection.clone(), |acc, title| {
            add_citation(
                &acc,
                bib_id,
                NewCitation::Content(Record::new(RecordType::Book).with_title(*title)),
                now,
            )
        })
    }

    #[test]
    fn test_create_bibliography_defaults() {
        let now = Utc::now();
        let (collection, _) = sample(now);
        let bib = &collection.bibliographies()[0];
        assert_eq!(bib.title, "Untitled Bibliography");
        assert!(bib.citations.is_empty());
        assert_eq!(bib.date_created, now);
        assert_eq!(bib.date_modified, now);
    }

    #[test]
    fn test_update_field_bumps_date_modified() {
        let now = Utc::now();
        let (collection, id) = sample(now);
        let later = now + Duration::seconds(5);
        let next = update_bibliography_field(
            &collection,
            &id,
            BibliographyField::Title("Thesis sources".to_string()),
            later,
        );
        assert_eq!(next.get(&id).unwrap().title, "Thesis sources");
        assert_eq!(next.get(&id).unwrap().date_modified, later);
        // Input snapshot untouched
        assert_eq!(collection.get(&id).unwrap().title, "Untitled Bibliography");
    }

    #[test]
    fn test_update_field_on_missing_bibliography_is_noop() {
        let (collection, _) = sample(Utc::now());
        let next = update_bibliography_field(
            &collection,
            "missing",
            BibliographyField::Title("x".to_string()),
            Utc::now(),
        );
        assert_eq!(next, collection);
    }

    #[test]
    fn test_add_citation_with_content_mirrors_id() {
        let (collection, id) = sample(Utc::now());
        let next = with_titles(&collection, &id, &["Dune"]);
        let citation = &next.get(&id).unwrap().citations[0];
        assert_eq!(citation.content.id, citation.id);
        assert!(!citation.is_checked);
    }

    #[test]
    fn test_add_manual_citation_opens_edited_slot() {
        let (collection, id) = sample(Utc::now());
        let next = add_citation(&collection, &id, NewCitation::Manual(RecordType::Book), Utc::now());
        let bib = next.get(&id).unwrap();
        assert!(bib.citations.is_empty());
        let edited = bib.edited_citation.as_ref().unwrap();
        assert_eq!(edited.content.id, edited.id);
        assert_eq!(edited.content.kind, RecordType::Book);
        assert_eq!(edited.content.author.len(), 1);
    }

    #[test]
    fn test_commit_replaces_in_place_and_clears_check() {
        let (collection, id) = sample(Utc::now());
        let collection = with_titles(&collection, &id, &["A", "B", "C"]);
        let target = collection.get(&id).unwrap().citations[1].id.clone();
        let collection = toggle_checked(&collection, &id, &target);

        let mut edited = collection.get(&id).unwrap().citations[1].clone();
        edited.content.title = Some("B revised".to_string());
        let next = commit_citation(&collection, &id, edited, Utc::now());

        let citations = &next.get(&id).unwrap().citations;
        assert_eq!(citations.len(), 3);
        assert_eq!(citations[1].id, target);
        assert_eq!(citations[1].content.title.as_deref(), Some("B revised"));
        assert!(!citations[1].is_checked);
    }

    #[test]
    fn test_set_edited_citation_copies_entry() {
        let (collection, id) = sample(Utc::now());
        let collection = with_titles(&collection, &id, &["A"]);
        let target = collection.get(&id).unwrap().citations[0].clone();
        let next = set_edited_citation(&collection, &id, &target.id);
        assert_eq!(next.get(&id).unwrap().edited_citation.as_ref(), Some(&target));

        let unchanged = set_edited_citation(&collection, &id, "missing");
        assert_eq!(unchanged, collection);
    }

    #[test]
    fn test_toggle_checked_affects_only_target() {
        let (collection, id) = sample(Utc::now());
        let collection = with_titles(&collection, &id, &["A", "B"]);
        let first = collection.get(&id).unwrap().citations[0].id.clone();
        let next = toggle_checked(&collection, &id, &first);
        let citations = &next.get(&id).unwrap().citations;
        assert!(citations[0].is_checked);
        assert!(!citations[1].is_checked);
    }

    #[test]
    fn test_toggle_all_mixed_checks_everything() {
        let (collection, id) = sample(Utc::now());
        let collection = with_titles(&collection, &id, &["A", "B", "C"]);
        let first = collection.get(&id).unwrap().citations[0].id.clone();
        let mixed = toggle_checked(&collection, &id, &first);

        let all = toggle_all_checked(&mixed, &id);
        assert!(all.get(&id).unwrap().citations.iter().all(|c| c.is_checked));

        let none = toggle_all_checked(&all, &id);
        assert!(none.get(&id).unwrap().citations.iter().all(|c| !c.is_checked));
    }

    #[test]
    fn test_delete_checked() {
        let (collection, id) = sample(Utc::now());
        let collection = with_titles(&collection, &id, &["A", "B", "C"]);
        let second = collection.get(&id).unwrap().citations[1].id.clone();
        let collection = toggle_checked(&collection, &id, &second);
        let next = delete_checked(&collection, &id, Utc::now());
        let citations = &next.get(&id).unwrap().citations;
        assert_eq!(citations.len(), 2);
        assert!(citations.iter().all(|c| c.id != second));
    }

    #[test]
    fn test_tags_have_set_semantics() {
        let (collection, id) = sample(Utc::now());
        let tag = TagRef::new("to read").with_color("yellow");
        let once = add_tag(&collection, &id, tag.clone(), Utc::now());
        let twice = add_tag(&once, &id, tag.clone(), Utc::now());
        assert_eq!(twice.get(&id).unwrap().tags, vec![tag.clone()]);

        let removed = remove_tag(&twice, &id, &tag.id, Utc::now());
        assert!(removed.get(&id).unwrap().tags.is_empty());
    }

    #[test]
    fn test_delete_bibliography_and_all() {
        let (collection, id) = sample(Utc::now());
        let collection = create_bibliography(&collection, CitationStyle::default(), Utc::now());
        let next = delete_bibliography(&collection, &id);
        assert_eq!(next.len(), 1);
        assert!(!next.contains(&id));
        assert_eq!(delete_bibliography(&next, "missing"), next);
        assert!(delete_all_bibliographies().is_empty());
    }
}
