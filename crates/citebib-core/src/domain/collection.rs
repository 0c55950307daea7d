//! The ordered collection of bibliographies

use serde::{Deserialize, Serialize};

use super::Bibliography;

/// A snapshot of every bibliography, in display order.
///
/// Collections are values: transitions take a snapshot and return a new one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    bibliographies: Vec<Bibliography>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bibliographies(&self) -> &[Bibliography] {
        &self.bibliographies
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bibliography> {
        self.bibliographies.iter()
    }

    pub fn get(&self, bibliography_id: &str) -> Option<&Bibliography> {
        self.bibliographies.iter().find(|b| b.id == bibliography_id)
    }

    pub fn contains(&self, bibliography_id: &str) -> bool {
        self.get(bibliography_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.bibliographies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bibliographies.is_empty()
    }

    pub fn citation_count(&self) -> usize {
        self.bibliographies.iter().map(|b| b.citations.len()).sum()
    }

    pub(crate) fn bibliographies_mut(&mut self) -> &mut Vec<Bibliography> {
        &mut self.bibliographies
    }

    pub fn into_inner(self) -> Vec<Bibliography> {
        self.bibliographies
    }
}

impl From<Vec<Bibliography>> for Collection {
    fn from(bibliographies: Vec<Bibliography>) -> Self {
        Self { bibliographies }
    }
}

impl FromIterator<Bibliography> for Collection {
    fn from_iter<I: IntoIterator<Item = Bibliography>>(iter: I) -> Self {
        Self {
            bibliographies: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Bibliography;
    type IntoIter = std::slice::Iter<'a, Bibliography>;

    fn into_iter(self) -> Self::IntoIter {
        self.bibliographies.iter()
    }
}
