//! Helpers shared by sources whose responses are already CSL-shaped

use crate::domain::{fresh_id, Author};

/// Give a source-supplied author a fresh id and lift an institutional
/// `name` into `literal`
pub(crate) fn normalize_author(mut author: Author) -> Author {
    if author.literal.is_none() {
        if let Some(serde_json::Value::String(name)) = author.extra.remove("name") {
            author.literal = Some(name);
        }
    }
    author.id = fresh_id();
    author
}

pub(crate) fn normalize_authors(authors: Vec<Author>) -> Vec<Author> {
    authors.into_iter().map(normalize_author).collect()
}

/// Treat blank strings from a source as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
