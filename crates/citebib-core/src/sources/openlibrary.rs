//! Open Library source for ISBN lookups
//!
//! Uses the search endpoint with editions expanded, taking the first work
//! and its first edition.

use async_trait::async_trait;
use citebib_identifiers::normalize_isbn;
use serde::Deserialize;

use super::csl::non_empty;
use super::traits::{check_status, join_url, Resolver, SourceError, SourceMetadata};
use crate::domain::{Author, Record, RecordType, StructuredDate};
use crate::http::HttpClient;

pub const OPENLIBRARY_BASE_URL: &str = "https://openlibrary.org";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<WorkDoc>,
}

#[derive(Debug, Deserialize)]
struct WorkDoc {
    title: Option<String>,
    number_of_pages_median: Option<u32>,
    #[serde(default)]
    author_name: Vec<String>,
    first_publish_year: Option<i32>,
    editions: Option<EditionList>,
}

#[derive(Debug, Deserialize)]
struct EditionList {
    #[serde(default)]
    docs: Vec<Edition>,
}

#[derive(Debug, Default, Deserialize)]
struct Edition {
    #[serde(default)]
    publisher: Vec<String>,
    #[serde(default)]
    publish_place: Vec<String>,
    #[serde(default)]
    isbn: Vec<String>,
    #[serde(default)]
    publish_date: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct OpenLibrarySource {
    client: HttpClient,
    base_url: String,
}

impl OpenLibrarySource {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn search_url(&self) -> String {
        join_url(&self.base_url, "search.json")
    }

    /// Parse a search response for `isbn`, which is used when the edition
    /// lists no ISBN of its own
    pub fn parse_search_response(json: &str, isbn: &str) -> Result<Record, SourceError> {
        let response: SearchResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid Open Library JSON: {}", e)))?;

        let doc = response
            .docs
            .into_iter()
            .next()
            .ok_or(SourceError::NotFound)?;
        let edition = doc
            .editions
            .and_then(|e| e.docs.into_iter().next())
            .unwrap_or_default();

        let issued = edition
            .publish_date
            .first()
            .and_then(|d| StructuredDate::parse(d))
            .or_else(|| {
                doc.first_publish_year
                    .map(|year| StructuredDate::new(year, None, None))
            });

        let mut record = Record::new(RecordType::Book);
        record.title = non_empty(doc.title);
        record.number_of_pages = doc.number_of_pages_median.map(|n| n.to_string());
        record.author = Author::from_full_names(&doc.author_name);
        record.publisher = non_empty(edition.publisher.into_iter().next());
        record.publisher_place = non_empty(edition.publish_place.into_iter().next());
        record.isbn = edition
            .isbn
            .into_iter()
            .next()
            .or_else(|| Some(isbn.to_string()));
        record.issued = issued;
        record.accessed = Some(StructuredDate::now());
        Ok(record)
    }
}

#[async_trait]
impl Resolver for OpenLibrarySource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: "openlibrary",
            name: "Open Library",
            description: "Open catalog of books searchable by ISBN",
            base_url: OPENLIBRARY_BASE_URL,
        }
    }

    async fn resolve_record(&self, identifier: &str) -> Result<Record, SourceError> {
        let isbn = normalize_isbn(identifier);
        if isbn.is_empty() {
            return Err(SourceError::InvalidIdentifier(identifier.to_string()));
        }
        let query = format!("isbn:{isbn}");
        let response = self
            .client
            .get_with_params(
                &self.search_url(),
                &[
                    ("q", query.as_str()),
                    ("mode", "everything"),
                    ("fields", "*,editions"),
                ],
            )
            .await?;
        let response = check_status("openlibrary", response)?;
        Self::parse_search_response(&response.body, &isbn)
    }
}
