//! Crossref source for DOI metadata
//!
//! API docs: https://api.crossref.org/swagger-ui/index.html

use async_trait::async_trait;
use citebib_identifiers::clean_doi;
use serde::Deserialize;

use super::csl::{non_empty, normalize_authors};
use super::traits::{doi_url, fetch_success, join_url, Resolver, SourceError, SourceMetadata};
use crate::domain::{lenient, Author, Record, RecordType, StructuredDate};
use crate::http::HttpClient;

pub const CROSSREF_BASE_URL: &str = "https://api.crossref.org";

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: CrossrefWork,
}

#[derive(Debug, Deserialize)]
struct CrossrefWork {
    #[serde(rename = "DOI", default, deserialize_with = "lenient::opt_string")]
    doi: Option<String>,
    #[serde(rename = "URL", default, deserialize_with = "lenient::opt_string")]
    url: Option<String>,
    #[serde(rename = "ISSN", default, deserialize_with = "lenient::string_list")]
    issn: Vec<String>,
    #[serde(rename = "PMID", default, deserialize_with = "lenient::opt_string")]
    pmid: Option<String>,
    #[serde(rename = "PMCID", default, deserialize_with = "lenient::opt_string")]
    pmcid: Option<String>,
    #[serde(default, deserialize_with = "lenient::first_string")]
    title: Option<String>,
    #[serde(rename = "container-title", default, deserialize_with = "lenient::first_string")]
    container_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    volume: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    issue: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    page: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    publisher: Option<String>,
    #[serde(rename = "publisher-place", default, deserialize_with = "lenient::opt_string")]
    publisher_place: Option<String>,
    #[serde(rename = "publisher-location", default, deserialize_with = "lenient::opt_string")]
    publisher_location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    source: Option<String>,
    issued: Option<serde_json::Value>,
    #[serde(rename = "published-print")]
    published_print: Option<serde_json::Value>,
    #[serde(rename = "published-online")]
    published_online: Option<serde_json::Value>,
    #[serde(default)]
    author: Vec<Author>,
}

#[derive(Clone, Debug)]
pub struct CrossrefSource {
    client: HttpClient,
    base_url: String,
}

impl CrossrefSource {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn work_url(&self, doi: &str) -> String {
        join_url(&self.base_url, &format!("works/{doi}"))
    }

    /// Parse a single-work response (`/works/{doi}`)
    pub fn parse_work_response(json: &str) -> Result<Record, SourceError> {
        let response: CrossrefResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid Crossref JSON: {}", e)))?;
        Ok(Self::parse_work(response.message))
    }

    fn parse_work(work: CrossrefWork) -> Record {
        let issued = [&work.issued, &work.published_print, &work.published_online]
            .into_iter()
            .flatten()
            .find_map(StructuredDate::from_csl_value);

        let doi = non_empty(work.doi);
        let url = non_empty(work.url).or_else(|| doi.as_deref().map(doi_url));

        // DOI lookups are always cited as journal articles
        let mut record = Record::new(RecordType::ArticleJournal);
        record.title = non_empty(work.title);
        record.container_title = non_empty(work.container_title);
        record.author = normalize_authors(work.author);
        record.issued = issued;
        record.doi = doi;
        record.url = url;
        record.issn = work.issn;
        record.pmid = work.pmid;
        record.pmcid = work.pmcid;
        record.volume = work.volume;
        record.issue = work.issue;
        record.page = work.page;
        record.publisher = work.publisher;
        record.publisher_place = work.publisher_place.or(work.publisher_location);
        record.source = work.source;
        record.online = Some(true);
        record.accessed = Some(StructuredDate::now());
        record
    }
}

#[async_trait]
impl Resolver for CrossrefSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: "crossref",
            name: "Crossref",
            description: "DOI registration agency with metadata for scholarly works",
            base_url: CROSSREF_BASE_URL,
        }
    }

    async fn resolve_record(&self, identifier: &str) -> Result<Record, SourceError> {
        let doi = clean_doi(identifier);
        if doi.is_empty() {
            return Err(SourceError::InvalidIdentifier(identifier.to_string()));
        }
        let response = fetch_success(&self.client, "crossref", &self.work_url(&doi)).await?;
        Self::parse_work_response(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_work_maps_fields() {
        let json = r#"{
            "status": "ok",
            "message": {
                "DOI": "10.1038/nphys1170",
                "type": "journal-article",
                "title": ["Measured measurement"],
                "container-title": ["Nature Physics"],
                "ISSN": ["1745-2473", "1745-2481"],
                "volume": "5",
                "issue": "1",
                "page": "25-27",
                "issued": {"date-parts": [[2008, 12, 21]]},
                "author": [
                    {"given": "Markus", "family": "Aspelmeyer", "sequence": "first", "affiliation": []}
                ]
            }
        }"#;
        let record = CrossrefSource::parse_work_response(json).unwrap();
        assert_eq!(record.kind, RecordType::ArticleJournal);
        assert_eq!(record.title.as_deref(), Some("Measured measurement"));
        assert_eq!(record.container_title.as_deref(), Some("Nature Physics"));
        assert_eq!(record.issn.len(), 2);
        assert_eq!(record.url.as_deref(), Some("https://doi.org/10.1038/nphys1170"));
        assert_eq!(record.issued, Some(StructuredDate::new(2008, Some(12), Some(21))));
        assert_eq!(record.author[0].family, "Aspelmeyer");
        assert!(!record.author[0].id.is_empty());
        assert_eq!(record.online, Some(true));
        assert!(record.accessed.is_some());
    }

    #[test]
    fn test_parse_work_falls_back_to_published_print() {
        let json = r#"{"message": {"DOI": "10.1/x", "published-print": {"date-parts": [[1999]]}}}"#;
        let record = CrossrefSource::parse_work_response(json).unwrap();
        assert_eq!(record.issued, Some(StructuredDate::new(1999, None, None)));
        assert_eq!(record.kind, RecordType::ArticleJournal);
    }

    #[test]
    fn test_parse_work_forces_article_journal() {
        let json = r#"{"message": {"DOI": "10.1/ch", "type": "book-chapter", "title": ["A chapter"]}}"#;
        let record = CrossrefSource::parse_work_response(json).unwrap();
        assert_eq!(record.kind, RecordType::ArticleJournal);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            CrossrefSource::parse_work_response("<html>"),
            Err(SourceError::Parse(_))
        ));
    }
}
