//! NCBI literature citation exporter for PubMed and PubMed Central ids
//!
//! API docs: https://api.ncbi.nlm.nih.gov/lit/ctxp/
//! The exporter already answers in CSL-JSON, so little mapping is needed.

use async_trait::async_trait;
use citebib_identifiers::{clean_pmcid, clean_pmid};
use serde::Deserialize;

use super::csl::{non_empty, normalize_authors};
use super::traits::{doi_url, fetch_success, join_url, Resolver, SourceError, SourceMetadata};
use crate::domain::{lenient, Author, Record, RecordType, StructuredDate};
use crate::http::HttpClient;

pub const NCBI_BASE_URL: &str = "https://api.ncbi.nlm.nih.gov";

/// Which NCBI database an id belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NcbiDatabase {
    PubMed,
    Pmc,
}

impl NcbiDatabase {
    fn path_segment(&self) -> &'static str {
        match self {
            NcbiDatabase::PubMed => "pubmed",
            NcbiDatabase::Pmc => "pmc",
        }
    }

    fn clean(&self, identifier: &str) -> String {
        match self {
            NcbiDatabase::PubMed => clean_pmid(identifier),
            NcbiDatabase::Pmc => clean_pmcid(identifier),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CslItem {
    /// Set to "error" when the exporter cannot find the id
    status: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
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
    #[serde(rename = "publisher-place", default, deserialize_with = "lenient::opt_string")]
    publisher_place: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    source: Option<String>,
    issued: Option<serde_json::Value>,
    #[serde(default)]
    author: Vec<Author>,
}

#[derive(Clone, Debug)]
pub struct NcbiSource {
    client: HttpClient,
    base_url: String,
    database: NcbiDatabase,
}

impl NcbiSource {
    pub fn new(client: HttpClient, base_url: impl Into<String>, database: NcbiDatabase) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            database,
        }
    }

    pub fn pubmed(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self::new(client, base_url, NcbiDatabase::PubMed)
    }

    pub fn pmc(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self::new(client, base_url, NcbiDatabase::Pmc)
    }

    pub fn database(&self) -> NcbiDatabase {
        self.database
    }

    pub fn export_url(&self, id: &str) -> String {
        join_url(
            &self.base_url,
            &format!(
                "lit/ctxp/v1/{}/?format=csl&id={}",
                self.database.path_segment(),
                urlencoding::encode(id)
            ),
        )
    }

    /// Parse a CSL export for a single id
    pub fn parse_csl_response(json: &str) -> Result<Record, SourceError> {
        let item: CslItem = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid NCBI CSL JSON: {}", e)))?;

        if item.status.as_deref() == Some("error") {
            return Err(SourceError::NotFound);
        }

        let doi = non_empty(item.doi);
        let url = non_empty(item.url).or_else(|| doi.as_deref().map(doi_url));
        let kind = item
            .kind
            .as_deref()
            .map(RecordType::from_source_label)
            .unwrap_or(RecordType::ArticleJournal);

        let mut record = Record::new(kind);
        record.title = non_empty(item.title);
        record.container_title = non_empty(item.container_title);
        record.author = normalize_authors(item.author);
        record.issued = item.issued.as_ref().and_then(StructuredDate::from_csl_value);
        record.doi = doi;
        record.url = url;
        record.issn = item.issn;
        record.pmid = item.pmid;
        record.pmcid = item.pmcid;
        record.volume = item.volume;
        record.issue = item.issue;
        record.page = item.page;
        record.publisher_place = item.publisher_place;
        record.source = item.source;
        record.online = Some(true);
        record.accessed = Some(StructuredDate::now());
        Ok(record)
    }
}

#[async_trait]
impl Resolver for NcbiSource {
    fn metadata(&self) -> SourceMetadata {
        match self.database {
            NcbiDatabase::PubMed => SourceMetadata {
                id: "pubmed",
                name: "PubMed",
                description: "NCBI citation exporter for PubMed ids",
                base_url: NCBI_BASE_URL,
            },
            NcbiDatabase::Pmc => SourceMetadata {
                id: "pmc",
                name: "PubMed Central",
                description: "NCBI citation exporter for PubMed Central ids",
                base_url: NCBI_BASE_URL,
            },
        }
    }

    async fn resolve_record(&self, identifier: &str) -> Result<Record, SourceError> {
        let id = self.database.clean(identifier);
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(SourceError::InvalidIdentifier(identifier.to_string()));
        }
        let source_id = self.metadata().id;
        let response = fetch_success(&self.client, source_id, &self.export_url(&id)).await?;
        Self::parse_csl_response(&response.body)
    }
}
