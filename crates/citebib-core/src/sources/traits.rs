//! Common traits for metadata sources

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::domain::Record;
use crate::http::{HttpClient, HttpError, HttpResponse};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(HttpError),
    #[error("{source_id} answered with status {status}")]
    Status { source_id: &'static str, status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Rate limited")]
    RateLimit,
    #[error("No record found")]
    NotFound,
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl From<HttpError> for SourceError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RateLimited => SourceError::RateLimit,
            other => SourceError::Http(other),
        }
    }
}

/// Metadata about a source
pub struct SourceMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_url: &'static str,
}

/// A metadata source that turns one kind of identifier into a record
#[async_trait]
pub trait Resolver: Send + Sync {
    fn metadata(&self) -> SourceMetadata;

    /// Fetch and normalize the record for `identifier`.
    ///
    /// The identifier may still carry its label (`doi:`, `pmid:`, ...); each
    /// source strips its own.
    async fn resolve_record(&self, identifier: &str) -> Result<Record, SourceError>;
}

/// Run a resolver, logging any failure and reporting it as `None`
pub async fn resolve_or_none(resolver: &dyn Resolver, identifier: &str) -> Option<Record> {
    match resolver.resolve_record(identifier).await {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(
                source = resolver.metadata().id,
                identifier,
                error = %e,
                "Failed to resolve identifier"
            );
            None
        }
    }
}

/// GET `url` and require a 2xx status
pub(crate) async fn fetch_success(
    client: &HttpClient,
    source_id: &'static str,
    url: &str,
) -> Result<HttpResponse, SourceError> {
    let response = client.get(url).await?;
    check_status(source_id, response)
}

pub(crate) fn check_status(
    source_id: &'static str,
    response: HttpResponse,
) -> Result<HttpResponse, SourceError> {
    if response.is_success() {
        return Ok(response);
    }
    match response.status {
        404 => Err(SourceError::NotFound),
        status => Err(SourceError::Status { source_id, status }),
    }
}

/// Landing page for a DOI, used when a source omits `URL`
pub fn doi_url(doi: &str) -> String {
    format!("https://doi.org/{doi}")
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
