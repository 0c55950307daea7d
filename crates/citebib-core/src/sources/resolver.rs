//! Identifier resolution: classify, pick a source, normalize the record

use std::time::Duration;

use citebib_identifiers::{classify, IdentifierKind};
use tracing::debug;

use super::crossref::CrossrefSource;
use super::openlibrary::OpenLibrarySource;
use super::pubmed::NcbiSource;
use super::traits::{resolve_or_none, Resolver};
use super::webpage::WebpageSource;
use crate::builder::CitationRecordBuilder;
use crate::config::ResolverConfig;
use crate::domain::Record;
use crate::http::{HttpClient, HttpError};

/// One source per identifier kind, sharing an HTTP client
#[derive(Clone, Debug)]
pub struct IdentifierResolver {
    webpage: WebpageSource,
    crossref: CrossrefSource,
    openlibrary: OpenLibrarySource,
    pubmed: NcbiSource,
    pmc: NcbiSource,
}

impl IdentifierResolver {
    pub fn new(config: &ResolverConfig) -> Result<Self, HttpError> {
        let client = HttpClient::new(
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            webpage: WebpageSource::new(client.clone(), config.cors_relay.clone()),
            crossref: CrossrefSource::new(client.clone(), config.crossref_base_url.clone()),
            openlibrary: OpenLibrarySource::new(
                client.clone(),
                config.openlibrary_base_url.clone(),
            ),
            pubmed: NcbiSource::pubmed(client.clone(), config.ncbi_base_url.clone()),
            pmc: NcbiSource::pmc(client, config.ncbi_base_url.clone()),
        })
    }

    pub fn source_for(&self, kind: IdentifierKind) -> &dyn Resolver {
        match kind {
            IdentifierKind::Url => &self.webpage,
            IdentifierKind::Doi => &self.crossref,
            IdentifierKind::Isbn => &self.openlibrary,
            IdentifierKind::Pmid => &self.pubmed,
            IdentifierKind::Pmcid => &self.pmc,
        }
    }

    /// Classify `text` and resolve it. `None` when the text is not a
    /// recognized identifier or its source yields nothing.
    pub async fn resolve(&self, text: &str) -> Option<Record> {
        let Some(kind) = classify(text) else {
            debug!(text, "Text is not a recognized identifier");
            return None;
        };
        self.resolve_kind(kind, text).await
    }

    /// Resolve `text` as an identifier of the given kind
    pub async fn resolve_kind(&self, kind: IdentifierKind, text: &str) -> Option<Record> {
        debug!(kind = %kind, text, "Resolving identifier");
        let raw = resolve_or_none(self.source_for(kind), text).await?;
        Some(CitationRecordBuilder::from_resolved(raw))
    }
}
