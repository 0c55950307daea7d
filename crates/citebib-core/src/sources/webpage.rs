//! Webpage source: fetch a page and read its head metadata

use async_trait::async_trait;
use citebib_identifiers::extract_url;

use super::html::{ElementSelector, HtmlDocument, PageField};
use super::traits::{fetch_success, Resolver, SourceError, SourceMetadata};
use crate::domain::{Author, Record, RecordType, StructuredDate};
use crate::http::HttpClient;

const BYLINE_AUTHOR: ElementSelector = ElementSelector {
    tag: None,
    classes: &["author"],
    attrs: &[("rel", "author")],
};

// New York Times style byline
const SITE_BYLINE: ElementSelector = ElementSelector {
    tag: Some("span"),
    classes: &["css-1baulvz", "last-byline"],
    attrs: &[("itemprop", "name")],
};

const PUBLICATION_DATE: ElementSelector = ElementSelector::class(&["publication-date"]);

const AUTHOR_FIELDS: &[PageField] = &[
    PageField::ElementText(BYLINE_AUTHOR),
    PageField::MetaName("author"),
    PageField::MetaName("article:author"),
    PageField::ElementText(SITE_BYLINE),
];

const ISSUED_FIELDS: &[PageField] = &[
    PageField::MetaName("date"),
    PageField::MetaName("article:published_time"),
    PageField::MetaProperty("article:published_time"),
    PageField::MetaName("article:modified_time"),
    PageField::MetaProperty("article:modified_time"),
    PageField::MetaName("og:updated_time"),
    PageField::MetaProperty("og:updated_time"),
    PageField::ElementText(PUBLICATION_DATE),
];

const URL_FIELDS: &[PageField] = &[
    PageField::MetaProperty("og:url"),
    PageField::MetaName("url"),
    PageField::LinkRel("canonical"),
];

#[derive(Clone, Debug)]
pub struct WebpageSource {
    client: HttpClient,
    relay: Option<String>,
}

impl WebpageSource {
    /// `relay` is a prefix the url-encoded target is appended to
    pub fn new(client: HttpClient, relay: Option<String>) -> Self {
        Self { client, relay }
    }

    pub fn fetch_url(&self, url: &str) -> String {
        match &self.relay {
            Some(relay) => format!("{relay}{}", urlencoding::encode(url)),
            None => url.to_string(),
        }
    }

    /// Build a webpage record from a page fetched from `url`
    pub fn parse_page(html: &str, url: &str) -> Record {
        let doc = HtmlDocument::parse(html);

        let mut record = Record::new(RecordType::Webpage);
        record.title = doc.title().map(str::to_string);
        record.author = Author::from_full_names(doc.all_of(AUTHOR_FIELDS));
        record.container_title = doc.first(&PageField::MetaProperty("og:site_name"));
        record.publisher = doc.first(&PageField::MetaProperty("article:publisher"));
        record.issued = doc.first_parsed(ISSUED_FIELDS, StructuredDate::parse);
        record.url = Some(doc.first_of(URL_FIELDS).unwrap_or_else(|| url.to_string()));
        record.accessed = Some(StructuredDate::now());
        record
    }
}

#[async_trait]
impl Resolver for WebpageSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: "webpage",
            name: "Webpage",
            description: "HTML head metadata of an arbitrary page",
            base_url: "",
        }
    }

    async fn resolve_record(&self, identifier: &str) -> Result<Record, SourceError> {
        let url = extract_url(identifier)
            .ok_or_else(|| SourceError::InvalidIdentifier(identifier.to_string()))?;
        let response = fetch_success(&self.client, "webpage", &self.fetch_url(&url)).await?;
        Ok(Self::parse_page(&response.body, &url))
    }
}
