//! Normalized bibliographic content (CSL-JSON flavoured)

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::lenient;
use super::{Author, StructuredDate};

/// CSL item type discriminator
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    ArticleJournal,
    ArticleMagazine,
    ArticleNewspaper,
    Book,
    Chapter,
    PaperConference,
    Report,
    Thesis,
    Webpage,
    /// Any other CSL type, kept verbatim
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::ArticleJournal => "article-journal",
            RecordType::ArticleMagazine => "article-magazine",
            RecordType::ArticleNewspaper => "article-newspaper",
            RecordType::Book => "book",
            RecordType::Chapter => "chapter",
            RecordType::PaperConference => "paper-conference",
            RecordType::Report => "report",
            RecordType::Thesis => "thesis",
            RecordType::Webpage => "webpage",
            RecordType::Other(s) => s,
        }
    }

    /// Map a metadata source's type vocabulary onto CSL.
    ///
    /// Crossref reports `journal-article` where CSL expects `article-journal`.
    pub fn from_source_label(label: &str) -> Self {
        match label.trim() {
            "journal-article" => RecordType::ArticleJournal,
            "book-chapter" => RecordType::Chapter,
            "proceedings-article" => RecordType::PaperConference,
            "dissertation" => RecordType::Thesis,
            other => RecordType::from(other.to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "article-journal" => RecordType::ArticleJournal,
            "article-magazine" => RecordType::ArticleMagazine,
            "article-newspaper" => RecordType::ArticleNewspaper,
            "book" => RecordType::Book,
            "chapter" => RecordType::Chapter,
            "paper-conference" => RecordType::PaperConference,
            "report" => RecordType::Report,
            "thesis" => RecordType::Thesis,
            "webpage" => RecordType::Webpage,
            _ => RecordType::Other(s),
        }
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        match t {
            RecordType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The content of a citation.
///
/// `type` selects the CSL item type; the typed fields are the ones the
/// resolvers and editors know about, and anything else a source supplies
/// is preserved in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Mirrors the owning citation's id
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub kind: RecordType,

    #[serde(default)]
    pub author: Vec<Author>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::first_string")]
    pub title: Option<String>,

    #[serde(
        rename = "container-title",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::first_string"
    )]
    pub container_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<StructuredDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessed: Option<StructuredDate>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub publisher: Option<String>,

    #[serde(
        rename = "publisher-place",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub publisher_place: Option<String>,

    // Identifiers
    #[serde(rename = "DOI", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub doi: Option<String>,

    #[serde(rename = "ISBN", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub isbn: Option<String>,

    #[serde(rename = "ISSN", default, skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient::string_list")]
    pub issn: Vec<String>,

    #[serde(rename = "PMID", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub pmid: Option<String>,

    #[serde(rename = "PMCID", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub pmcid: Option<String>,

    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,

    // Locators
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub volume: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub issue: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub page: Option<String>,

    #[serde(
        rename = "number-of-pages",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub number_of_pages: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Record {
    /// An empty record of the given type
    pub fn new(kind: RecordType) -> Self {
        Self {
            id: String::new(),
            kind,
            author: Vec::new(),
            title: None,
            container_title: None,
            issued: None,
            accessed: None,
            publisher: None,
            publisher_place: None,
            doi: None,
            isbn: None,
            issn: Vec::new(),
            pmid: None,
            pmcid: None,
            url: None,
            volume: None,
            issue: None,
            page: None,
            number_of_pages: None,
            source: None,
            online: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Same content under a different id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
