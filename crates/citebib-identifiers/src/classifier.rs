//! Identifier classification from free text

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Kinds of identifier a citation can be resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    /// Absolute http(s) link to a webpage
    Url,
    /// Digital Object Identifier
    Doi,
    /// PubMed Central identifier
    Pmcid,
    /// PubMed identifier
    Pmid,
    /// International Standard Book Number
    Isbn,
}

impl IdentifierKind {
    /// All kinds, in classification priority order
    pub fn all() -> &'static [IdentifierKind] {
        &[
            IdentifierKind::Url,
            IdentifierKind::Doi,
            IdentifierKind::Pmcid,
            IdentifierKind::Pmid,
            IdentifierKind::Isbn,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Url => "url",
            IdentifierKind::Doi => "doi",
            IdentifierKind::Pmcid => "pmcid",
            IdentifierKind::Pmid => "pmid",
            IdentifierKind::Isbn => "isbn",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            IdentifierKind::Url => "URL",
            IdentifierKind::Doi => "DOI",
            IdentifierKind::Pmcid => "PMCID",
            IdentifierKind::Pmid => "PMID",
            IdentifierKind::Isbn => "ISBN",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown identifier kind: {0}")]
pub struct UnknownKindError(pub String);

impl FromStr for IdentifierKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdentifierKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownKindError(s.to_string()))
    }
}

lazy_static! {
    static ref URL_REGEX: Regex = Regex::new(r"https?://[^\s]+").unwrap();

    // Tried in order against the text with any `doi:` labels removed.
    // The last pattern is unanchored but stops at `/`, so it only finds
    // slash-free DOI-like tokens such as `10.5555.abc` inside prose.
    static ref DOI_REGEXES: Vec<Regex> = vec![
        Regex::new(r"(?i)^\s*(https?://(?:dx\.)?doi\.org/(10\.\d{4,9}/[-._;()/:A-Z0-9\[\]<>]+))\s*$").unwrap(),
        Regex::new(r"(?i)^\s*((?:dx\.)?doi\.org/(10\.\d{4,9}/[-._;()/:A-Z0-9\[\]<>]+))\s*$").unwrap(),
        Regex::new(r"(?i)^\s*(10\.\d{4,9}/[-._;()/:A-Z0-9\[\]<>]+)\s*$").unwrap(),
        Regex::new(r"(?i)\b10\.\d{4,9}[-.\w]+\b").unwrap(),
    ];

    static ref DOI_LABEL_REGEX: Regex = Regex::new(r"(?i)doi:\s*").unwrap();
    static ref PMCID_LABEL_REGEX: Regex = Regex::new(r"(?i)pmcid:\s*").unwrap();

    static ref PMCID_REGEX: Regex = Regex::new(r"(?i)^PMC\d+$").unwrap();
    static ref PMID_REGEX: Regex = Regex::new(r"(?i)^pmid:\d+$").unwrap();

    // Matched after hyphens and whitespace are removed
    static ref ISBN_REGEXES: Vec<Regex> = vec![
        Regex::new(r"^(?:97[89])\d{10}$").unwrap(),
        Regex::new(r"^\d{13}$").unwrap(),
        Regex::new(r"(?i)^\d{9}[\dX]$").unwrap(),
        Regex::new(r"^10\.(?:978|979)\.\d{2,8}/\d{2,7}$").unwrap(),
    ];

    static ref ISBN_LABEL_REGEX: Regex = Regex::new(r"(?i)^isbn(?:1[03])?:?").unwrap();
    static ref SEPARATORS_REGEX: Regex = Regex::new(r"[-\s]+").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Classify free text as one identifier kind.
///
/// Rules are tried in strict priority order (URL, DOI, PMCID, PMID, ISBN)
/// and the first match wins. Because the URL rule comes first, a DOI written
/// as `https://doi.org/10.xxxx/...` classifies as [`IdentifierKind::Url`].
///
/// Returns `None` when nothing matches.
pub fn classify(text: &str) -> Option<IdentifierKind> {
    if URL_REGEX.is_match(text) {
        return Some(IdentifierKind::Url);
    }

    let without_doi_label = DOI_LABEL_REGEX.replace_all(text, "");
    if DOI_REGEXES.iter().any(|re| re.is_match(&without_doi_label)) {
        return Some(IdentifierKind::Doi);
    }

    let without_pmcid_label = PMCID_LABEL_REGEX.replace_all(text.trim(), "");
    if PMCID_REGEX.is_match(&without_pmcid_label) {
        return Some(IdentifierKind::Pmcid);
    }

    let compact = WHITESPACE_REGEX.replace_all(text, "");
    if PMID_REGEX.is_match(&compact) {
        return Some(IdentifierKind::Pmid);
    }

    let separated = SEPARATORS_REGEX.replace_all(text, "");
    let isbn_candidate = ISBN_LABEL_REGEX.replace(&separated, "");
    if ISBN_REGEXES.iter().any(|re| re.is_match(&isbn_candidate)) {
        return Some(IdentifierKind::Isbn);
    }

    None
}
