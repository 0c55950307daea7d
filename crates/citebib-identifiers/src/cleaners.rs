//! Label stripping and normalization applied before an identifier is sent
//! to its metadata source

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DOI_LABEL_REGEX: Regex = Regex::new(r"(?i)doi:\s*").unwrap();
    static ref DOI_RESOLVER_PREFIX_REGEX: Regex =
        Regex::new(r"(?i)^(?:https?://)?(?:dx\.)?doi\.org/").unwrap();
    static ref PMID_LABEL_REGEX: Regex = Regex::new(r"(?i)pmid:\s*|\s+").unwrap();
    static ref PMCID_LABEL_REGEX: Regex = Regex::new(r"(?i)pmcid:\s*|PMC|\s+").unwrap();
    static ref ISBN_LABEL_REGEX: Regex = Regex::new(r"(?i)^\s*isbn(?:-?1[03])?:?").unwrap();
    static ref URL_REGEX: Regex = Regex::new(r"https?://[^\s]+").unwrap();
    static ref DOI_TOKEN_REGEX: Regex = Regex::new(r"(?i)10\.\d{4,9}[^\s]*").unwrap();
}

/// The first http(s) link in `text`, without trailing sentence punctuation
pub fn extract_url(text: &str) -> Option<String> {
    let found = URL_REGEX.find(text)?.as_str();
    Some(
        found
            .trim_end_matches(['.', ',', ';', ':', '!', '"', '\''])
            .to_string(),
    )
}

/// Strip `doi:` labels and any `doi.org` resolver prefix from a DOI.
///
/// When the DOI sits inside surrounding words, only the DOI token is kept.
pub fn clean_doi(doi: &str) -> String {
    let unlabelled = DOI_LABEL_REGEX.replace_all(doi, "");
    let bare = DOI_RESOLVER_PREFIX_REGEX.replace(unlabelled.trim(), "");
    let token = if bare.contains(char::is_whitespace) {
        DOI_TOKEN_REGEX.find(&bare).map_or(&*bare, |m| m.as_str())
    } else {
        &*bare
    };
    trim_trailing_punctuation(token)
}

/// Strip `pmid:` labels and whitespace, leaving the numeric id
pub fn clean_pmid(pmid: &str) -> String {
    PMID_LABEL_REGEX.replace_all(pmid, "").into_owned()
}

/// Strip `pmcid:` labels, the `PMC` prefix and whitespace, leaving the numeric id
pub fn clean_pmcid(pmcid: &str) -> String {
    PMCID_LABEL_REGEX.replace_all(pmcid, "").into_owned()
}

/// Normalize ISBN by removing any label, hyphens and spaces
pub fn normalize_isbn(isbn: &str) -> String {
    ISBN_LABEL_REGEX
        .replace(isbn, "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect::<String>()
        .to_uppercase()
}

/// Remove trailing punctuation that might have been captured from prose
fn trim_trailing_punctuation(doi: &str) -> String {
    let mut s = doi.to_string();
    while let Some(c) = s.chars().last() {
        if c == '.' || c == ',' || c == ';' || c == ')' || c == ']' {
            s.pop();
        } else {
            break;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_doi() {
        assert_eq!(clean_doi("doi: 10.1038/nphys1170"), "10.1038/nphys1170");
        assert_eq!(clean_doi("DOI:10.1038/nphys1170."), "10.1038/nphys1170");
        assert_eq!(clean_doi("dx.doi.org/10.1038/nphys1170"), "10.1038/nphys1170");
        assert_eq!(
            clean_doi("https://doi.org/10.1038/nphys1170"),
            "10.1038/nphys1170"
        );
    }

    #[test]
    fn test_clean_doi_keeps_only_token_in_prose() {
        assert_eq!(clean_doi("as shown in 10.5555.abc, later"), "10.5555.abc");
        assert_eq!(
            clean_doi("  10.1002/(SICI)1097-4679(199911)55:11<1401::AID-JCLP4>3.0.CO;2-G  "),
            "10.1002/(SICI)1097-4679(199911)55:11<1401::AID-JCLP4>3.0.CO;2-G"
        );
    }

    #[test]
    fn test_extract_url() {
        assert_eq!(
            extract_url("see http://example.org/a?b=c for more").as_deref(),
            Some("http://example.org/a?b=c")
        );
        assert_eq!(
            extract_url("https://example.com/article.").as_deref(),
            Some("https://example.com/article")
        );
        assert_eq!(extract_url("https://example.com/x").as_deref(), Some("https://example.com/x"));
        assert_eq!(extract_url("no link here"), None);
    }

    #[test]
    fn test_clean_pubmed_ids() {
        assert_eq!(clean_pmid("PMID: 31452104"), "31452104");
        assert_eq!(clean_pmcid("pmcid: PMC1234567"), "1234567");
        assert_eq!(clean_pmcid("PMC 1234567"), "1234567");
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn("978-0-306-40615-7"), "9780306406157");
        assert_eq!(normalize_isbn("ISBN-10: 0-8044-2957-x"), "080442957X");
        assert_eq!(normalize_isbn("0 306 40615 2"), "0306406152");
    }
}
