//! Lightweight HTML metadata extraction
//!
//! Pages are scanned with regexes for `<meta>`, `<link>`, `<title>` and
//! simple elements; no DOM is built. Field lookups are expressed as ordered
//! lists of [`PageField`] extractors tried until one yields a value.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref META_TAG_RE: Regex = Regex::new(r#"(?is)<meta\b[^>]*>"#).unwrap();
    static ref LINK_TAG_RE: Regex = Regex::new(r#"(?is)<link\b[^>]*>"#).unwrap();
    static ref TITLE_RE: Regex = Regex::new(r#"(?is)<title[^>]*>(.*?)</title>"#).unwrap();
    // Attribute pairs: key="value" or key='value'
    static ref ATTR_RE: Regex =
        Regex::new(r#"(?i)([a-zA-Z_:\-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
    static ref OPEN_TAG_RE: Regex = Regex::new(r#"(?is)<([a-z][a-z0-9]*)\b([^>]*)>"#).unwrap();
    // Opening or closing tag; group 1 is the slash
    static ref TAG_RE: Regex = Regex::new(r#"(?is)<(/?)([a-z][a-z0-9]*)\b[^>]*>"#).unwrap();
    static ref ANY_TAG_RE: Regex = Regex::new(r#"(?s)<[^>]*>"#).unwrap();
    static ref ENTITY_RE: Regex = Regex::new(r#"&(#x[0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);"#).unwrap();
}

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Clone, Debug, PartialEq)]
pub struct MetaTag {
    pub name: Option<String>,
    pub property: Option<String>,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkTag {
    pub rel: String,
    pub href: String,
}

/// An opening tag; its text is read from the document on demand
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: HashMap<String, String>,
    content_start: usize,
}

impl Element {
    fn has_class(&self, class: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }
}

/// A CSS-like element selector: optional tag name, required classes, and
/// required attribute values
#[derive(Clone, Copy, Debug)]
pub struct ElementSelector {
    pub tag: Option<&'static str>,
    pub classes: &'static [&'static str],
    pub attrs: &'static [(&'static str, &'static str)],
}

impl ElementSelector {
    pub const fn class(class: &'static [&'static str]) -> Self {
        Self {
            tag: None,
            classes: class,
            attrs: &[],
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.tag.map_or(true, |t| element.tag.eq_ignore_ascii_case(t))
            && self.classes.iter().all(|c| element.has_class(c))
            && self
                .attrs
                .iter()
                .all(|(k, v)| element.attrs.get(*k).is_some_and(|a| a == v))
    }
}

/// One place a page may carry a value
#[derive(Clone, Copy, Debug)]
pub enum PageField {
    MetaName(&'static str),
    MetaProperty(&'static str),
    LinkRel(&'static str),
    ElementText(ElementSelector),
}

/// A page's head metadata and text elements, parsed once
#[derive(Clone, Debug, Default)]
pub struct HtmlDocument {
    source: String,
    metas: Vec<MetaTag>,
    links: Vec<LinkTag>,
    elements: Vec<Element>,
    title: Option<String>,
}

impl HtmlDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            metas: META_TAG_RE
                .find_iter(html)
                .filter_map(|m| parse_meta_tag(m.as_str()))
                .collect(),
            links: LINK_TAG_RE
                .find_iter(html)
                .filter_map(|m| parse_link_tag(m.as_str()))
                .collect(),
            elements: OPEN_TAG_RE
                .captures_iter(html)
                .filter_map(|c| {
                    let tag = c[1].to_ascii_lowercase();
                    if VOID_TAGS.contains(&tag.as_str()) || c[2].trim_end().ends_with('/') {
                        return None;
                    }
                    Some(Element {
                        attrs: parse_attrs(&c[2]),
                        content_start: c.get(0)?.end(),
                        tag,
                    })
                })
                .collect(),
            title: TITLE_RE
                .captures(html)
                .map(|c| normalize_ws(&decode_entities(&c[1])))
                .filter(|t| !t.is_empty()),
            source: html.to_string(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Every non-empty value `field` yields, in document order
    pub fn values(&self, field: &PageField) -> Vec<String> {
        let values: Vec<String> = match field {
            PageField::MetaName(name) => self
                .metas
                .iter()
                .filter(|m| m.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
                .map(|m| m.content.clone())
                .collect(),
            PageField::MetaProperty(prop) => self
                .metas
                .iter()
                .filter(|m| m.property.as_deref().is_some_and(|p| p.eq_ignore_ascii_case(prop)))
                .map(|m| m.content.clone())
                .collect(),
            PageField::LinkRel(rel) => self
                .links
                .iter()
                .filter(|l| l.rel.split_whitespace().any(|r| r.eq_ignore_ascii_case(rel)))
                .map(|l| l.href.clone())
                .collect(),
            PageField::ElementText(selector) => self
                .elements
                .iter()
                .filter(|e| selector.matches(e))
                .map(|e| self.element_text(e))
                .collect(),
        };
        values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// All descendant text of `element`, joined and whitespace-normalized
    pub fn element_text(&self, element: &Element) -> String {
        let rest = &self.source[element.content_start..];
        let end = closing_tag_offset(rest, &element.tag)
            .or_else(|| rest.find('<'))
            .unwrap_or(rest.len());
        normalize_ws(&decode_entities(&ANY_TAG_RE.replace_all(&rest[..end], "")))
    }

    pub fn first(&self, field: &PageField) -> Option<String> {
        self.values(field).into_iter().next()
    }

    /// The first value found along `chain`
    pub fn first_of(&self, chain: &[PageField]) -> Option<String> {
        chain.iter().find_map(|f| self.first(f))
    }

    /// The first value along `chain` that `accept` turns into something
    pub fn first_parsed<T>(
        &self,
        chain: &[PageField],
        accept: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        chain
            .iter()
            .flat_map(|f| self.values(f))
            .find_map(|v| accept(v.as_str()))
    }

    /// Values from every field in `chain`, deduplicated by exact match
    pub fn all_of(&self, chain: &[PageField]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for value in chain.iter().flat_map(|f| self.values(f)) {
            if !out.contains(&value) {
                out.push(value);
            }
        }
        out
    }
}

/// Offset in `rest` of the tag closing an element named `tag` whose content
/// starts at the beginning of `rest`
fn closing_tag_offset(rest: &str, tag: &str) -> Option<usize> {
    let mut depth = 1usize;
    for cap in TAG_RE.captures_iter(rest) {
        if !cap[2].eq_ignore_ascii_case(tag) {
            continue;
        }
        let whole = cap.get(0)?;
        if cap[1].is_empty() {
            if !whole.as_str().ends_with("/>") {
                depth += 1;
            }
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(whole.start());
            }
        }
    }
    None
}

fn parse_attrs(tag: &str) -> HashMap<String, String> {
    ATTR_RE
        .captures_iter(tag)
        .filter_map(|cap| {
            let val = cap.get(2).or_else(|| cap.get(3))?;
            Some((cap[1].to_ascii_lowercase(), decode_entities(val.as_str())))
        })
        .collect()
}

fn parse_meta_tag(tag: &str) -> Option<MetaTag> {
    let mut attrs = parse_attrs(tag);
    Some(MetaTag {
        content: attrs.remove("content")?,
        name: attrs.remove("name"),
        property: attrs.remove("property"),
    })
}

fn parse_link_tag(tag: &str) -> Option<LinkTag> {
    let mut attrs = parse_attrs(tag);
    Some(LinkTag {
        rel: attrs.remove("rel")?,
        href: attrs.remove("href")?,
    })
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
