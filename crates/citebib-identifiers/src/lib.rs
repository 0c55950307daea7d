//! Identifier classification for citebib
//!
//! This crate decides which kind of bibliographic identifier a piece of
//! free text holds, and strips the label prefixes each metadata source
//! cannot digest:
//! - URL (any absolute http/https link)
//! - DOI (bare, `doi:`-labelled, or `doi.org` form)
//! - PMCID and PMID (PubMed Central / PubMed)
//! - ISBN-10 and ISBN-13 (hyphen and space insensitive)

pub mod classifier;
pub mod cleaners;

pub use classifier::*;
pub use cleaners::*;
