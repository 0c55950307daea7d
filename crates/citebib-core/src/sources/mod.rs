//! Metadata sources that resolve identifiers into records

pub mod crossref;
mod csl;
pub mod html;
pub mod openlibrary;
pub mod pubmed;
pub mod resolver;
pub mod traits;
pub mod webpage;

pub use crossref::*;
pub use openlibrary::*;
pub use pubmed::*;
pub use resolver::*;
pub use traits::*;
pub use webpage::*;
