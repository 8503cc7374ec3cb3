// ABOUTME: OPDS catalog parsing library for Zim archive libraries.
// ABOUTME: Provides catalog parsing, tag/count helpers, and URL resolution utilities.

pub mod count_parse;
pub mod error;
pub mod models;
pub mod parser;
pub mod tags;
pub mod zim_ext;

pub use count_parse::parse_count;
pub use error::OpdsError;
pub use models::{Catalog, ZimFileMeta};
pub use parser::{parse_catalog_bytes, OpdsParser};
pub use tags::{parse_tags, tag_bool, ParsedTags};

// ----------------------------------------------------------------------------
// URL utilities
// ----------------------------------------------------------------------------

use url::Url;

/// Resolves a catalog href against the library base URL.
///
/// Real catalogs serve relative hrefs (download links, favicons); the parser
/// passes them through verbatim, so consumers join them against the host they
/// fetched the catalog from. Absolute hrefs are returned unchanged. Returns
/// None for an empty href or an unusable base.
pub fn resolve_catalog_href(base: &str, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}
