// ABOUTME: OPDS catalog parsing implementation using feed-rs.
// ABOUTME: Merges Atom entries with raw Zim extension records into ZimFileMeta.

use crate::count_parse::parse_count;
use crate::error::OpdsError;
use crate::models::{Catalog, ZimFileMeta};
use crate::tags::{parse_tags, ParsedTags};
use crate::zim_ext::{parse_zim_extensions, EntryZimExt};
use feed_rs::model::{Entry, FeedType, Link};
use feed_rs::parser::{ParseErrorKind, ParseFeedError};

/// Link rel prefix for archive acquisition links.
const REL_ACQUISITION: &str = "http://opds-spec.org/acquisition";
/// Link rel for the entry thumbnail.
const REL_THUMBNAIL: &str = "http://opds-spec.org/image/thumbnail";
/// Media type advertised for Zim archives.
const ZIM_MEDIA_TYPE: &str = "application/x-zim";
/// Prefix catalogs put on UUID identifiers.
const URN_UUID_PREFIX: &str = "urn:uuid:";

/// Parses catalog bytes into a Catalog.
///
/// # Arguments
/// * `data` - Raw Atom/OPDS catalog bytes
///
/// # Returns
/// * `Ok(Catalog)` - Successfully parsed catalog (possibly empty)
/// * `Err(OpdsError)` - The document is malformed or has no Atom feed root
pub fn parse_catalog_bytes(data: &[u8]) -> Result<Catalog, OpdsError> {
    let parsed = feed_rs::parser::parse(data).map_err(map_parse_error)?;

    // An OPDS catalog is an Atom document. feed-rs happily parses other
    // vocabularies (RSS, JSON Feed); those have no catalog root.
    if parsed.feed_type != FeedType::Atom {
        return Err(OpdsError::MissingFeedRoot);
    }

    // Second pass over the raw XML for the Zim elements the generic Atom
    // model drops (name, language, tags, counts, publisher, icon).
    let exts = parse_zim_extensions(data);

    let mut catalog = Catalog::default();
    for (idx, entry) in parsed.entries.iter().enumerate() {
        let ext = exts
            .entries
            .get(&entry.id)
            .or_else(|| exts.entries_by_index.get(idx))
            .cloned()
            .unwrap_or_default();
        if let Some(meta) = map_entry(entry, &ext) {
            catalog.insert(meta);
        }
    }

    Ok(catalog)
}

/// Single-pass parser over one catalog document.
///
/// Owns the raw bytes and the latest parse result. Re-running `parse` is a
/// pure function of the stored bytes: the same input yields an equivalent
/// catalog. `parse` takes `&mut self`, so the borrow checker rules out
/// concurrent mutation; callers share the parsed records, not the parser.
#[derive(Debug, Default)]
pub struct OpdsParser {
    data: Vec<u8>,
    result: Option<Catalog>,
}

impl OpdsParser {
    /// Stores the raw catalog bytes without parsing them. Empty input is
    /// accepted here; `parse` is where it fails.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        OpdsParser {
            data: data.into(),
            result: None,
        }
    }

    /// Parses the stored bytes, replacing any previous result.
    ///
    /// On failure no result survives, not even a previous one: callers never
    /// observe a partially built catalog.
    pub fn parse(&mut self) -> Result<(), OpdsError> {
        self.result = None;
        self.result = Some(parse_catalog_bytes(&self.data)?);
        Ok(())
    }

    /// Identifiers in document order. Empty until a parse has succeeded.
    pub fn zim_file_ids(&self) -> &[String] {
        self.result.as_ref().map(Catalog::ids).unwrap_or_default()
    }

    /// Looks up one record by exact identifier match. None is the expected
    /// answer for identifiers obtained elsewhere, not an error.
    pub fn get_zim_file(&self, id: &str) -> Option<&ZimFileMeta> {
        self.result.as_ref().and_then(|c| c.get(id))
    }

    /// The full parse result, when the last parse succeeded.
    pub fn catalog(&self) -> Option<&Catalog> {
        self.result.as_ref()
    }
}

/// Maps feed-rs failures onto the two-level catalog error taxonomy.
fn map_parse_error(err: ParseFeedError) -> OpdsError {
    match err {
        ParseFeedError::ParseError(ParseErrorKind::NoFeedRoot) => OpdsError::MissingFeedRoot,
        other => OpdsError::malformed(other),
    }
}

/// Merges one Atom entry and its extension record into a ZimFileMeta.
/// Returns None when the entry carries no usable identifier; an unkeyable
/// record is dropped rather than aborting its siblings.
fn map_entry(entry: &Entry, ext: &EntryZimExt) -> Option<ZimFileMeta> {
    let id = normalize_identifier(ext.id.as_deref()?)?;

    let tags = parse_tags(ext.tags.as_deref().unwrap_or(""));
    let (url, size) = extract_download_link(&entry.links);

    Some(ZimFileMeta {
        id,
        name: ext.name.clone().unwrap_or_default(),
        title: entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default(),
        description: entry
            .summary
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default(),
        language_code: ext
            .language
            .clone()
            .or_else(|| entry.language.clone())
            .unwrap_or_default(),
        creation_date: ext.updated.clone().unwrap_or_default(),
        creator: entry
            .authors
            .first()
            .map(|p| p.name.clone())
            .unwrap_or_default(),
        publisher: ext.publisher.clone().unwrap_or_default(),
        category: extract_category(ext, &tags),
        url,
        icon_url: extract_icon_url(&entry.links, ext),
        size,
        article_count: ext
            .article_count
            .as_deref()
            .and_then(parse_count)
            .unwrap_or(0),
        media_count: ext
            .media_count
            .as_deref()
            .and_then(parse_count)
            .unwrap_or(0),
        has_pictures: tags.pictures.unwrap_or(false),
        has_videos: tags.videos.unwrap_or(false),
        has_index: tags.ftindex.unwrap_or(false),
        has_details: tags.details.unwrap_or(false),
    })
}

/// Strips the urn:uuid: prefix catalogs put on identifiers.
/// Returns None when nothing usable remains.
fn normalize_identifier(raw: &str) -> Option<String> {
    let id = raw.trim();
    let id = id.strip_prefix(URN_UUID_PREFIX).unwrap_or(id);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Picks the archive download link: the OPDS acquisition rel wins, any link
/// typed application/x-zim is the fallback. Size comes from its length
/// attribute, defaulting to 0.
fn extract_download_link(links: &[Link]) -> (String, u64) {
    let acquisition = links.iter().find(|l| {
        l.rel
            .as_deref()
            .map_or(false, |rel| rel.starts_with(REL_ACQUISITION))
    });
    let by_type = || {
        links.iter().find(|l| {
            l.media_type
                .as_deref()
                .map_or(false, |t| t.starts_with(ZIM_MEDIA_TYPE))
        })
    };

    match acquisition.or_else(by_type) {
        Some(link) => (link.href.clone(), link.length.unwrap_or(0)),
        None => (String::new(), 0),
    }
}

/// Icon comes from the OPDS thumbnail link, else the entry's icon element.
fn extract_icon_url(links: &[Link], ext: &EntryZimExt) -> String {
    for link in links {
        if link.rel.as_deref() == Some(REL_THUMBNAIL) {
            return link.href.clone();
        }
    }
    ext.icon.clone().unwrap_or_default()
}

/// Category comes from the category element when present, else the
/// _category tag marker.
fn extract_category(ext: &EntryZimExt, tags: &ParsedTags) -> String {
    if let Some(category) = ext.category.as_deref() {
        let category = category.trim();
        if !category.is_empty() {
            return category.to_string();
        }
    }
    tags.category.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(
            normalize_identifier("urn:uuid:1234-abcd"),
            Some("1234-abcd".to_string())
        );
        assert_eq!(
            normalize_identifier("wikipedia_en_all"),
            Some("wikipedia_en_all".to_string())
        );
        assert_eq!(normalize_identifier("urn:uuid:"), None);
        assert_eq!(normalize_identifier("   "), None);
    }

    #[test]
    fn test_missing_feed_root_for_rss() {
        // Well-formed XML, wrong vocabulary
        let rss = r#"<?xml version="1.0"?>
        <rss version="2.0">
            <channel>
                <title>Not a catalog</title>
                <item><title>Post</title></item>
            </channel>
        </rss>"#;

        let err = parse_catalog_bytes(rss.as_bytes()).unwrap_err();
        assert!(matches!(err, OpdsError::MissingFeedRoot));
    }

    #[test]
    fn test_extract_download_link_prefers_acquisition_rel() {
        let atom = r#"<feed xmlns="http://www.w3.org/2005/Atom">
            <entry>
                <id>book</id>
                <link rel="http://opds-spec.org/image/thumbnail" type="image/png"
                      href="https://library.example.org/icon.png"/>
                <link rel="http://opds-spec.org/acquisition/open-access"
                      type="application/x-zim"
                      href="https://library.example.org/book.zim" length="5000"/>
            </entry>
        </feed>"#;

        let parsed = feed_rs::parser::parse(atom.as_bytes()).unwrap();
        let (url, size) = extract_download_link(&parsed.entries[0].links);
        assert_eq!(url, "https://library.example.org/book.zim");
        assert_eq!(size, 5000);
    }

    #[test]
    fn test_extract_download_link_falls_back_to_media_type() {
        let atom = r#"<feed xmlns="http://www.w3.org/2005/Atom">
            <entry>
                <id>book</id>
                <link rel="enclosure" type="application/x-zim"
                      href="https://library.example.org/book.zim" length="77"/>
            </entry>
        </feed>"#;

        let parsed = feed_rs::parser::parse(atom.as_bytes()).unwrap();
        let (url, size) = extract_download_link(&parsed.entries[0].links);
        assert_eq!(url, "https://library.example.org/book.zim");
        assert_eq!(size, 77);
    }

    #[test]
    fn test_no_download_link_defaults() {
        let atom = r#"<feed xmlns="http://www.w3.org/2005/Atom">
            <entry><id>book</id></entry>
        </feed>"#;

        let parsed = feed_rs::parser::parse(atom.as_bytes()).unwrap();
        let (url, size) = extract_download_link(&parsed.entries[0].links);
        assert_eq!(url, "");
        assert_eq!(size, 0);
    }

    #[test]
    fn test_parser_state_after_failure() {
        let mut parser = OpdsParser::new(&b"<feed><entry>"[..]);
        assert!(parser.parse().is_err());
        assert!(parser.zim_file_ids().is_empty());
        assert!(parser.get_zim_file("anything").is_none());
        assert!(parser.catalog().is_none());
    }
}
