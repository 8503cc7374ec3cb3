// ABOUTME: Raw XML parsing for Zim catalog elements not exposed by feed-rs.
// ABOUTME: Extracts name, language, tags, counts, publisher and icon per entry.

use quick_xml::events::{BytesRef, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;

/// Catalog-specific metadata extracted from one entry element.
#[derive(Debug, Default, Clone)]
pub struct EntryZimExt {
    /// Raw id text, before any normalization.
    pub id: Option<String>,
    /// Machine-friendly archive name.
    pub name: Option<String>,
    /// Language code text.
    pub language: Option<String>,
    /// Raw updated text, passed through as the creation date.
    pub updated: Option<String>,
    /// Raw semicolon-separated tag string.
    pub tags: Option<String>,
    /// Category element text.
    pub category: Option<String>,
    /// articleCount element text, parsed later.
    pub article_count: Option<String>,
    /// mediaCount element text, parsed later.
    pub media_count: Option<String>,
    /// Publisher name text (nested under publisher).
    pub publisher: Option<String>,
    /// Icon element text, a fallback when no thumbnail link exists.
    pub icon: Option<String>,
}

/// Extension records for a complete catalog document.
#[derive(Debug, Default, Clone)]
pub struct ParsedZimExtensions {
    /// Map from raw entry id to extension record.
    pub entries: HashMap<String, EntryZimExt>,
    /// Records by document position for entries without an id.
    pub entries_by_index: Vec<EntryZimExt>,
}

/// Collects catalog-specific elements from raw Atom bytes.
/// This extracts data that feed-rs doesn't expose for the Zim vocabulary.
/// Read errors end the pass with whatever was gathered; well-formedness is
/// judged by the structural parse, not here.
pub fn parse_zim_extensions(data: &[u8]) -> ParsedZimExtensions {
    let mut result = ParsedZimExtensions::default();
    let mut reader = Reader::from_reader(data);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();

    // Track current position in the XML structure
    let mut in_entry = false;
    let mut in_author = false;
    let mut in_publisher = false;
    let mut current_ext = EntryZimExt::default();
    let mut current_element: Option<String> = None;
    // Text accumulates across events: entity references split text content.
    let mut pending_text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let local_name = name.split(':').next_back().unwrap_or(&name);

                match local_name {
                    "entry" if !in_entry => {
                        in_entry = true;
                        in_author = false;
                        in_publisher = false;
                        current_ext = EntryZimExt::default();
                    }
                    "author" if in_entry => in_author = true,
                    "publisher" if in_entry => in_publisher = true,
                    // name appears as an entry child and nested under
                    // author/publisher; the entry-level and publisher
                    // occurrences are ours (feed-rs covers author).
                    "name" if in_publisher => {
                        current_element = Some("publisher_name".to_string());
                        pending_text.clear();
                    }
                    "id" | "language" | "updated" | "tags" | "category" | "articleCount"
                    | "mediaCount" | "icon" | "name"
                        if in_entry && !in_author && !in_publisher =>
                    {
                        current_element = Some(local_name.to_string());
                        pending_text.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                // A self-closed entry still occupies a document position, so
                // record a placeholder to keep by-index lookups aligned.
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let local_name = name.split(':').next_back().unwrap_or(&name);
                if local_name == "entry" && !in_entry {
                    result.entries_by_index.push(EntryZimExt::default());
                }
            }
            Ok(Event::Text(ref e)) => {
                if current_element.is_some() {
                    if let Ok(text) = e.decode() {
                        pending_text.push_str(&text);
                    }
                }
            }
            Ok(Event::GeneralRef(ref e)) => {
                // Catalog hrefs carry &amp; and friends; the reader reports
                // references separately from the surrounding text.
                if current_element.is_some() {
                    if let Some(ch) = resolve_entity_ref(e) {
                        pending_text.push(ch);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                // Commit accumulated text before any structural bookkeeping.
                if let Some(elem) = current_element.take() {
                    let text = std::mem::take(&mut pending_text);
                    if !text.is_empty() {
                        match elem.as_str() {
                            "id" => current_ext.id = Some(text),
                            "name" => current_ext.name = Some(text),
                            "language" => current_ext.language = Some(text),
                            "updated" => current_ext.updated = Some(text),
                            "tags" => current_ext.tags = Some(text),
                            "category" => current_ext.category = Some(text),
                            "articleCount" => current_ext.article_count = Some(text),
                            "mediaCount" => current_ext.media_count = Some(text),
                            "publisher_name" => current_ext.publisher = Some(text),
                            "icon" => current_ext.icon = Some(text),
                            _ => {}
                        }
                    }
                }

                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let local_name = name.split(':').next_back().unwrap_or(&name);

                match local_name {
                    "entry" if in_entry => {
                        let record = std::mem::take(&mut current_ext);
                        if let Some(ref id) = record.id {
                            result.entries.insert(id.clone(), record.clone());
                        }
                        result.entries_by_index.push(record);
                        in_entry = false;
                        in_author = false;
                        in_publisher = false;
                    }
                    "author" => in_author = false,
                    "publisher" => in_publisher = false,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    result
}

/// Resolves one entity reference to its character.
/// Handles numeric references and the XML predefined set; anything else
/// (undeclared custom entities) is dropped.
fn resolve_entity_ref(e: &BytesRef) -> Option<char> {
    let name = e.decode().ok()?;
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match name.as_ref() {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}
