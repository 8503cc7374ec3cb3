// ABOUTME: Data models for parsed OPDS catalog content.
// ABOUTME: ZimFileMeta is one advertised archive; Catalog keys records by id in document order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for one Zim archive advertised by a catalog entry.
///
/// Built once during a parse pass and never mutated afterwards. String fields
/// are empty (not absent) when the feed omits them; counts default to 0 and
/// feature flags to false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZimFileMeta {
    pub id: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub language_code: String,
    pub creation_date: String,
    pub creator: String,
    pub publisher: String,
    pub category: String,
    pub url: String,
    pub icon_url: String,
    pub size: u64,
    pub article_count: u64,
    pub media_count: u64,
    pub has_pictures: bool,
    pub has_videos: bool,
    pub has_index: bool,
    pub has_details: bool,
}

/// Result of one catalog parse: archive records keyed by identifier,
/// iterable in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    ids: Vec<String>,
    files: HashMap<String, ZimFileMeta>,
}

impl Catalog {
    /// Inserts a record keyed by its identifier.
    ///
    /// A repeated identifier overwrites the earlier record's fields but keeps
    /// its first-seen position in document order (last write wins).
    pub fn insert(&mut self, meta: ZimFileMeta) {
        let id = meta.id.clone();
        if self.files.insert(id.clone(), meta).is_none() {
            self.ids.push(id);
        }
    }

    /// Identifiers in the order their entries appeared in the feed.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Looks up one record by exact identifier match.
    pub fn get(&self, id: &str) -> Option<&ZimFileMeta> {
        self.files.get(id)
    }

    /// Number of distinct identifiers in the catalog.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Records in document order.
    pub fn iter(&self) -> impl Iterator<Item = &ZimFileMeta> {
        self.ids.iter().filter_map(|id| self.files.get(id))
    }
}
