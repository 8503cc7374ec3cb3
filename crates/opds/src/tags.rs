// ABOUTME: Zim tag-string parsing.
// ABOUTME: Splits semicolon lists and extracts the _category and feature-flag markers.

/// Markers extracted from a catalog entry's tag string, e.g.
/// `wikipedia;_category:wikipedia;_pictures:yes;_videos:no;_ftindex:yes`.
///
/// Marker fields stay None when the marker is absent or its value is junk;
/// callers decide the default.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedTags {
    pub category: Option<String>,
    pub pictures: Option<bool>,
    pub videos: Option<bool>,
    pub details: Option<bool>,
    pub ftindex: Option<bool>,
    /// Labels without an underscore marker prefix.
    pub plain: Vec<String>,
}

/// Parses a semicolon-separated tag string into markers and plain labels.
pub fn parse_tags(raw: &str) -> ParsedTags {
    let mut out = ParsedTags::default();

    for part in raw.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let Some(marker) = part.strip_prefix('_') else {
            out.plain.push(part.to_string());
            continue;
        };

        // Marker without a value carries no information.
        let Some((key, value)) = marker.split_once(':') else {
            continue;
        };

        match key {
            "category" => {
                let value = value.trim();
                if !value.is_empty() {
                    out.category = Some(value.to_string());
                }
            }
            "pictures" => out.pictures = tag_bool(value),
            "videos" => out.videos = tag_bool(value),
            "details" => out.details = tag_bool(value),
            "ftindex" => out.ftindex = tag_bool(value),
            _ => {}
        }
    }

    out
}

/// Interprets a marker value: "yes" is true, "no" is false, anything else
/// is unknown (case-insensitive).
pub fn tag_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}
