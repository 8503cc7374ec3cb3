// ABOUTME: Integration tests for catalog utility modules.
// ABOUTME: Tests tag parsing, count parsing, and href resolution.

use zimcat_opds::{parse_count, parse_tags, resolve_catalog_href, tag_bool};

mod tag_tests {
    use super::*;

    #[test]
    fn test_feature_flags() {
        let tags = parse_tags("_pictures:yes;_videos:no;_ftindex:yes;_details:yes");
        assert_eq!(tags.pictures, Some(true));
        assert_eq!(tags.videos, Some(false));
        assert_eq!(tags.ftindex, Some(true));
        assert_eq!(tags.details, Some(true));
    }

    #[test]
    fn test_category_marker() {
        let tags = parse_tags("wikipedia;_category:wikipedia");
        assert_eq!(tags.category.as_deref(), Some("wikipedia"));
        assert_eq!(tags.plain, vec!["wikipedia".to_string()]);
    }

    #[test]
    fn test_whitespace_tolerated() {
        let tags = parse_tags("  youtube ; _videos:yes ;");
        assert_eq!(tags.videos, Some(true));
        assert_eq!(tags.plain, vec!["youtube".to_string()]);
    }

    #[test]
    fn test_tag_bool_case_insensitive() {
        assert_eq!(tag_bool("Yes"), Some(true));
        assert_eq!(tag_bool("NO"), Some(false));
        assert_eq!(tag_bool("maybe"), None);
    }
}

mod count_tests {
    use super::*;

    #[test]
    fn test_valid_counts() {
        assert_eq!(parse_count("123456"), Some(123456));
        assert_eq!(parse_count(" 7 "), Some(7));
    }

    #[test]
    fn test_invalid_counts() {
        assert!(parse_count("").is_none());
        assert!(parse_count("huge").is_none());
        assert!(parse_count("1.5").is_none());
    }
}

mod url_tests {
    use super::*;

    #[test]
    fn test_relative_href_joined() {
        assert_eq!(
            resolve_catalog_href("https://library.example.org", "/download/book.zim"),
            Some("https://library.example.org/download/book.zim".to_string())
        );
    }

    #[test]
    fn test_query_href_joined() {
        assert_eq!(
            resolve_catalog_href(
                "https://library.example.org/catalog/root.xml",
                "/meta?name=favicon&content=book"
            ),
            Some("https://library.example.org/meta?name=favicon&content=book".to_string())
        );
    }

    #[test]
    fn test_absolute_href_unchanged() {
        assert_eq!(
            resolve_catalog_href("https://library.example.org", "https://cdn.example.org/a.zim"),
            Some("https://cdn.example.org/a.zim".to_string())
        );
    }

    #[test]
    fn test_empty_href_is_none() {
        assert_eq!(resolve_catalog_href("https://library.example.org", ""), None);
    }

    #[test]
    fn test_unusable_base_is_none() {
        assert_eq!(resolve_catalog_href("not a url", "/download/book.zim"), None);
    }
}
