//! Photo URLs from `=IMAGE("...")` formulas.
//!
//! Formatted reads return an empty string for image cells, so the photo
//! column is read a second time with formulas rendered and the URL is pulled
//! out of the formula text.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::Row;

/// Data-row index (0 = first row after the header) to image URL.
pub type ImageUrls = HashMap<usize, String>;

#[allow(clippy::unwrap_used)]
fn image_formula() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Anchored at the start; any trailing arguments (mode, size) are ignored.
    RE.get_or_init(|| Regex::new(r#"(?i)^=\s*image\s*\(\s*"([^"]+)""#).unwrap())
}

/// Extract the URL from `=IMAGE("https://...")`.
pub fn parse_image_formula(cell: &str) -> Option<String> {
    image_formula()
        .captures(cell)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Map a single-column formula read (starting at the first data row) to
/// row-indexed URLs. Rows without an image formula are absent.
pub fn image_urls_from_column(rows: &[Row]) -> ImageUrls {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            row.first()
                .and_then(|cell| parse_image_formula(cell))
                .map(|url| (i, url))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_formula() {
        assert_eq!(
            parse_image_formula(r#"=IMAGE("https://example.com/a.jpg")"#),
            Some("https://example.com/a.jpg".to_string())
        );
    }

    #[test]
    fn test_parse_is_case_and_space_tolerant() {
        assert_eq!(
            parse_image_formula(r#"= image ( "https://example.com/b.png" , 4, 100, 100)"#),
            Some("https://example.com/b.png".to_string())
        );
        assert_eq!(
            parse_image_formula(r#"=Image("https://example.com/c.png")"#),
            Some("https://example.com/c.png".to_string())
        );
    }

    #[test]
    fn test_non_image_cells() {
        assert_eq!(parse_image_formula(""), None);
        assert_eq!(parse_image_formula("https://example.com/a.jpg"), None);
        assert_eq!(parse_image_formula(r#"=HYPERLINK("https://example.com")"#), None);
        assert_eq!(parse_image_formula(r#"x =IMAGE("https://example.com")"#), None);
        assert_eq!(parse_image_formula(r#"=IMAGE(A2)"#), None);
    }

    #[test]
    fn test_image_urls_from_sparse_column() {
        let rows: Vec<Row> = vec![
            vec![r#"=IMAGE("https://example.com/0.jpg")"#.to_string()],
            vec![],
            vec!["no photo".to_string()],
            vec![r#"=IMAGE("https://example.com/3.jpg")"#.to_string()],
        ];

        let urls = image_urls_from_column(&rows);
        assert_eq!(urls.len(), 2);
        assert_eq!(urls.get(&0).map(String::as_str), Some("https://example.com/0.jpg"));
        assert_eq!(urls.get(&3).map(String::as_str), Some("https://example.com/3.jpg"));
        assert!(!urls.contains_key(&1));
    }
}
