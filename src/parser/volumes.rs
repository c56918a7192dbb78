use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::books::record::BookRecord;
use crate::utils::constants::ISBN_13;

/// ================================
/// Upstream wire format (`GET /volumes`)
/// ================================
/// Every field defaults, so absent keys never fail the parse.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumesResponse {
    pub total_items: u64,
    pub items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    pub id: String,
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub page_count: Option<u32>,
    pub categories: Vec<String>,
    pub industry_identifiers: Vec<IndustryIdentifier>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub id_type: String,
    pub identifier: String,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}

/// `pageCount` occasionally arrives as a string or a negative number.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
    .and_then(|n| u32::try_from(n).ok()))
}

/// Parse a `/volumes` body. Fails only when the body is not the expected JSON shape.
pub fn parse_volumes(body: &str) -> Result<VolumesResponse, serde_json::Error> {
    serde_json::from_str(body)
}

impl Volume {
    /// Whether any industry identifier equals `isbn` once hyphens are dropped.
    pub fn has_identifier(&self, isbn: &str) -> bool {
        self.volume_info
            .industry_identifiers
            .iter()
            .any(|id| normalize_isbn(&id.identifier) == isbn)
    }

    pub fn to_record(&self) -> BookRecord {
        let info = &self.volume_info;
        BookRecord {
            id: self.id.to_owned(),
            isbn: select_isbn(&info.industry_identifiers),
            title: info.title.clone().unwrap_or_default(),
            authors: info.authors.clone(),
            publisher: info.publisher.clone(),
            published_date: info.published_date.clone(),
            description: info.description.clone(),
            page_count: info.page_count,
            categories: info.categories.clone(),
            thumbnail: info
                .image_links
                .as_ref()
                .and_then(|links| links.thumbnail.clone().or_else(|| links.small_thumbnail.clone())),
        }
    }
}

impl VolumesResponse {
    /// Normalized records in upstream order.
    pub fn to_records(&self) -> Vec<BookRecord> {
        self.items.iter().map(Volume::to_record).collect()
    }

    /// The item carrying `isbn`, otherwise the first item.
    pub fn best_match(&self, isbn: &str) -> Option<&Volume> {
        self.items
            .iter()
            .find(|volume| volume.has_identifier(isbn))
            .or_else(|| self.items.first())
    }
}

/// ISBN_13 when tagged, otherwise the first identifier of any type.
pub fn select_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    identifiers
        .iter()
        .find(|id| id.id_type == ISBN_13)
        .or_else(|| identifiers.first())
        .map(|id| id.identifier.trim().to_owned())
        .filter(|isbn| !isbn.is_empty())
}

/// Strip whitespace and hyphens: "978-0-441-17271-9 " -> "9780441172719".
pub fn normalize_isbn(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_volume_is_flattened() {
        let body = json!({
            "totalItems": 1,
            "items": [{
                "id": "vol-1",
                "volumeInfo": {
                    "title": "Dune",
                    "authors": ["Frank Herbert"],
                    "publisher": "Ace",
                    "publishedDate": "1990-09-01",
                    "description": "Spice.",
                    "pageCount": 535,
                    "categories": ["Fiction"],
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "0441172717"},
                        {"type": "ISBN_13", "identifier": "9780441172719"}
                    ],
                    "imageLinks": {"smallThumbnail": "http://small", "thumbnail": "http://thumb"}
                }
            }]
        })
        .to_string();

        let response = parse_volumes(&body).unwrap();
        assert_eq!(response.total_items, 1);
        let records = response.to_records();
        assert_eq!(
            records,
            vec![BookRecord {
                id: "vol-1".into(),
                isbn: Some("9780441172719".into()),
                title: "Dune".into(),
                authors: vec!["Frank Herbert".into()],
                publisher: Some("Ace".into()),
                published_date: Some("1990-09-01".into()),
                description: Some("Spice.".into()),
                page_count: Some(535),
                categories: vec!["Fiction".into()],
                thumbnail: Some("http://thumb".into()),
            }]
        );
    }

    #[test]
    fn missing_fields_map_to_empty_values() {
        let body = json!({"items": [{"id": "bare", "volumeInfo": {"title": "Untitled Notes"}}]}).to_string();

        let records = parse_volumes(&body).unwrap().to_records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "Untitled Notes");
        assert!(record.authors.is_empty());
        assert_eq!(record.isbn, None);
        assert!(record.categories.is_empty());
        assert_eq!(record.thumbnail, None);
        assert_eq!(record.primary_author(), None);
    }

    #[test]
    fn missing_items_and_volume_info_do_not_fail() {
        let response = parse_volumes(r#"{"kind": "books#volumes", "totalItems": 0}"#).unwrap();
        assert!(response.to_records().is_empty());

        let records = parse_volumes(r#"{"items": [{"id": "x"}]}"#).unwrap().to_records();
        assert_eq!(records[0].id, "x");
        assert_eq!(records[0].title, "");
    }

    #[test]
    fn isbn_falls_back_to_first_identifier() {
        let ids = vec![
            IndustryIdentifier { id_type: "OTHER".into(), identifier: "UOM:39015".into() },
            IndustryIdentifier { id_type: "ISBN_10".into(), identifier: "0441172717".into() },
        ];
        assert_eq!(select_isbn(&ids), Some("UOM:39015".to_string()));
        assert_eq!(select_isbn(&[]), None);
    }

    #[test]
    fn small_thumbnail_used_when_thumbnail_missing() {
        let body = json!({"items": [{"volumeInfo": {"imageLinks": {"smallThumbnail": "http://small"}}}]}).to_string();
        let records = parse_volumes(&body).unwrap().to_records();
        assert_eq!(records[0].thumbnail.as_deref(), Some("http://small"));
    }

    #[test]
    fn odd_page_counts_are_tolerated() {
        let body = json!({"items": [
            {"volumeInfo": {"pageCount": "320"}},
            {"volumeInfo": {"pageCount": -1}},
            {"volumeInfo": {"pageCount": null}}
        ]})
        .to_string();
        let pages: Vec<Option<u32>> = parse_volumes(&body)
            .unwrap()
            .to_records()
            .into_iter()
            .map(|r| r.page_count)
            .collect();
        assert_eq!(pages, vec![Some(320), None, None]);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_volumes("<html>quota exceeded</html>").is_err());
        assert!(parse_volumes(r#"{"items": "nope"}"#).is_err());
    }

    #[test]
    fn best_match_prefers_item_with_isbn() {
        let body = json!({"items": [
            {"id": "a", "volumeInfo": {"industryIdentifiers": [{"type": "ISBN_13", "identifier": "111"}]}},
            {"id": "b", "volumeInfo": {"industryIdentifiers": [{"type": "ISBN_13", "identifier": "978-0-441"}]}}
        ]})
        .to_string();
        let response = parse_volumes(&body).unwrap();
        assert_eq!(response.best_match("9780441").map(|v| v.id.as_str()), Some("b"));
        assert_eq!(response.best_match("000").map(|v| v.id.as_str()), Some("a"));
    }

    #[test]
    fn isbn_normalization_strips_separators() {
        assert_eq!(normalize_isbn(" 978-0-441 17271-9 "), "9780441172719");
        assert_eq!(normalize_isbn("  "), "");
    }
}
