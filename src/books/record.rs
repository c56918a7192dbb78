use serde::{Deserialize, Serialize};

/// Flat projection of a Google Books volume.
///
/// Every field is best-effort: anything missing upstream is empty or `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: String,
    pub isbn: Option<String>,
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<u32>,
    pub categories: Vec<String>,
    pub thumbnail: Option<String>,
}

impl BookRecord {
    /// First listed author, if any.
    pub fn primary_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }
}
