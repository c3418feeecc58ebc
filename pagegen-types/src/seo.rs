use serde::Serialize;

/// Search metadata returned next to the rendered page.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeoResult {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub keyword_count: usize,
    pub author: String,
    pub copyright: String,
    pub summary: String,
    pub brief: String,
    pub alt_text: String,
}

