use serde::{Deserialize, Serialize};

use crate::de_lenient_string;

/// Marker used when a percentage or origin could not be determined.
pub const UNSPECIFIED: &str = "미표기";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IngredientRow {
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub percentage: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub origin: String,
}

impl IngredientRow {
    pub fn new<N: Into<String>>(name: N, percentage: Option<String>, origin: Option<String>) -> Self {
        Self {
            name: name.into(),
            percentage: percentage.unwrap_or_else(|| UNSPECIFIED.to_string()),
            origin: origin.unwrap_or_else(|| UNSPECIFIED.to_string()),
        }
    }

    /// Row emitted when nothing in the ingredient text could be parsed.
    pub fn parse_error() -> Self {
        Self::new("성분 정보 파싱 오류", None, None)
    }

    /// Fills blank cells with the unspecified marker.
    pub fn normalized(self) -> Self {
        let fill = |s: String| {
            let s = s.trim().to_string();
            if s.is_empty() {
                UNSPECIFIED.to_string()
            } else {
                s
            }
        };
        Self {
            name: self.name.trim().to_string(),
            percentage: fill(self.percentage),
            origin: fill(self.origin),
        }
    }
}
