use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::{de_lenient_bool, de_lenient_list, de_lenient_string, empty_string_as_none};

/// Product record submitted by the page form. Optional text fields are
/// `None` when missing or blank.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub product_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub composition: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub expiry: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub storage_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub ingredients: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub characteristics: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub caution: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_bool")]
    pub haccp: bool,
    #[serde(default, deserialize_with = "de_lenient_list")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub shipping_info: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub shipping_title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub badge1: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub badge2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub allergy_info: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub ingredients_image: Option<String>,
}

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[display("Invalid field {field}: {msg}")]
pub struct ValidationError {
    pub field: &'static str,
    pub msg: String,
}

impl ProductRequest {
    pub fn new<S: Into<String>>(product_name: S) -> Self {
        Self {
            product_name: product_name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.product_name.trim().is_empty() {
            return Err(ValidationError {
                field: "productName",
                msg: "제품명은 필수입니다.".to_string(),
            });
        }
        Ok(())
    }

    /// Detailed mode is used when the form carried any of the descriptive
    /// fields, simple mode otherwise.
    pub fn is_detailed(&self) -> bool {
        self.composition.is_some() || self.ingredients.is_some() || self.characteristics.is_some()
    }

    pub fn product_name(&self) -> &str {
        self.product_name.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_deserialize_as_none() {
        let req: ProductRequest = serde_json::from_str(
            r#"{"productName":"[최씨남매] 함흥냉면","category":"  ","haccp":"true","images":["a.jpg",""]}"#,
        )
        .unwrap();
        assert_eq!(req.category, None);
        assert!(req.haccp);
        assert_eq!(req.images, vec!["a.jpg".to_string()]);
        assert!(!req.is_detailed());
    }

    #[test]
    fn missing_product_name_is_rejected() {
        let req: ProductRequest = serde_json::from_str(r#"{"category":"면류"}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(err.field, "productName");
        assert!(ProductRequest::new("물냉면").validate().is_ok());
    }

    #[test]
    fn detailed_mode_follows_descriptive_fields() {
        let mut req = ProductRequest::new("물냉면");
        req.characteristics = Some("쫄깃한 면발".to_string());
        assert!(req.is_detailed());
    }
}
