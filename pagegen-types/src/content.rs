use serde::{Deserialize, Serialize};

use crate::{de_lenient_string, split_brand, ProductRequest, BRAND};

/// Copy generated for one page. Every field the page template refers to
/// is a plain `String`, so a missing value always renders as empty text.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedContent {
    #[serde(deserialize_with = "de_lenient_string")]
    pub hero_title: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub hero_subtitle: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub badge1: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub badge2: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub badge3: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub product_clean_name: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub story_content: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub why1_title: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub why1_text: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub why2_title: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub why2_text: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub why3_title: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub why3_text: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub why4_title: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub why4_text: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub how1_title: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub how1_text: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub how2_title: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub how2_text: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub storage_type: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub shipping_title: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub shipping_content: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub ingredient_table: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub nutrition_table: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub allergy_info: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub footer_title: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub footer_subtitle: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub footer_badge1: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub footer_badge2: String,
    #[serde(deserialize_with = "de_lenient_string")]
    pub footer_badge3: String,
}

/// Placeholder names understood by the page template, in substitution order.
pub const FIELD_NAMES: [&str; 30] = [
    "heroTitle",
    "heroSubtitle",
    "badge1",
    "badge2",
    "badge3",
    "productCleanName",
    "storyContent",
    "why1Title",
    "why1Text",
    "why2Title",
    "why2Text",
    "why3Title",
    "why3Text",
    "why4Title",
    "why4Text",
    "how1Title",
    "how1Text",
    "how2Title",
    "how2Text",
    "storageType",
    "shippingTitle",
    "shippingContent",
    "ingredientTable",
    "nutritionTable",
    "allergyInfo",
    "footerTitle",
    "footerSubtitle",
    "footerBadge1",
    "footerBadge2",
    "footerBadge3",
];

impl GeneratedContent {
    /// Every template field paired with its value, in `FIELD_NAMES` order.
    pub fn fields(&self) -> [(&'static str, &str); 30] {
        let values: [&str; 30] = [
            &self.hero_title,
            &self.hero_subtitle,
            &self.badge1,
            &self.badge2,
            &self.badge3,
            &self.product_clean_name,
            &self.story_content,
            &self.why1_title,
            &self.why1_text,
            &self.why2_title,
            &self.why2_text,
            &self.why3_title,
            &self.why3_text,
            &self.why4_title,
            &self.why4_text,
            &self.how1_title,
            &self.how1_text,
            &self.how2_title,
            &self.how2_text,
            &self.storage_type,
            &self.shipping_title,
            &self.shipping_content,
            &self.ingredient_table,
            &self.nutrition_table,
            &self.allergy_info,
            &self.footer_title,
            &self.footer_subtitle,
            &self.footer_badge1,
            &self.footer_badge2,
            &self.footer_badge3,
        ];
        std::array::from_fn(|i| (FIELD_NAMES[i], values[i]))
    }

    /// Decodes a recovered provider object. Unknown keys are ignored.
    pub fn from_object(object: serde_json::Map<String, serde_json::Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(object))
    }

    /// Static copy used when no provider reply could be recovered.
    pub fn fallback(request: &ProductRequest) -> Self {
        let product_name = request.product_name();
        let (_, clean_name) = split_brand(product_name);
        let storage_type = request
            .storage_type
            .clone()
            .unwrap_or_else(|| "냉동".to_string());
        Self {
            hero_title: product_name.to_string(),
            hero_subtitle: format!("{BRAND}가 엄선한 프리미엄 상품"),
            badge1: request.badge1.clone().unwrap_or_else(|| "최고 품질".to_string()),
            badge2: request.badge2.clone().unwrap_or_else(|| "빠른 배송".to_string()),
            badge3: "안전 포장".to_string(),
            product_clean_name: clean_name.clone(),
            story_content: format!(
                "{BRAND}가 직접 먹어보고 고른 {clean_name}입니다. 집에서도 간편하게 제대로 된 한 끼를 즐겨보세요."
            ),
            why1_title: "엄선된 재료".to_string(),
            why1_text: "최고급 원재료만을 사용하여 만든 프리미엄 제품입니다.".to_string(),
            why2_title: "전문가 검증".to_string(),
            why2_text: "식품 전문가들이 직접 검증한 안전한 제품입니다.".to_string(),
            why3_title: "합리적 가격".to_string(),
            why3_text: "최상의 품질을 합리적인 가격으로 제공합니다.".to_string(),
            why4_title: "신선도 보장".to_string(),
            why4_text: "철저한 온도관리로 신선함을 그대로 전달합니다.".to_string(),
            how1_title: "간편 조리".to_string(),
            how1_text: "포장을 뜯고 간단한 조리만으로 맛있게 즐기실 수 있습니다.".to_string(),
            how2_title: "다양한 활용".to_string(),
            how2_text: "여러 요리에 활용 가능한 만능 식재료입니다.".to_string(),
            storage_type,
            shipping_title: "배송 안내".to_string(),
            shipping_content: "주문 후 신선하게 포장하여 안전하게 배송해 드립니다.".to_string(),
            ingredient_table: String::new(),
            nutrition_table: String::new(),
            allergy_info: request.allergy_info.clone().unwrap_or_default(),
            footer_title: format!("집에서 만나는 {clean_name}의 맛!"),
            footer_subtitle: format!(
                "{BRAND}가 검증한 {clean_name}을<br>이제 간편하게 집에서 만나보세요!"
            ),
            footer_badge1: "대용량 구성".to_string(),
            footer_badge2: if request.haccp {
                "HACCP 인증".to_string()
            } else {
                "안전 인증".to_string()
            },
            footer_badge3: "합배송 가능".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_follow_schema_order() {
        let content = GeneratedContent {
            hero_title: "제목".to_string(),
            footer_badge3: "합배송".to_string(),
            ..Default::default()
        };
        let fields = content.fields();
        assert_eq!(fields[0], ("heroTitle", "제목"));
        assert_eq!(fields[29], ("footerBadge3", "합배송"));
        assert!(fields.iter().map(|(k, _)| *k).eq(FIELD_NAMES.iter().copied()));
    }

    #[test]
    fn decodes_loose_provider_values() {
        let object = serde_json::json!({
            "heroTitle": "함흥의 맛",
            "badge1": null,
            "badge2": 36,
            "why1Text": ["쫄깃한", "면발"],
            "unexpected": "ignored"
        });
        let serde_json::Value::Object(object) = object else {
            unreachable!()
        };
        let content = GeneratedContent::from_object(object).unwrap();
        assert_eq!(content.hero_title, "함흥의 맛");
        assert_eq!(content.badge1, "");
        assert_eq!(content.badge2, "36");
        assert_eq!(content.why1_text, "쫄깃한, 면발");
        assert_eq!(content.story_content, "");
    }

    #[test]
    fn fallback_is_derived_from_request() {
        let mut request = ProductRequest::new("[최씨남매] 함흥냉면");
        request.haccp = true;
        let content = GeneratedContent::fallback(&request);
        assert_eq!(content.hero_title, "[최씨남매] 함흥냉면");
        assert_eq!(content.product_clean_name, "함흥냉면");
        assert_eq!(content.storage_type, "냉동");
        assert_eq!(content.footer_badge2, "HACCP 인증");
        assert_eq!(content, GeneratedContent::fallback(&request));
    }
}
