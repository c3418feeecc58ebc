//! Extractor for pasted product registration sheets, one `<label>  <value>`
//! pair per line with columns separated by two or more spaces.

use lazy_regex::regex;
use pagegen_types::ProductRequest;

/// Label to field, in match priority.
const LABELS: [(&str, Field); 7] = [
    ("제품명", Field::ProductName),
    ("구성 및 규격", Field::Composition),
    ("소비기한", Field::Expiry),
    ("제품종류", Field::ProductType),
    ("유형", Field::StorageType),
    ("성분", Field::Ingredients),
    ("제품특성", Field::Characteristics),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ProductName,
    Composition,
    Expiry,
    ProductType,
    StorageType,
    Ingredients,
    Characteristics,
}

fn value(line: &str) -> Option<String> {
    let value = regex!(r"\s{2,}")
        .split(line)
        .nth(1)?
        .replace('"', "")
        .trim()
        .to_string();
    Some(value).filter(|v| !v.is_empty())
}

/// Builds a request from labelled lines. Unlabelled lines are ignored and a
/// later line for the same label overwrites an earlier one.
pub fn extract(text: &str) -> ProductRequest {
    let mut request = ProductRequest::default();
    for line in text.lines().map(str::trim) {
        let Some((_, field)) = LABELS.iter().find(|(label, _)| line.contains(label)) else {
            continue;
        };
        let value = value(line);
        match field {
            Field::ProductName => request.product_name = value.unwrap_or_default(),
            Field::Composition => request.composition = value,
            Field::Expiry => request.expiry = value,
            Field::ProductType => request.product_type = value,
            Field::StorageType => request.storage_type = value,
            Field::Ingredients => request.ingredients = value,
            Field::Characteristics => request.characteristics = value,
        }
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"
제품명    [최씨남매] 함흥 물냉면
구성 및 규격    면 160g x 5, 육수 330g x 5
소비기한    "제조일로부터 12개월"
제품종류  면류
유형    냉동
성분    밀가루 45% (미국산, 호주산), 감자전분 35% (국산)
비고 한 칸 띄어쓰기는 무시
"#;

    #[test]
    fn maps_labels_to_fields() {
        let request = extract(SHEET);
        assert_eq!(request.product_name, "[최씨남매] 함흥 물냉면");
        assert_eq!(request.composition.as_deref(), Some("면 160g x 5, 육수 330g x 5"));
        assert_eq!(request.expiry.as_deref(), Some("제조일로부터 12개월"));
        assert_eq!(request.product_type.as_deref(), Some("면류"));
        assert_eq!(request.storage_type.as_deref(), Some("냉동"));
        assert_eq!(
            request.ingredients.as_deref(),
            Some("밀가루 45% (미국산, 호주산), 감자전분 35% (국산)")
        );
        assert_eq!(request.characteristics, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn first_matching_label_wins() {
        let request = extract("식품의 유형 및 성분    냉동\n제품특성    쫄깃한 면발");
        assert_eq!(request.storage_type.as_deref(), Some("냉동"));
        assert_eq!(request.ingredients, None);
        assert_eq!(request.characteristics.as_deref(), Some("쫄깃한 면발"));
    }

    #[test]
    fn single_column_lines_yield_nothing() {
        let request = extract("제품명 함흥냉면\n\n");
        assert!(request.validate().is_err());
    }
}
