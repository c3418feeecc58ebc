use lazy_regex::regex;
use serde::{Deserialize, Deserializer};

pub mod content;
pub mod ingredient;
pub mod product;
pub mod seo;

pub use content::GeneratedContent;
pub use ingredient::IngredientRow;
pub use product::{ProductRequest, ValidationError};
pub use seo::SeoResult;

/// Brand every page is published under.
pub const BRAND: &str = "만원요리 최씨남매";

/// Splits a product name like `[최씨남매] 함흥냉면` into its bracketed brand
/// token and the remaining clean name.
pub fn split_brand(product_name: &str) -> (Option<String>, String) {
    let re = regex!(r"\[(.+?)\]");
    match re.captures(product_name) {
        Some(c) => {
            let brand = c.get(1).map(|m| m.as_str().trim().to_string());
            let clean = re.replace(product_name, "").trim().to_string();
            (brand.filter(|b| !b.is_empty()), clean)
        }
        None => (None, product_name.trim().to_string()),
    }
}

/// Truncates to `max` characters, appending `...` when something was cut.
pub fn truncate_chars(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return input.to_string();
    }
    let mut out = input.chars().take(max).collect::<String>();
    out.push_str("...");
    out
}

pub fn empty_string_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = de_lenient_string(de)?;
    let value = value.trim();
    if value.is_empty() {
        Ok(None)
    } else {
        Ok(Some(value.to_string()))
    }
}

/// Accepts strings, numbers, booleans, arrays and null where a string is
/// expected. Providers are not consistent about value types.
pub fn de_lenient_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(de)?;
    Ok(value_to_string(value))
}

fn value_to_string(value: serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .into_iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        obj @ Value::Object(_) => obj.to_string(),
    }
}

pub fn de_lenient_bool<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    Ok(match Value::deserialize(de)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().map(|n| n != 0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "인증"
        ),
        _ => false,
    })
}

pub fn de_lenient_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    let list = match Value::deserialize(de)? {
        Value::Array(items) => items.into_iter().map(value_to_string).collect(),
        Value::String(s) => s.lines().map(str::to_string).collect(),
        _ => vec![],
    };
    Ok(list
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_bracketed_brand() {
        assert_eq!(
            split_brand("[최씨남매] 함흥냉면"),
            (Some("최씨남매".to_string()), "함흥냉면".to_string())
        );
        assert_eq!(split_brand(" 물냉면 "), (None, "물냉면".to_string()));
    }

    #[test]
    fn truncates_by_chars() {
        assert_eq!(truncate_chars("함흥냉면", 20), "함흥냉면");
        assert_eq!(truncate_chars("가나다라마", 2), "가나...");
    }
}
