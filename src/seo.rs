//! Rule-based SEO metadata. Keyword volume must be reproducible, so nothing
//! here calls a provider.

use itertools::Itertools;
use lazy_regex::regex;
use pagegen_types::{split_brand, truncate_chars, SeoResult, BRAND};

pub const MAX_KEYWORDS: usize = 50;
pub const SUMMARY_LIMIT: usize = 20;
pub const BRIEF_LIMIT: usize = 30;

const BRAND_PREFIXES: [&str; 2] = ["만원요리", "최씨남매"];

const BRAND_KEYWORDS: [&str; 10] = [
    "만원요리추천",
    "최씨남매추천",
    "만원요리배송",
    "최씨남매쇼핑",
    "만원요리할인",
    "최씨남매이벤트",
    "만원요리신제품",
    "최씨남매베스트",
    "만원요리세일",
    "최씨남매특가",
];

const INTENT_SUFFIXES: [&str; 12] = [
    "추천", "구매", "배송", "할인", "가격", "리뷰", "후기", "베스트", "인기", "판매", "쇼핑", "온라인",
];

const CATEGORY_SUFFIXES: [&str; 9] = [
    "추천", "베스트", "쇼핑", "배송", "할인", "인기", "맛집", "판매", "구매",
];

const BRAND_SUFFIXES: [&str; 6] = ["제품", "추천", "맛집", "베스트", "할인", "구매"];

const GENERIC_KEYWORDS: [&str; 10] = [
    "냉동식품",
    "간편식",
    "밀키트",
    "집밥",
    "혼밥",
    "배달음식",
    "온라인장보기",
    "식료품쇼핑",
    "푸드마켓",
    "먹거리쇼핑",
];

fn brand_group(name: &str) -> Vec<String> {
    let mut group = BRAND_PREFIXES.map(String::from).to_vec();
    group.push(BRAND_PREFIXES.concat());
    group.extend(BRAND_PREFIXES.iter().map(|p| format!("{p}{name}")));
    group.extend(BRAND_KEYWORDS.iter().map(|k| k.to_string()));
    group
}

fn name_variations(name: &str) -> Vec<String> {
    let without_units = regex!(r"(?i)\d+(?:\.\d+)?\s*(?:kg|g|ml|l)")
        .replace_all(name, "")
        .split_whitespace()
        .join(" ");
    let without_spaces = name.split_whitespace().collect::<String>();
    [name.to_string(), without_units, without_spaces]
        .into_iter()
        .chain(INTENT_SUFFIXES.iter().map(|s| format!("{name}{s}")))
        .collect()
}

fn category_group(category: &str) -> Vec<String> {
    std::iter::once(category.to_string())
        .chain(CATEGORY_SUFFIXES.iter().map(|s| format!("{category}{s}")))
        .collect()
}

fn brand_owner_group(brand: &str, name: &str) -> Vec<String> {
    let mut keywords = vec![brand.to_string(), format!("{brand}{name}")];
    keywords.extend(BRAND_SUFFIXES.iter().map(|s| format!("{brand}{s}")));
    keywords.push("인생도매".to_string());
    keywords.push(format!("인생{name}"));
    keywords
}

/// Ordered, deduplicated keyword list, capped at [`MAX_KEYWORDS`].
pub fn keywords(product_name: &str, category: Option<&str>) -> Vec<String> {
    let (brand, name) = split_brand(product_name);
    let category = category.map(str::trim).filter(|c| !c.is_empty());

    let mut all = brand_group(&name);
    all.extend(name_variations(&name));
    if let Some(category) = category {
        all.extend(category_group(category));
    }
    if let Some(brand) = &brand {
        all.extend(brand_owner_group(brand, &name));
    }
    all.extend(GENERIC_KEYWORDS.iter().map(|k| k.to_string()));

    all.into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .unique()
        .take(MAX_KEYWORDS)
        .collect()
}

pub fn synthesize(product_name: &str, category: Option<&str>) -> SeoResult {
    synthesize_for_year(product_name, category, time::OffsetDateTime::now_utc().year())
}

pub fn synthesize_for_year(product_name: &str, category: Option<&str>, year: i32) -> SeoResult {
    let product_name = product_name.trim();
    let (brand, name) = split_brand(product_name);
    let category = category.map(str::trim).filter(|c| !c.is_empty());
    let keywords = keywords(product_name, category);

    let description = match category {
        Some(category) => format!(
            "{product_name} - {BRAND} 검증 상품. {category} 카테고리 베스트셀러. 전국 배송, 신선도 보장"
        ),
        None => format!("{product_name} - {BRAND} 검증 상품. 전국 배송, 신선도 보장"),
    };
    let brief = [category.unwrap_or("추천"), brand.as_deref().unwrap_or_default(), "상품"]
        .into_iter()
        .filter(|s| !s.is_empty())
        .join(" ");

    SeoResult {
        title: format!("{product_name} | {BRAND}"),
        description,
        keyword_count: keywords.len(),
        keywords,
        author: BRAND.to_string(),
        copyright: format!("© {year} {BRAND}. All rights reserved."),
        summary: truncate_chars(&name, SUMMARY_LIMIT),
        brief: truncate_chars(&brief, BRIEF_LIMIT),
        alt_text: format!("{product_name} 상품 이미지"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keywords_are_deterministic_unique_and_capped() {
        let first = keywords("[최씨남매] 함흥냉면", Some("면류"));
        let second = keywords("[최씨남매] 함흥냉면", Some("면류"));
        assert_eq!(first, second);
        assert_eq!(first.len(), MAX_KEYWORDS);
        assert_eq!(first.iter().collect::<HashSet<_>>().len(), first.len());
        assert!(first.contains(&"만원요리함흥냉면".to_string()));
        assert!(first.contains(&"면류추천".to_string()));
        assert!(first.contains(&"최씨남매함흥냉면".to_string()));
        assert_eq!(first[0], "만원요리");
    }

    #[test]
    fn optional_groups_depend_on_inputs() {
        let plain = keywords("물냉면 500g", None);
        assert!(plain.len() <= MAX_KEYWORDS);
        assert!(plain.contains(&"물냉면".to_string()));
        assert!(plain.contains(&"물냉면500g".to_string()));
        assert!(plain.contains(&"물냉면 500g리뷰".to_string()));
        assert!(!plain.contains(&"인생도매".to_string()));
        assert!(plain.iter().all(|k| !k.is_empty()));
    }

    #[test]
    fn strips_units_followed_by_hangul() {
        let variations = name_variations("평양냉면 2kg팩");
        assert_eq!(variations[1], "평양냉면 팩");
        assert_eq!(name_variations("비빔면 500ml")[1], "비빔면");
    }

    #[test]
    fn composes_metadata() {
        let seo = synthesize_for_year("[최씨남매] 함흥냉면", Some("면류"), 2024);
        assert_eq!(seo.title, "[최씨남매] 함흥냉면 | 만원요리 최씨남매");
        assert_eq!(seo.copyright, "© 2024 만원요리 최씨남매. All rights reserved.");
        assert_eq!(seo.author, BRAND);
        assert_eq!(seo.summary, "함흥냉면");
        assert_eq!(seo.brief, "면류 최씨남매 상품");
        assert_eq!(seo.keyword_count, seo.keywords.len());
        assert!(seo.description.contains("면류 카테고리"));
        assert_eq!(seo.alt_text, "[최씨남매] 함흥냉면 상품 이미지");
    }

    #[test]
    fn summary_is_truncated() {
        let seo = synthesize_for_year("아주 긴 이름을 가진 프리미엄 수제 왕만두 세트 대용량", None, 2024);
        assert_eq!(seo.summary.chars().count(), SUMMARY_LIMIT + 3);
        assert!(seo.summary.ends_with("..."));
        assert_eq!(seo.brief, "추천 상품");
        assert!(!seo.description.contains("카테고리"));
    }
}
