//! Binds generated copy and the product request into the page template.
//!
//! The template contract:
//! * `{{key}}` placeholders for every [`GeneratedContent`] field plus
//!   `{{productName}}`, replaced verbatim;
//! * fixed HTML comments marking where computed blocks are injected;
//! * element ids whose visibility is decided per request and rendered as an
//!   inline `display: none` style.
//!
//! Binding never fails. Anchors or ids missing from the template leave the
//! output unchanged.

use crate::template::PageTemplate;
use askama::Template;
use log_error::LogError;
use pagegen_types::{GeneratedContent, ProductRequest};
use regex::Regex;
use std::collections::BTreeMap;

pub const IMAGES_ANCHOR: &str = "<!-- 이미지가 여기에 삽입됩니다 -->";
pub const SPECS_ANCHOR: &str = "<!-- 제품 정보가 여기에 삽입됩니다 -->";
pub const INGREDIENTS_ANCHOR: &str = "<!-- 성분 정보가 여기에 삽입됩니다 -->";
pub const NOTICE_ANCHOR: &str = "<!-- 주의사항 알림이 여기에 삽입됩니다 -->";
pub const WARNING_ANCHOR: &str = "<!-- 경고 문구가 여기에 삽입됩니다 -->";

pub const VERIFICATION_CARD: &str = "verificationCard";
pub const HACCP_CARD: &str = "haccpCard";
pub const INGREDIENTS_SECTION: &str = "ingredientsSection";

pub const SHIPPING_TITLE: &str = "shippingTitle";
pub const SHIPPING_CONTENT: &str = "shippingContent";

pub const HIDDEN_STYLE: &str = r#"style="display: none;""#;

#[derive(Template)]
#[template(source = "{{ text }}", ext = "html")]
struct Text<'a> {
    text: &'a str,
}

#[derive(Template)]
#[template(path = "blocks/images.html")]
struct Images<'a> {
    images: &'a [String],
    alt: &'a str,
}

struct SpecCard<'a> {
    icon: &'static str,
    label: &'static str,
    value: &'a str,
}

#[derive(Template)]
#[template(path = "blocks/spec_cards.html")]
struct SpecCards<'a> {
    cards: Vec<SpecCard<'a>>,
}

#[derive(Template)]
#[template(path = "blocks/ingredients.html")]
struct Ingredients<'a> {
    image: Option<&'a str>,
    alt: &'a str,
    table: Option<&'a str>,
    raw: Option<&'a str>,
    nutrition: Option<&'a str>,
    allergy: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "blocks/caution_notice.html")]
struct CautionNotice<'a> {
    caution: &'a str,
}

#[derive(Template)]
#[template(path = "blocks/warning.html")]
struct Warning<'a> {
    caution: &'a str,
}

fn render(t: impl Template) -> String {
    t.render()
        .log_error("Unable to render page block")
        .unwrap_or_default()
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Visibility of every toggled element, decided once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility(BTreeMap<&'static str, bool>);

impl Visibility {
    pub fn compute(request: &ProductRequest, has_ingredients: bool) -> Self {
        let mut map = BTreeMap::new();
        map.insert(HACCP_CARD, request.haccp);
        map.insert(VERIFICATION_CARD, !request.haccp);
        map.insert(INGREDIENTS_SECTION, has_ingredients);
        Self(map)
    }

    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.0.get(id).copied()
    }

    /// Rewrites each known id to carry the hidden style exactly when it is
    /// hidden, dropping whatever style the template had on it.
    pub fn apply(&self, html: &str) -> String {
        let mut html = html.to_string();
        for (id, visible) in &self.0 {
            let pattern = format!(
                r#"id="{}"(\s+style="display:\s*none;?")?"#,
                regex::escape(id)
            );
            let Some(re) = Regex::new(&pattern).log_error("Unable to build visibility pattern")
            else {
                continue;
            };
            let replacement = if *visible {
                format!(r#"id="{id}""#)
            } else {
                format!(r#"id="{id}" {HIDDEN_STYLE}"#)
            };
            html = re.replace_all(&html, replacement.as_str()).to_string();
        }
        html
    }
}

/// Offset in `content` of the `</tag>` that closes the enclosing element,
/// skipping nested elements with the same tag.
fn closing_tag(content: &str, tag: &str) -> Option<usize> {
    let re = Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(tag)))
        .log_error("Unable to build closing tag pattern")?;
    let mut depth = 0usize;
    for caps in re.captures_iter(content) {
        let m = caps.get(0)?;
        let closing = caps.get(1).is_some_and(|c| !c.as_str().is_empty());
        if !closing {
            depth += 1;
        } else if depth == 0 {
            return Some(m.start());
        } else {
            depth -= 1;
        }
    }
    None
}

/// Replaces the whole content of the element carrying `id`, inline markup
/// included.
fn replace_element_text(html: String, id: &str, text: &str) -> String {
    let pattern = format!(
        r#"<([A-Za-z][A-Za-z0-9]*)\b[^>]*\bid="{}"[^>]*>"#,
        regex::escape(id)
    );
    let Some(re) = Regex::new(&pattern).log_error("Unable to build element pattern") else {
        return html;
    };
    let Some((start, tag)) = re
        .captures(&html)
        .and_then(|caps| Some((caps.get(0)?.end(), caps.get(1)?.as_str().to_string())))
    else {
        return html;
    };
    let Some(len) = closing_tag(&html[start..], &tag) else {
        return html;
    };
    let end = start + len;
    format!("{}{}{}", &html[..start], render(Text { text }), &html[end..])
}

fn spec_cards(request: &ProductRequest) -> Vec<SpecCard<'_>> {
    [
        ("fa-box", "구성 및 규격", &request.composition),
        ("fa-calendar", "소비기한", &request.expiry),
        ("fa-tag", "제품종류", &request.product_type),
        ("fa-snowflake", "보관방법", &request.storage_type),
        ("fa-truck", "배송정보", &request.shipping_info),
    ]
    .into_iter()
    .filter_map(|(icon, label, value)| {
        value.as_deref().map(|value| SpecCard { icon, label, value })
    })
    .collect()
}

fn ingredients_block<'a>(
    content: &'a GeneratedContent,
    request: &'a ProductRequest,
) -> Option<Ingredients<'a>> {
    let image = request.ingredients_image.as_deref();
    let table = non_empty(&content.ingredient_table);
    let raw = request.ingredients.as_deref();
    if image.is_none() && table.is_none() && raw.is_none() {
        return None;
    }
    Some(Ingredients {
        image,
        alt: request.product_name(),
        table,
        raw: if table.is_some() { None } else { raw },
        nutrition: non_empty(&content.nutrition_table),
        allergy: request
            .allergy_info
            .as_deref()
            .or_else(|| non_empty(&content.allergy_info)),
    })
}

pub fn bind(template: &PageTemplate, content: &GeneratedContent, request: &ProductRequest) -> String {
    let Some(source) = template.html() else {
        log::warn!("Page template is not loaded, rendering an empty page");
        return String::new();
    };
    let mut html = source.to_string();
    let product_name = request.product_name();

    for (key, value) in content.fields() {
        html = html.replace(&format!("{{{{{key}}}}}"), value);
    }
    html = html.replace("{{productName}}", product_name);

    if let Some(title) = request.shipping_title.as_deref() {
        html = replace_element_text(html, SHIPPING_TITLE, title);
    }
    if let Some(info) = request.shipping_info.as_deref() {
        html = replace_element_text(html, SHIPPING_CONTENT, info);
    }

    if !request.images.is_empty() {
        let images = render(Images {
            images: &request.images,
            alt: product_name,
        });
        html = html.replace(IMAGES_ANCHOR, &images);
    }

    let cards = spec_cards(request);
    if !cards.is_empty() {
        html = html.replace(SPECS_ANCHOR, &render(SpecCards { cards }));
    }

    let ingredients = ingredients_block(content, request);
    let visibility = Visibility::compute(request, ingredients.is_some());
    if let Some(block) = ingredients {
        html = html.replace(INGREDIENTS_ANCHOR, &render(block));
    }

    match request.caution.as_deref() {
        Some(caution) => {
            html = html.replace(NOTICE_ANCHOR, &render(CautionNotice { caution }));
            html = html.replace(WARNING_ANCHOR, &render(Warning { caution }));
        }
        None => html = html.replace(NOTICE_ANCHOR, ""),
    }

    visibility.apply(&html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagegen_types::content::FIELD_NAMES;

    fn page() -> PageTemplate {
        PageTemplate::from_html(include_str!("../public/template-final.html"))
    }

    fn hidden(html: &str, id: &str) -> bool {
        html.contains(&format!(r#"id="{id}" {HIDDEN_STYLE}"#))
    }

    fn request() -> ProductRequest {
        ProductRequest::new("[최씨남매] 함흥냉면")
    }

    #[test]
    fn resolves_every_known_placeholder() {
        let request = request();
        let content = GeneratedContent::fallback(&request);
        let html = bind(&page(), &content, &request);
        for name in FIELD_NAMES.iter().chain(["productName"].iter()) {
            assert!(!html.contains(&format!("{{{{{name}}}}}")), "{name} left unresolved");
        }
        assert!(html.contains(&content.hero_subtitle));
        assert!(html.contains("<title>[최씨남매] 함흥냉면 - 만원요리 최씨남매</title>"));
    }

    #[test]
    fn empty_content_still_resolves_placeholders() {
        let request = request();
        let html = bind(&page(), &GeneratedContent::default(), &request);
        assert!(!html.contains("{{heroTitle}}"));
        assert!(!html.contains("{{footerBadge3}}"));
    }

    #[test]
    fn trust_cards_are_mutually_exclusive() {
        let mut request = request();
        let content = GeneratedContent::default();
        for haccp in [true, false] {
            request.haccp = haccp;
            let html = bind(&page(), &content, &request);
            assert_eq!(hidden(&html, HACCP_CARD), !haccp);
            assert_eq!(hidden(&html, VERIFICATION_CARD), haccp);
        }
    }

    #[test]
    fn visibility_overrides_template_defaults() {
        let template = PageTemplate::from_html(format!(
            r#"<div id="verificationCard" {HIDDEN_STYLE}></div><div id="haccpCard"></div>"#
        ));
        let html = bind(&template, &GeneratedContent::default(), &request());
        assert!(!hidden(&html, VERIFICATION_CARD));
        assert!(hidden(&html, HACCP_CARD));
        assert_eq!(html.matches("display: none").count(), 1);
    }

    #[test]
    fn ingredients_section_hidden_without_sources() {
        let html = bind(&page(), &GeneratedContent::default(), &request());
        assert!(hidden(&html, INGREDIENTS_SECTION));
        assert!(html.contains(INGREDIENTS_ANCHOR));
    }

    #[test]
    fn ingredients_section_shows_each_source() {
        let mut with_raw = request();
        with_raw.ingredients = Some("밀가루 45% (미국산)".to_string());
        let html = bind(&page(), &GeneratedContent::default(), &with_raw);
        assert!(!hidden(&html, INGREDIENTS_SECTION));
        assert!(html.contains("<p class=\"mb-4\">밀가루 45% (미국산)</p>"));

        let mut with_image = request();
        with_image.ingredients_image = Some("https://img.manwonyori.co.kr/report.png".to_string());
        let html = bind(&page(), &GeneratedContent::default(), &with_image);
        assert!(!hidden(&html, INGREDIENTS_SECTION));
        assert!(html.contains("report.png"));

        let content = GeneratedContent {
            ingredient_table: "<table id=\"rows\"></table>".to_string(),
            nutrition_table: "<table id=\"nutrition\"></table>".to_string(),
            ..Default::default()
        };
        let mut with_table = with_raw.clone();
        with_table.allergy_info = Some("밀, 대두".to_string());
        let html = bind(&page(), &content, &with_table);
        assert!(!hidden(&html, INGREDIENTS_SECTION));
        assert!(html.contains("<table id=\"rows\"></table>"));
        assert!(!html.contains("<p class=\"mb-4\">밀가루 45% (미국산)</p>"));
        assert!(html.contains("<table id=\"nutrition\"></table>"));
        assert!(html.contains("밀, 대두"));
        let table_at = html.find("id=\"rows\"").unwrap();
        assert!(table_at < html.find("id=\"nutrition\"").unwrap());
    }

    #[test]
    fn images_are_injected_in_order() {
        let mut request = request();
        let html = bind(&page(), &GeneratedContent::default(), &request);
        assert!(html.contains(IMAGES_ANCHOR));

        request.images = vec!["first.jpg".to_string(), "second.jpg".to_string()];
        let html = bind(&page(), &GeneratedContent::default(), &request);
        assert!(!html.contains(IMAGES_ANCHOR));
        assert!(html.contains(r#"<img src="first.jpg" alt="[최씨남매] 함흥냉면""#));
        assert!(html.find("first.jpg").unwrap() < html.find("second.jpg").unwrap());
    }

    #[test]
    fn spec_cards_only_when_fields_present() {
        let mut request = request();
        let html = bind(&page(), &GeneratedContent::default(), &request);
        assert!(html.contains(SPECS_ANCHOR));
        assert!(!html.contains("spec-card"));

        request.expiry = Some("제조일로부터 12개월".to_string());
        request.shipping_info = Some("7세트까지 합배송".to_string());
        let html = bind(&page(), &GeneratedContent::default(), &request);
        assert!(!html.contains(SPECS_ANCHOR));
        assert_eq!(html.matches("spec-card").count(), 2);
        assert!(html.contains("제조일로부터 12개월"));
    }

    #[test]
    fn user_shipping_text_overrides_generated() {
        let mut request = request();
        request.shipping_title = Some("당일 발송".to_string());
        request.shipping_info = Some("오후 2시 이전 주문 <당일> 출고".to_string());
        let content = GeneratedContent {
            shipping_title: "AI 배송 제목".to_string(),
            shipping_content: "AI 배송 문구".to_string(),
            ..Default::default()
        };
        let html = bind(&page(), &content, &request);
        assert!(!html.contains("AI 배송 제목"));
        assert!(!html.contains("AI 배송 문구"));
        assert!(html.contains(">당일 발송</h3>"));
        assert!(html.contains(">오후 2시 이전 주문 &lt;당일&gt; 출고</p>"));
    }

    #[test]
    fn shipping_override_replaces_inline_markup() {
        let mut request = request();
        request.shipping_title = Some("당일 발송".to_string());
        let content = GeneratedContent {
            shipping_title: "<strong>AI</strong> 배송 제목".to_string(),
            ..Default::default()
        };
        let html = bind(&page(), &content, &request);
        assert!(html.contains(">당일 발송</h3>"));
        assert!(!html.contains("<strong>AI</strong>"));
        assert!(!html.contains("배송 제목</h3>"));

        request.shipping_info = Some("합배송 가능".to_string());
        let template = PageTemplate::from_html(
            r#"<div><p id="shippingContent">앞 <p>중첩</p> 뒤</p><p>다음</p></div>"#,
        );
        assert_eq!(
            bind(&template, &GeneratedContent::default(), &request),
            r#"<div><p id="shippingContent">합배송 가능</p><p>다음</p></div>"#
        );
    }

    #[test]
    fn caution_fills_notice_and_warning() {
        let mut request = request();
        let html = bind(&page(), &GeneratedContent::default(), &request);
        assert!(!html.contains(NOTICE_ANCHOR));
        assert!(html.contains(WARNING_ANCHOR));
        assert!(!html.contains("caution-notice"));

        request.caution = Some("조리 시 화상에 주의하세요".to_string());
        let html = bind(&page(), &GeneratedContent::default(), &request);
        assert_eq!(html.matches("조리 시 화상에 주의하세요").count(), 2);
        assert!(html.contains("caution-notice"));
        assert!(!html.contains(WARNING_ANCHOR));
    }

    #[test]
    fn missing_anchors_are_ignored() {
        let mut request = request();
        request.images = vec!["a.jpg".to_string()];
        request.caution = Some("주의".to_string());
        let template = PageTemplate::from_html("<h1>{{heroTitle}}</h1>");
        let content = GeneratedContent {
            hero_title: "제목".to_string(),
            ..Default::default()
        };
        assert_eq!(bind(&template, &content, &request), "<h1>제목</h1>");
    }

    #[test]
    fn unloaded_template_renders_nothing() {
        let template = PageTemplate::Unloaded {
            reason: "missing".to_string(),
        };
        assert_eq!(bind(&template, &GeneratedContent::default(), &request()), "");
    }

    #[test]
    fn binding_does_not_touch_shared_template() {
        let template = page();
        let before = template.html().unwrap().to_string();
        let _ = bind(&template, &GeneratedContent::default(), &request());
        assert_eq!(template.html().unwrap(), before);
    }
}
