use pagegen_types::{ProductRequest, BRAND};
use std::fmt::Write;

/// Rendered in place of any optional field the request did not carry.
pub const NOT_PROVIDED: &str = "미입력";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    Simple,
    Detailed,
}

impl PromptMode {
    pub fn of(request: &ProductRequest) -> Self {
        if request.is_detailed() {
            Self::Detailed
        } else {
            Self::Simple
        }
    }
}

const CONTENT_SCHEMA: &str = r#"{
  "heroTitle": "MZ세대가 주목할 역사적 스토리를 담은 제목",
  "heroSubtitle": "제품의 매력을 2줄로 설명",
  "badge1": "핵심 장점 1",
  "badge2": "핵심 장점 2",
  "badge3": "핵심 장점 3",
  "productCleanName": "브랜드를 제거한 깨끗한 제품명",
  "storyContent": "제품의 역사나 유래를 담은 3~4문장의 스토리",
  "why1Title": "장점 제목 1",
  "why1Text": "장점 설명 1",
  "why2Title": "장점 제목 2",
  "why2Text": "장점 설명 2",
  "why3Title": "장점 제목 3",
  "why3Text": "장점 설명 3",
  "why4Title": "장점 제목 4",
  "why4Text": "장점 설명 4",
  "how1Title": "활용법 1",
  "how1Text": "자세한 활용 방법 설명 1",
  "how2Title": "활용법 2",
  "how2Text": "자세한 활용 방법 설명 2",
  "storageType": "보관 방법",
  "shippingTitle": "배송 안내 제목",
  "shippingContent": "배송 안내 문구",
  "ingredientTable": "",
  "nutritionTable": "",
  "allergyInfo": "알레르기 유발 성분 (없으면 빈 문자열)",
  "footerTitle": "제품의 핵심 메시지",
  "footerSubtitle": "마무리 문구 (줄바꿈은 <br>)",
  "footerBadge1": "제품 특징 1",
  "footerBadge2": "제품 특징 2",
  "footerBadge3": "제품 특징 3"
}"#;

fn field(out: &mut String, label: &str, value: Option<&str>) {
    let _ = writeln!(out, "- {label}: {}", value.unwrap_or(NOT_PROVIDED));
}

/// Prompt asking the provider for page copy as a single JSON object.
pub fn build(request: &ProductRequest) -> String {
    let mode = PromptMode::of(request);
    let mut out = String::new();
    let _ = writeln!(out, "당신은 \"{BRAND}\" 브랜드의 상세페이지 콘텐츠 전문가입니다.");
    let _ = writeln!(
        out,
        "36만 구독자가 신뢰하는 브랜드의 톤앤매너(MZ세대 친화적, 간결하고 임팩트 있게)를 유지하세요."
    );
    match mode {
        PromptMode::Detailed => {
            let _ = writeln!(
                out,
                "입력된 상세 정보를 우선 사용하고, 성분 정보는 절대 변경하지 마세요. 부족한 부분만 보완하세요."
            );
        }
        PromptMode::Simple => {
            let _ = writeln!(
                out,
                "상세 정보가 부족합니다. 제품명과 카테고리, 제품의 역사적 배경을 바탕으로 나머지 내용을 완성하세요."
            );
        }
    }
    out.push_str("\n제품 정보:\n");
    field(&mut out, "제품명", Some(request.product_name()));
    field(&mut out, "카테고리", request.category.as_deref());
    field(&mut out, "구성 및 규격", request.composition.as_deref());
    field(&mut out, "소비기한", request.expiry.as_deref());
    field(&mut out, "제품종류", request.product_type.as_deref());
    field(&mut out, "보관방법", request.storage_type.as_deref());
    field(&mut out, "원재료 및 성분", request.ingredients.as_deref());
    field(&mut out, "제품특성", request.characteristics.as_deref());
    field(&mut out, "알레르기 정보", request.allergy_info.as_deref());
    field(&mut out, "강조 포인트 1", request.badge1.as_deref());
    field(&mut out, "강조 포인트 2", request.badge2.as_deref());
    field(&mut out, "배송 안내 제목", request.shipping_title.as_deref());
    field(&mut out, "배송 안내", request.shipping_info.as_deref());
    field(&mut out, "성분표 이미지", request.ingredients_image.as_deref());
    let images = request.images.join(", ");
    field(
        &mut out,
        "제품 이미지",
        Some(images.as_str()).filter(|s| !s.is_empty()),
    );
    let _ = writeln!(
        out,
        "- HACCP: {}",
        if request.haccp { "인증" } else { "미인증" }
    );
    field(&mut out, "주의사항", request.caution.as_deref());
    out.push_str("\n다음 JSON 형식으로만 응답하세요:\n");
    out.push_str(CONTENT_SCHEMA);
    out.push_str(
        "\n\n중요: 반드시 위 키를 모두 가진 유효한 JSON 객체 하나만 반환하고, 설명이나 주석, 코드 블록 없이 JSON만 출력하세요.",
    );
    out
}

/// Prompt extracting product fields from a free-form Korean description.
pub fn parse(text: &str) -> String {
    format!(
        r#"다음은 식품 제품에 대한 자유 형식 설명입니다. 내용을 분석하여 제품 정보를 추출하세요.

설명:
"""
{text}
"""

다음 JSON 형식으로만 응답하세요. 알 수 없는 값은 빈 문자열로 두세요:
{{
  "productName": "제품명",
  "category": "카테고리",
  "composition": "구성 및 규격",
  "expiry": "소비기한",
  "productType": "제품종류",
  "storageType": "보관방법 (냉동/냉장/실온)",
  "ingredients": "원재료 및 성분 (원문 그대로)",
  "characteristics": "제품특성",
  "caution": "주의사항",
  "haccp": false,
  "allergyInfo": "알레르기 정보"
}}

중요: 유효한 JSON 객체 하나만 출력하세요."#
    )
}

/// Prompt converting a comma-separated ingredient list into table rows.
pub fn ingredient_table(ingredients: &str) -> String {
    format!(
        r#"다음은 쉼표로 구분된 식품 원재료 목록입니다:
{ingredients}

각 원재료를 표의 한 행으로 변환하세요.
- name: 원재료명 (함량과 괄호 내용 제외)
- percentage: "45%" 같은 숫자+퍼센트 표기가 있으면 그대로, 없으면 "미표기"
- origin: 괄호 안의 원산지가 있으면 그대로, 없으면 "미표기"

다음 JSON 형식으로만 응답하세요:
{{"rows": [{{"name": "밀가루", "percentage": "45%", "origin": "미국산, 호주산"}}]}}"#
    )
}
