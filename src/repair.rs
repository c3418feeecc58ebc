//! Best-effort recovery of a JSON object from a provider reply.
//!
//! Providers wrap JSON in code fences, prepend prose, leave raw newlines in
//! string literals or fall back to JavaScript object syntax. Recovery runs a
//! strict parse first and a lenient rewrite second; anything beyond that is
//! reported as [`MalformedResponse`] and the caller degrades to fallback data.

use derive_more::{Display, Error};
use lazy_regex::regex;
use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RepairStage {
    #[display("strict")]
    Strict,
    #[display("lenient")]
    Lenient,
}

#[derive(Debug, Display, Error)]
pub enum MalformedResponse {
    #[display("no JSON object found in reply")]
    NoObject,
    #[error(ignore)]
    #[display("unable to parse reply as JSON: {_0}")]
    Unparseable(String),
    #[display("reply JSON is not an object")]
    NotAnObject,
}

pub fn strip_fences(raw: &str) -> String {
    regex!(r"```[A-Za-z]*").replace_all(raw, "").to_string()
}

/// Span from the first `{` to the last `}`.
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Drops control characters other than newline, tab and carriage return,
/// then escapes those three where they occur inside string literals.
/// Both `"` and `'` open a literal, so JavaScript-style values are covered
/// before the lenient stage rewrites their quotes. Whitespace between tokens
/// is left alone.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for ch in text.chars() {
        if ch.is_control() && !matches!(ch, '\n' | '\t' | '\r') {
            continue;
        }
        match quote {
            Some(open) => {
                match ch {
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    '\r' => out.push_str("\\r"),
                    _ => {
                        if ch == open && !escaped {
                            quote = None;
                        }
                        out.push(ch);
                    }
                }
                escaped = ch == '\\' && !escaped;
            }
            None => {
                if matches!(ch, '"' | '\'') {
                    quote = Some(ch);
                    escaped = false;
                }
                out.push(ch);
            }
        }
    }
    out
}

/// Rewrites JavaScript-style object syntax into JSON: single quotes become
/// double quotes, bare keys are quoted and trailing commas are dropped.
pub fn loosen(text: &str) -> String {
    let text = text.replace('\'', "\"");
    let text = regex!(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").replace_all(&text, "$1\"$2\":");
    regex!(r",(\s*[}\]])").replace_all(&text, "$1").to_string()
}

fn parse_object(text: &str) -> Result<JsonObject, MalformedResponse> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(MalformedResponse::NotAnObject),
        Err(err) => Err(MalformedResponse::Unparseable(err.to_string())),
    }
}

pub fn recover_object(raw: &str) -> Result<(JsonObject, RepairStage), MalformedResponse> {
    let stripped = strip_fences(raw);
    let candidate = extract_object(&stripped).ok_or(MalformedResponse::NoObject)?;
    let candidate = sanitize(candidate);
    match parse_object(&candidate) {
        Ok(object) => return Ok((object, RepairStage::Strict)),
        Err(err) => log::debug!("Strict parse failed: {err}"),
    }
    parse_object(&loosen(&candidate)).map(|object| (object, RepairStage::Lenient))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_object_after_prose() {
        let raw = "물론입니다! 요청하신 데이터입니다.\n```json\n{\n  \"heroTitle\": \"함흥의 맛\",\n  \"badge1\": \"쫄깃\"\n}\n```\n도움이 되었길 바랍니다.";
        let (object, stage) = recover_object(raw).unwrap();
        assert_eq!(stage, RepairStage::Strict);
        assert_eq!(object["heroTitle"], "함흥의 맛");
        assert_eq!(object["badge1"], "쫄깃");
    }

    #[test]
    fn escapes_raw_newlines_inside_strings() {
        let raw = "{\"storyContent\": \"첫 줄\n둘째 줄\t끝\", \"a\": \"\\\"인용\\\"\"}";
        let (object, _) = recover_object(raw).unwrap();
        assert_eq!(object["storyContent"], "첫 줄\n둘째 줄\t끝");
        assert_eq!(object["a"], "\"인용\"");
    }

    #[test]
    fn drops_control_characters() {
        assert_eq!(sanitize("{\u{0}\"a\":\u{7} 1}"), "{\"a\": 1}");
    }

    #[test]
    fn repairs_javascript_object_syntax() {
        let raw = "{heroTitle: '여름 별미', badge1: '시원함',}";
        let (object, stage) = recover_object(raw).unwrap();
        assert_eq!(stage, RepairStage::Lenient);
        assert_eq!(object["heroTitle"], "여름 별미");
        assert_eq!(object["badge1"], "시원함");
    }

    #[test]
    fn repairs_multiline_single_quoted_values() {
        let raw = "{heroTitle: '첫 줄\n둘째 줄', badge1: '쫄깃'}";
        let (object, stage) = recover_object(raw).unwrap();
        assert_eq!(stage, RepairStage::Lenient);
        assert_eq!(object["heroTitle"], "첫 줄\n둘째 줄");
        assert_eq!(object["badge1"], "쫄깃");
    }

    #[test]
    fn irrecoverable_text_is_rejected() {
        assert!(matches!(
            recover_object("죄송합니다. 생성할 수 없습니다."),
            Err(MalformedResponse::NoObject)
        ));
        assert!(recover_object("{heroTitle: \"unterminated}").is_err());
        assert!(matches!(
            recover_object("} backwards {"),
            Err(MalformedResponse::NoObject)
        ));
    }
}
