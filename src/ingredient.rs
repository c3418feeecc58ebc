use crate::prompt;
use crate::provider::ProviderChain;
use crate::repair::{self, JsonObject};
use askama::Template;
use lazy_regex::regex;
use log_error::LogError;
use pagegen_types::IngredientRow;

/// Where the ingredient rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    Provider(&'static str),
    Parser,
}

#[derive(Template)]
#[template(path = "blocks/ingredient_table.html")]
struct IngredientTable<'a> {
    rows: &'a [IngredientRow],
}

pub fn render_table(rows: &[IngredientRow]) -> String {
    IngredientTable { rows }
        .render()
        .log_error("Unable to render ingredient table")
        .unwrap_or_default()
}

fn is_open(ch: char) -> bool {
    matches!(ch, '(' | '（')
}

fn is_close(ch: char) -> bool {
    matches!(ch, ')' | '）')
}

/// Splits on commas that are not inside parentheses.
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in input.char_indices() {
        match ch {
            c if is_open(c) => depth += 1,
            c if is_close(c) => depth = depth.saturating_sub(1),
            ',' | '，' if depth == 0 => {
                parts.push(&input[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => (),
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Separates top-level parenthetical groups from the rest of the segment.
fn split_groups(segment: &str) -> (String, Vec<String>) {
    let mut rest = String::new();
    let mut groups = vec![];
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in segment.chars() {
        if is_open(ch) {
            if depth > 0 {
                current.push(ch);
            }
            depth += 1;
        } else if is_close(ch) && depth > 0 {
            depth -= 1;
            if depth == 0 {
                groups.push(std::mem::take(&mut current).trim().to_string());
                rest.push(' ');
            } else {
                current.push(ch);
            }
        } else if depth > 0 {
            current.push(ch);
        } else {
            rest.push(ch);
        }
    }
    if !current.is_empty() {
        rest.push_str(&current);
    }
    (rest, groups)
}

fn parse_segment(segment: &str) -> Option<IngredientRow> {
    let (rest, groups) = split_groups(segment);
    let percent = regex!(r"(\d+(?:\.\d+)?)\s*%");
    let percentage = percent
        .captures(&rest)
        .and_then(|c| c.get(1))
        .map(|m| format!("{}%", m.as_str()));
    let name = percent.replace_all(&rest, " ");
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return None;
    }
    let origin = groups.into_iter().find(|g| !g.is_empty());
    Some(IngredientRow::new(name, percentage, origin))
}

/// Deterministic parser used when no provider produced rows. Never fails:
/// input without a single usable ingredient yields one parse-error row.
pub fn parse_fallback(input: &str) -> Vec<IngredientRow> {
    let rows = split_top_level(input)
        .into_iter()
        .filter_map(parse_segment)
        .collect::<Vec<_>>();
    if rows.is_empty() {
        return vec![IngredientRow::parse_error()];
    }
    rows
}

fn rows_from_object(mut object: JsonObject) -> Option<Vec<IngredientRow>> {
    let rows = object.remove("rows")?;
    let rows = serde_json::from_value::<Vec<IngredientRow>>(rows)
        .log_error("Unable to decode ingredient rows")?
        .into_iter()
        .map(IngredientRow::normalized)
        .filter(|row| !row.name.is_empty())
        .collect::<Vec<_>>();
    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

pub async fn synthesize(
    chain: &ProviderChain,
    ingredients: &str,
    max_tokens: u32,
) -> (Vec<IngredientRow>, RowSource) {
    match chain
        .first_success(&prompt::ingredient_table(ingredients), max_tokens)
        .await
    {
        Ok(answer) => {
            let rows = repair::recover_object(&answer.text)
                .log_error("Unable to recover ingredient reply")
                .and_then(|(object, _)| rows_from_object(object));
            match rows {
                Some(rows) => return (rows, RowSource::Provider(answer.provider)),
                None => log::warn!(
                    "Ingredient reply from {} had no usable rows, parsing locally",
                    answer.provider
                ),
            }
        }
        Err(failures) => log::warn!(
            "No provider for ingredient table ({} attempt(s)), parsing locally",
            failures.len()
        ),
    }
    (parse_fallback(ingredients), RowSource::Parser)
}
