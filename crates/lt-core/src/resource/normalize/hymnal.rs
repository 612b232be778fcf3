use std::collections::HashSet;

use serde_json::Value;

use super::{convert_line_breaks, first_str, parse_leading_int, SourceShape};
use crate::error::NormalizeError;
use crate::resource::Hymn;

const LIST_FIELDS: &[&str] = &["hinos", "hymns"];
const TITLE_FIELDS: &[&str] = &["titulo", "title", "hino"];
const LYRICS_FIELDS: &[&str] = &["letra", "text", "lyrics"];
const UNTITLED: &str = "Sem título";
const CHORUS_LABEL: &str = "[Coro]";

/// Normalize any supported hymnal payload into hymns sorted by number,
/// unique by number (first occurrence wins).
pub fn normalize_hymnal(value: &Value) -> Result<Vec<Hymn>, NormalizeError> {
    let shape = SourceShape::classify(value, LIST_FIELDS).ok_or_else(|| {
        NormalizeError::Schema("hymnal payload is neither a list nor an object".into())
    })?;
    let shape_name = shape.name();

    let records = shape.into_records();
    let total = records.len();
    let mut hymns: Vec<Hymn> = records
        .into_iter()
        .filter_map(|(key, record)| normalize_record(record, key))
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        shape = shape_name,
        total,
        kept = hymns.len(),
        "normalized hymnal payload"
    );
    #[cfg(not(feature = "tracing"))]
    let _ = total;

    hymns.sort_by_key(|h| h.number);
    let mut seen = HashSet::new();
    hymns.retain(|h| seen.insert(h.number));

    if hymns.is_empty() {
        return Err(NormalizeError::Schema(format!(
            "no valid hymns in {shape_name} payload"
        )));
    }
    Ok(hymns)
}

fn normalize_record(record: &Value, index_key: Option<&str>) -> Option<Hymn> {
    if !record.is_object() {
        return None;
    }

    let raw_title = first_str(record, TITLE_FIELDS);
    let number = explicit_number(record)
        .or_else(|| record.get("hino").and_then(Value::as_str).and_then(hino_number))
        .or_else(|| raw_title.and_then(combined_number))
        .or_else(|| index_key.and_then(parse_leading_int))
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())?;

    let lyrics = lyrics_of(record);
    if lyrics.trim().is_empty() {
        return None;
    }

    let title = raw_title
        .map(strip_number_prefix)
        .unwrap_or(UNTITLED)
        .trim()
        .to_string();

    Some(Hymn {
        number,
        title,
        lyrics,
    })
}

/// `numero`/`number` when set. Zero, empty strings and non-scalar values
/// count as unset so the number can still come from `hino`.
fn explicit_number(record: &Value) -> Option<i64> {
    ["numero", "number"]
        .iter()
        .filter_map(|field| record.get(*field))
        .find(|value| is_set(value))
        .and_then(|value| match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => parse_leading_int(s),
            _ => None,
        })
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => false,
    }
}

/// `"12 - Title"` or a bare `"12"` → 12
fn hino_number(hino: &str) -> Option<i64> {
    let head = hino.split_once(" - ").map_or(hino, |(head, _)| head);
    parse_leading_int(head)
}

/// `"12 - Title"` → 12; a title without the separator carries no number.
fn combined_number(text: &str) -> Option<i64> {
    let (head, _) = text.split_once(" - ")?;
    parse_leading_int(head)
}

/// `"12 - Title - Part"` → `"Title - Part"`; untouched when the head is not numeric.
fn strip_number_prefix(title: &str) -> &str {
    match title.split_once(" - ") {
        Some((head, rest)) if parse_leading_int(head).is_some() => rest,
        _ => title,
    }
}

fn lyrics_of(record: &Value) -> String {
    if let Some(text) = first_str(record, LYRICS_FIELDS) {
        return convert_line_breaks(text);
    }

    let chorus = first_str(record, &["coro", "chorus"])
        .map(|c| format!("{CHORUS_LABEL}\n{}", convert_line_breaks(c)));

    let verses = match record.get("verses").or_else(|| record.get("estrofes")) {
        Some(Value::Object(map)) => {
            let mut keyed: Vec<(Option<i64>, &Value)> =
                map.iter().map(|(k, v)| (parse_leading_int(k), v)).collect();
            // non-numeric keys sort after numeric ones
            keyed.sort_by_key(|(k, _)| (k.is_none(), *k));
            keyed.into_iter().map(|(_, v)| v).collect::<Vec<_>>()
        }
        Some(Value::Array(items)) => items.iter().collect(),
        _ => return String::new(),
    };

    let mut parts = Vec::new();
    for verse in verses {
        let text = match verse {
            Value::String(s) => s.clone(),
            Value::Null => continue,
            other => other.to_string(),
        };
        parts.push(convert_line_breaks(&text));
        if let Some(chorus) = &chorus {
            parts.push(chorus.clone());
        }
    }
    parts.join("\n\n")
}
