//! Source-schema normalization.
//!
//! Mirrors publish the same content in different shapes. Every payload is first
//! classified into one of a closed set of [`SourceShape`]s, then each record goes
//! through a single per-kind normalization function. Records that cannot be
//! normalized are dropped; an empty result is a [`NormalizeError::Schema`].

mod hymnal;
mod lenient;
mod scripture;

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::{ResourceKind, ResourcePack};
use crate::error::NormalizeError;
use crate::ids::ResourceId;

pub use hymnal::normalize_hymnal;
pub use lenient::repair_json_like;
pub use scripture::normalize_scripture;

/// The shapes a source payload may take.
#[derive(Debug, PartialEq)]
pub enum SourceShape<'a> {
    /// `[ {...}, {...} ]`
    DirectList(Vec<&'a Value>),
    /// `{ "hinos": [ ... ] }`
    NamedListField {
        field: &'static str,
        records: Vec<&'a Value>,
    },
    /// `{ "1": {...}, "2": {...} }`; the key is kept as a fallback id.
    IndexedById(Vec<(&'a str, &'a Value)>),
}

impl<'a> SourceShape<'a> {
    /// Classify `value`, looking for a named list under any of `list_fields`.
    pub fn classify(value: &'a Value, list_fields: &[&'static str]) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Self::DirectList(items.iter().collect())),
            Value::Object(map) => {
                for field in list_fields {
                    if let Some(Value::Array(items)) = map.get(*field) {
                        return Some(Self::NamedListField {
                            field,
                            records: items.iter().collect(),
                        });
                    }
                }
                Some(Self::IndexedById(
                    map.iter().map(|(k, v)| (k.as_str(), v)).collect(),
                ))
            }
            _ => None,
        }
    }

    /// Records paired with their index key, when the shape has one.
    pub fn into_records(self) -> Vec<(Option<&'a str>, &'a Value)> {
        match self {
            Self::DirectList(records) | Self::NamedListField { records, .. } => {
                records.into_iter().map(|r| (None, r)).collect()
            }
            Self::IndexedById(entries) => entries.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DirectList(_) => "direct_list",
            Self::NamedListField { .. } => "named_list_field",
            Self::IndexedById(_) => "indexed_by_id",
        }
    }
}

/// Normalize a parsed payload into the canonical pack for `kind`.
pub fn normalize(
    kind: ResourceKind,
    id: &ResourceId,
    value: &Value,
) -> Result<ResourcePack, NormalizeError> {
    match kind {
        ResourceKind::Scripture => {
            normalize_scripture(value).map(|books| ResourcePack::scripture(id.clone(), books))
        }
        ResourceKind::Hymnal => {
            normalize_hymnal(value).map(|hymns| ResourcePack::hymnal(id.clone(), hymns))
        }
    }
}

/// Parse a mirror payload: strict JSON first, then the lenient repair pass.
pub fn parse_payload(text: &str) -> Result<Value, String> {
    let strict_err = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    let repaired = repair_json_like(text);
    serde_json::from_str::<Value>(&repaired)
        .map_err(|lenient_err| format!("strict: {strict_err}; lenient: {lenient_err}"))
}

/// `<br>`, `<br/>`, `<br />` (any case) become `\n`.
pub(crate) fn convert_line_breaks(text: &str) -> String {
    static BR: OnceLock<Regex> = OnceLock::new();
    let re = BR.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("valid <br> pattern"));
    re.replace_all(text, "\n").into_owned()
}

/// JavaScript `parseInt` semantics: optional whitespace and sign, then digits.
pub(crate) fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|n| n * sign)
}

/// First field among `names` holding a non-empty string.
pub(crate) fn first_str<'a>(record: &'a Value, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| record.get(*name).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_all_three_shapes() {
        let direct = json!([{"a": 1}]);
        let named = json!({"hinos": [{"a": 1}]});
        let indexed = json!({"1": {"a": 1}});

        assert_eq!(
            SourceShape::classify(&direct, &["hinos"]).unwrap().name(),
            "direct_list"
        );
        assert_eq!(
            SourceShape::classify(&named, &["hinos"]).unwrap().name(),
            "named_list_field"
        );
        assert_eq!(
            SourceShape::classify(&indexed, &["hinos"]).unwrap().name(),
            "indexed_by_id"
        );
        assert!(SourceShape::classify(&json!("text"), &["hinos"]).is_none());
    }

    #[test]
    fn parse_payload_falls_back_to_lenient() {
        let value = parse_payload("{numero: 1, titulo: 'Graça',}").unwrap();
        assert_eq!(value, json!({"numero": 1, "titulo": "Graça"}));
    }

    #[test]
    fn parse_payload_reports_both_failures() {
        let err = parse_payload("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(err.contains("strict"));
        assert!(err.contains("lenient"));
    }

    #[test]
    fn leading_int_matches_parse_int() {
        assert_eq!(parse_leading_int("12 - Title"), Some(12));
        assert_eq!(parse_leading_int("  7abc"), Some(7));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn converts_all_break_spellings() {
        assert_eq!(convert_line_breaks("a<br>b<br/>c<BR />d"), "a\nb\nc\nd");
    }
}
