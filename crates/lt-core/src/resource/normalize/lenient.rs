//! Repair pass for JSON-like JavaScript literals served by some mirrors.
//!
//! Handles: `export default` / `var x =` wrappers, trailing `;`, bare keys,
//! single-quoted strings, trailing commas and `//` or `/* */` comments.
//! Anything else is passed through untouched and left for the JSON parser to reject.

use std::sync::OnceLock;

use regex::Regex;

pub fn repair_json_like(input: &str) -> String {
    let body = strip_wrapper(input);
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => i = copy_string(&chars, i, &mut out),
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
            }
            ',' => {
                if !matches!(next_significant(&chars, i + 1), None | Some('}') | Some(']')) {
                    out.push(',');
                }
                i += 1;
            }
            c if is_word_char(c) => {
                let start = i;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if next_significant(&chars, i) == Some(':') {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(&word);
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

fn strip_wrapper(input: &str) -> &str {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = PREFIX.get_or_init(|| {
        Regex::new(
            r"^\s*(?:export\s+default|module\.exports\s*=|(?:var|let|const)\s+[A-Za-z_$][\w$]*\s*=)\s*",
        )
        .expect("valid wrapper pattern")
    });

    let body = match re.find(input) {
        Some(m) => &input[m.end()..],
        None => input,
    };
    body.trim().trim_end_matches(';').trim_end()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars[from.min(chars.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_whitespace())
}

/// Copy a quoted string starting at `start`, re-emitting it double-quoted.
/// Returns the index after the closing quote.
fn copy_string(chars: &[char], start: usize, out: &mut String) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    out.push('"');

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => match chars.get(i + 1) {
                Some('\'') => {
                    out.push('\'');
                    i += 2;
                }
                Some(next) => {
                    out.push('\\');
                    out.push(*next);
                    i += 2;
                }
                None => {
                    out.push_str("\\\\");
                    i += 1;
                }
            },
            c if c == quote => {
                out.push('"');
                return i + 1;
            }
            '"' => {
                out.push_str("\\\"");
                i += 1;
            }
            '\n' => {
                out.push_str("\\n");
                i += 1;
            }
            '\r' => i += 1,
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out.push('"');
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(input: &str) -> Value {
        serde_json::from_str(&repair_json_like(input)).unwrap()
    }

    #[test]
    fn quotes_bare_and_numeric_keys() {
        assert_eq!(
            parse("{1: {titulo: \"A\", letra: \"b\"}}"),
            json!({"1": {"titulo": "A", "letra": "b"}})
        );
    }

    #[test]
    fn strips_export_wrapper_and_semicolon() {
        assert_eq!(parse("export default [1, 2, 3,];"), json!([1, 2, 3]));
        assert_eq!(parse("const HARPA = {a: true};\n"), json!({"a": true}));
    }

    #[test]
    fn single_quotes_with_embedded_double_quotes() {
        assert_eq!(
            parse(r#"{t: 'say "amen"', u: 'it\'s'}"#),
            json!({"t": "say \"amen\"", "u": "it's"})
        );
    }

    #[test]
    fn colons_inside_strings_are_left_alone() {
        assert_eq!(
            parse("{ref: 'John 3:16', n: null}"),
            json!({"ref": "John 3:16", "n": null})
        );
    }

    #[test]
    fn drops_comments() {
        assert_eq!(
            parse("{\n // first\n a: 1, /* second */ b: 2\n}"),
            json!({"a": 1, "b": 2})
        );
    }
}
