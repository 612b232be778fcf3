use serde_json::Value;

use super::{convert_line_breaks, first_str, SourceShape};
use crate::error::NormalizeError;
use crate::resource::Book;

const LIST_FIELDS: &[&str] = &["books", "livros"];
const NAME_FIELDS: &[&str] = &["name", "nome", "book"];

/// Normalize a scripture payload into books in source order.
///
/// A book needs a name and at least one verse. Chapter positions are preserved
/// (an empty chapter stays empty) so chapter numbers keep matching indices.
pub fn normalize_scripture(value: &Value) -> Result<Vec<Book>, NormalizeError> {
    let shape = SourceShape::classify(value, LIST_FIELDS).ok_or_else(|| {
        NormalizeError::Schema("scripture payload is neither a list nor an object".into())
    })?;
    let shape_name = shape.name();

    let books: Vec<Book> = shape
        .into_records()
        .into_iter()
        .filter_map(|(_, record)| normalize_book(record))
        .collect();

    if books.is_empty() {
        return Err(NormalizeError::Schema(format!(
            "no valid books in {shape_name} payload"
        )));
    }
    Ok(books)
}

fn normalize_book(record: &Value) -> Option<Book> {
    let name = first_str(record, NAME_FIELDS)?.trim().to_string();
    let abbrev = match record.get("abbrev") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        // some sources nest abbreviations per language: {"pt": "gn", "en": "gn"}
        Some(Value::Object(map)) => map.values().find_map(Value::as_str).map(str::to_string),
        _ => None,
    };

    let chapters: Vec<Vec<String>> = record
        .get("chapters")
        .or_else(|| record.get("capitulos"))?
        .as_array()?
        .iter()
        .map(|chapter| {
            chapter
                .as_array()
                .map(|verses| {
                    verses
                        .iter()
                        .filter_map(Value::as_str)
                        .map(convert_line_breaks)
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect();

    let book = Book {
        name,
        abbrev,
        chapters,
    };
    (book.verse_count() > 0).then_some(book)
}
