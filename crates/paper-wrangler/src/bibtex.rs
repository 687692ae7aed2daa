//! Lenient BibTeX field extraction.
//!
//! This is pattern matching, not a validating parser: the text is cut into
//! entries at every `@type{key,` marker, and each entry is searched for a
//! handful of `field = {value}` assignments. Anything that does not match
//! simply yields an empty field.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::Paper;

/// Start of an entry: `@` + entry type + `{` + citation key + `,`.
static ENTRY_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+\{[^,]+,").expect("valid entry-start pattern"));

static TITLE: LazyLock<Regex> = LazyLock::new(|| field_pattern("title"));
static AUTHOR: LazyLock<Regex> = LazyLock::new(|| field_pattern("author"));
static URL: LazyLock<Regex> = LazyLock::new(|| field_pattern("url"));
static ABSTRACT: LazyLock<Regex> = LazyLock::new(|| field_pattern("abstract"));

fn field_pattern(name: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{name}\s*=\s*\{{")).expect("valid field pattern")
}

/// Fields the converter extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Url,
    Abstract,
}

impl Field {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::Title => &TITLE,
            Self::Author => &AUTHOR,
            Self::Url => &URL,
            Self::Abstract => &ABSTRACT,
        }
    }
}

/// Split bibliography text into entry bodies.
///
/// Whatever precedes the first entry marker (comments, `@preamble`
/// without a key) is discarded.
pub fn split_entries(text: &str) -> impl Iterator<Item = &str> {
    ENTRY_START.split(text).skip(1)
}

/// Collapse every whitespace run (newlines included) to one space and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract and normalize one field from an entry body.
///
/// Returns `None` when the field is absent, its braces never close, or it
/// is empty after normalization. Grouping braces inside the value are
/// dropped, so `{The {GPU} Era}` yields `The GPU Era`.
#[must_use]
pub fn extract_field(entry: &str, field: Field) -> Option<String> {
    let start = field.pattern().find(entry)?.end();
    let raw = braced_value(entry, start)?;
    let value = normalize_whitespace(&raw.replace(['{', '}'], ""));

    let value = match field {
        Field::Author => value.replace(" and ", ", "),
        _ => value,
    };

    (!value.is_empty()).then_some(value)
}

/// Text between an opening brace (ending just before `start`) and its matching close.
fn braced_value(entry: &str, start: usize) -> Option<&str> {
    let body = &entry[start..];
    let mut depth = 1usize;

    for (offset, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[..offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Build a paper from one entry body, or `None` if the entry has no title.
#[must_use]
pub fn parse_entry(entry: &str) -> Option<Paper> {
    let title = extract_field(entry, Field::Title)?;

    Some(Paper {
        title,
        authors: extract_field(entry, Field::Author).unwrap_or_default(),
        url: extract_field(entry, Field::Url).unwrap_or_default(),
        r#abstract: extract_field(entry, Field::Abstract).unwrap_or_default(),
        ..Default::default()
    })
}

/// Parse every titled entry in a bibliography, in source order.
#[must_use]
pub fn parse_bibliography(text: &str) -> Vec<Paper> {
    split_entries(text).filter_map(parse_entry).collect()
}

/// The set of normalized titles in a bibliography; all other fields are ignored.
#[must_use]
pub fn extract_titles(text: &str) -> HashSet<String> {
    split_entries(text).filter_map(|entry| extract_field(entry, Field::Title)).collect()
}
