//! Markup filter
//!
//! Reduces an arbitrary HTML fragment to the minimal structural vocabulary
//! the row/cell parser understands:
//!
//! ```text
//! <table ...> ... </table>  ->  <tr><td rowspan:2 >A</td>...</tr>...
//! ```
//!
//! Only `tr`, `td` and `th` tags survive. Of their attributes only `rowspan`
//! and `colspan` are kept, rewritten into the canonical ` name:value ` token.
//! Text runs that contain something other than whitespace are kept verbatim.

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;

use crate::utils::error::{TableError, TableResult};

/// Tags retained by [`normalize_tags`]
static RETAINED_TAGS: phf::Set<&'static str> = phf_set! {
    "tr",
    "td",
    "th",
};

lazy_static! {
    static ref TABLE_START: Regex = Regex::new(r"(?i)<table").unwrap();
    static ref TABLE_END: Regex = Regex::new(r"(?i)/table>").unwrap();

    /// A comment or a tag; a `<` not followed by a name, `/` or `!` is text
    static ref MARKUP_TOKEN: Regex =
        Regex::new(r"(?s)<!--.*?-->|<[A-Za-z/!][^<>]*>").unwrap();

    /// Tag name and attribute text of an open or close tag
    static ref TAG_PARTS: Regex =
        Regex::new(r"(?s)^<\s*(/)?\s*([A-Za-z][A-Za-z0-9]*)(.*?)/?\s*>$").unwrap();

    /// `rowspan`/`colspan` in raw (`rowspan="2"`) or canonical (`rowspan:2`) form
    pub(crate) static ref SPAN_ATTRIBUTE: Regex = Regex::new(
        r#"(?i)\b(rowspan|colspan)\s*(?:=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))|:\s*([^\s>]*))"#
    )
    .unwrap();
}

/// Extract the table region of a fragment
///
/// Returns the substring from the first `<table` to the first following
/// `/table>`, both included.
pub fn extract_table(fragment: &str) -> TableResult<&str> {
    let start = TABLE_START
        .find(fragment)
        .ok_or(TableError::TableNotFound)?
        .start();

    let end = TABLE_END
        .find_at(fragment, start)
        .ok_or(TableError::TableNotFound)?
        .end();

    Ok(&fragment[start..end])
}

/// Reduce table markup to `tr`/`td`/`th` tags and their span attributes
///
/// The function is pure and order preserving, and normalizing its own output
/// yields the same string.
pub fn normalize_tags(table_markup: &str) -> String {
    let mut output = String::with_capacity(table_markup.len() / 2);
    let mut last_end = 0;

    for token in MARKUP_TOKEN.find_iter(table_markup) {
        push_text(&mut output, &table_markup[last_end..token.start()]);
        last_end = token.end();

        if token.as_str().starts_with("<!--") {
            continue;
        }

        if let Some(tag) = canonical_tag(token.as_str()) {
            output.push_str(&tag);
        }
    }

    push_text(&mut output, &table_markup[last_end..]);
    output
}

/// Extract and normalize in one step
pub fn filter_fragment(fragment: &str) -> TableResult<String> {
    let table = extract_table(fragment)?;
    let normalized = normalize_tags(table);
    log::trace!(
        "filtered table markup: {} bytes -> {} bytes",
        table.len(),
        normalized.len()
    );
    Ok(normalized)
}

/// Keep a text run unless it is whitespace only
fn push_text(output: &mut String, text: &str) {
    if !text.trim().is_empty() {
        output.push_str(text);
    }
}

/// Rewrite a retained tag into its canonical form, or drop it
fn canonical_tag(tag: &str) -> Option<String> {
    let caps = TAG_PARTS.captures(tag)?;
    let name = caps[2].to_ascii_lowercase();
    if !RETAINED_TAGS.contains(name.as_str()) {
        return None;
    }

    if caps.get(1).is_some() {
        return Some(format!("</{}>", name));
    }

    let mut attrs = String::new();
    for (attribute, value) in span_attributes(&caps[3]) {
        attrs.push_str(&format!(" {}:{} ", attribute, value));
    }

    Some(format!("<{}{}>", name, attrs))
}

/// All span attributes of an attribute string, in source order
///
/// Names are lower-cased, values are trimmed but otherwise left unchecked.
pub(crate) fn span_attributes(attrs: &str) -> Vec<(String, &str)> {
    SPAN_ATTRIBUTE
        .captures_iter(attrs)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = (2..=5)
                .find_map(|i| caps.get(i))
                .map(|m| m.as_str().trim())
                .unwrap_or("");
            (name, value)
        })
        .collect()
}
