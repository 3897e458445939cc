//! Line codec for the dataset file
//!
//! Comma-delimited, one record per line, RFC 4180 quoting for fields that
//! contain a comma or a quote. Records never span lines.

use std::borrow::Cow;

/// Split one line into fields, honouring double quotes.
/// An unterminated quote swallows the rest of the line.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches(['\r', '\n']).chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// Quote a field when it would otherwise break the layout
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"']) || field.starts_with(char::is_whitespace) || field.ends_with(char::is_whitespace) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Join already-formatted fields into one line (no trailing newline)
pub fn join_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(escape_field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Numeric cell → value; missing, non-numeric and non-finite are None
pub fn parse_value(cell: &str) -> Option<f32> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Value → cell (`1.0` is written as `1`)
pub fn format_value(value: f32) -> String {
    format!("{}", value)
}
