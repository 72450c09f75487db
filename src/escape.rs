//! Escaping for SQL string literals and CSV fields.

use std::borrow::Cow;

/// Escape a value for use inside a single-quoted SQL literal.
///
/// Only single quotes are touched (each is doubled). The caller supplies the
/// surrounding quotes and must not place the result anywhere but inside them.
pub fn sanitize_for_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\'' {
            escaped.push('\'');
        }
        escaped.push(ch);
    }
    escaped
}

/// Wrap an escaped value in single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", sanitize_for_literal(value))
}

/// Escape a field for a CSV row.
///
/// Fields containing a comma, double quote or line break are quoted with
/// embedded quotes doubled; anything else is returned as-is.
pub fn escape_csv_field(value: &str) -> Cow<'_, str> {
    if !value.contains([',', '"', '\n', '\r']) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    Cow::Owned(out)
}
