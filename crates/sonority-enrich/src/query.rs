//! Lucene-style phrase queries shared by the search clients.

/// Wrap `value` in double quotes, escaping characters that would end the
/// phrase early.
pub(crate) fn quote_phrase(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// `field:"value"` for each pair, joined with `separator`.
pub(crate) fn fielded(terms: &[(&str, &str)], separator: &str) -> String {
    terms
        .iter()
        .map(|(field, value)| format!("{field}:{}", quote_phrase(value)))
        .collect::<Vec<_>>()
        .join(separator)
}
