//! Type-ahead filtering of snapshot names.

/// Keep names where the whole name, or any space-separated word of it,
/// starts with `query` (case-insensitive). An empty query keeps everything.
///
/// Order is preserved.
pub fn filter_prefix<'a, S: AsRef<str>>(names: &'a [S], query: &str) -> Vec<&'a str> {
    let prefix = query.to_lowercase();
    if prefix.is_empty() {
        return names.iter().map(|name| name.as_ref()).collect();
    }

    names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| matches_prefix(name, &prefix))
        .collect()
}

/// `prefix` must already be lower case.
fn matches_prefix(name: &str, prefix: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with(prefix) || lower.split(' ').any(|word| word.starts_with(prefix))
}
