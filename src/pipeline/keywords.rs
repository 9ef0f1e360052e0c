use itertools::Itertools;

/// Canonical form of a comma-separated keyword list: tokens trimmed and
/// lowercased, empty tokens dropped, rejoined with `,`.
///
/// Order and duplicates are preserved. An empty result means the record has
/// no usable keywords.
pub fn normalize_keywords(raw: &str) -> String {
    raw.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .join(",")
}
