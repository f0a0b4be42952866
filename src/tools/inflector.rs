//! Identifier normalization helpers.

/// Strips every character outside `[A-Za-z0-9_]`, leaving a string that
/// is safe to embed as a SQL column or alias fragment.
pub fn columnify(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
