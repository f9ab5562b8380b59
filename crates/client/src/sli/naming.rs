//! Indicator name cleaning.

/// Replace characters that are not allowed in indicator names.
///
/// Spaces, `/` and `%` become `_`; everything else is kept as is.
pub fn clean_indicator_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '%' => '_',
            other => other,
        })
        .collect()
}
