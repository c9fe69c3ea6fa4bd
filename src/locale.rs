//! Language code to locale tag resolution
//!
//! Synthesis engines want full locale tags ("es-ES") while the rest of the
//! application speaks in short language codes ("es"). Codes outside the
//! table pass through unchanged so callers may hand us a full tag directly.

/// Fixed mapping from short language codes to synthesis locale tags
const LOCALE_TABLE: &[(&str, &str)] = &[
    ("en", "en-US"),
    ("es", "es-ES"),
    ("fr", "fr-FR"),
    ("de", "de-DE"),
    ("zh", "zh-CN"),
    ("ja", "ja-JP"),
    ("ar", "ar-SA"),
    ("hi", "hi-IN"),
    ("pt", "pt-BR"),
    ("ru", "ru-RU"),
];

/// Resolve a short language code to a locale tag
///
/// Unknown codes are returned unchanged.
#[must_use]
pub fn resolve(code: &str) -> &str {
    LOCALE_TABLE
        .iter()
        .find(|(short, _)| *short == code)
        .map_or(code, |(_, tag)| *tag)
}
