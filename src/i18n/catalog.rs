//! Translation catalogs and their JSON decoding.

use std::collections::HashMap;

use serde_json::Value;

use crate::i18n::error::CatalogError;

/// Reserved key whose value replaces the page's description metadata.
pub const META_DESCRIPTION_KEY: &str = "meta.description";

/// One language's translations: dot-notation key -> translated string.
///
/// Values may contain inline markup; see [`crate::dom::DomApplier`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationCatalog {
    /// Flattened entries.
    entries: HashMap<String, String>,
}

impl TranslationCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key; `None` means the authored fallback stays in place.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or replace one entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// The reserved page description, if present.
    #[must_use]
    pub fn meta_description(&self) -> Option<&str> {
        self.get(META_DESCRIPTION_KEY)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslationCatalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// What: Decode a catalog response body.
///
/// Inputs:
/// - `body`: Response text
/// - `url`: Catalog URL, only used to label errors
///
/// Output:
/// - `Ok(TranslationCatalog)` or the decoding error
///
/// # Errors
/// - `CatalogError::Malformed` when `body` is not JSON
/// - `CatalogError::NotAnObject` when the top-level value is not an object
///
/// Details:
/// - Flat `{"a.b": "text"}` objects are the normal case
/// - Nested objects are flattened into dot-notation keys
/// - Numbers and booleans keep their JSON text; `null` and arrays are skipped
pub fn parse_catalog(body: &str, url: &str) -> Result<TranslationCatalog, CatalogError> {
    let doc: Value = serde_json::from_str(body).map_err(|source| CatalogError::Malformed {
        url: url.to_string(),
        source,
    })?;
    let Value::Object(map) = doc else {
        return Err(CatalogError::NotAnObject {
            url: url.to_string(),
        });
    };

    let mut entries = HashMap::with_capacity(map.len());
    for (key, value) in &map {
        flatten_value(value, key, &mut entries);
    }
    tracing::debug!(url, keys = entries.len(), "decoded translation catalog");
    Ok(TranslationCatalog { entries })
}

/// What: Recursively flatten a JSON value into dot-notation keys.
///
/// Inputs:
/// - `value`: Current JSON value
/// - `prefix`: Key of `value` (e.g., "hero.title")
/// - `entries`: Map to populate
fn flatten_value(value: &Value, prefix: &str, entries: &mut HashMap<String, String>) {
    match value {
        Value::String(s) => {
            entries.insert(prefix.to_string(), s.clone());
        }
        Value::Object(map) => {
            for (key, val) in map {
                flatten_value(val, &format!("{prefix}.{key}"), entries);
            }
        }
        Value::Number(n) => {
            entries.insert(prefix.to_string(), n.to_string());
        }
        Value::Bool(b) => {
            entries.insert(prefix.to_string(), b.to_string());
        }
        Value::Null | Value::Array(_) => {
            tracing::debug!(key = prefix, "skipping non-text catalog value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_catalog() {
        let catalog = parse_catalog(
            r#"{"nav.home": "Home", "meta.description": "Photo studio", "hero.cta": "<b>Book</b> now"}"#,
            "lang/en.json",
        )
        .expect("valid catalog");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("nav.home"), Some("Home"));
        assert_eq!(catalog.get("hero.cta"), Some("<b>Book</b> now"));
        assert_eq!(catalog.meta_description(), Some("Photo studio"));
        assert_eq!(catalog.get("nav.missing"), None);
    }

    #[test]
    fn flattens_nested_objects() {
        let catalog = parse_catalog(
            r#"{"meta": {"description": "Studio"}, "footer": {"links": {"about": "About"}}}"#,
            "lang/en.json",
        )
        .expect("valid catalog");
        assert_eq!(catalog.meta_description(), Some("Studio"));
        assert_eq!(catalog.get("footer.links.about"), Some("About"));
    }

    #[test]
    fn keeps_scalars_and_skips_null_and_arrays() {
        let catalog = parse_catalog(
            r#"{"year": 2024, "open": true, "gone": null, "list": ["a"]}"#,
            "lang/en.json",
        )
        .expect("valid catalog");
        assert_eq!(catalog.get("year"), Some("2024"));
        assert_eq!(catalog.get("open"), Some("true"));
        assert_eq!(catalog.get("gone"), None);
        assert_eq!(catalog.get("list"), None);
    }

    #[test]
    fn rejects_malformed_body() {
        let err = parse_catalog("{\"nav.home\": ", "lang/en.json").expect_err("truncated");
        assert!(matches!(err, CatalogError::Malformed { .. }));
        assert_eq!(err.url(), "lang/en.json");
    }

    #[test]
    fn rejects_non_object_body() {
        let err = parse_catalog("[\"Home\"]", "lang/en.json").expect_err("array body");
        assert!(matches!(err, CatalogError::NotAnObject { .. }));
    }

    #[test]
    fn collects_from_pairs() {
        let catalog: TranslationCatalog = [("a.b", "Hola")].into_iter().collect();
        assert_eq!(catalog.get("a.b"), Some("Hola"));
        assert!(!catalog.is_empty());
    }
}
