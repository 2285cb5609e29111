//! Supported language set and validated language codes.

use std::fmt;

use crate::i18n::error::SettingsError;

/// A language code known to be a member of a [`SiteLanguages`] set.
///
/// Values can only be produced by [`SiteLanguages`], so holding one means the
/// code passed validation against the site's supported set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Borrow the code as a string slice (e.g. `"en"`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The closed set of languages a site ships catalogs for, with one default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLanguages {
    /// Supported codes in declaration order; always contains `default`.
    supported: Vec<LanguageCode>,
    /// The language the page is authored in.
    default: LanguageCode,
}

impl SiteLanguages {
    /// What: Build a language set from raw codes.
    ///
    /// Inputs:
    /// - `supported`: Codes the site ships catalogs for
    /// - `default`: Code the page markup is authored in
    ///
    /// Output:
    /// - `Ok(SiteLanguages)`, or `Err` when a code is malformed or the default is
    ///   not part of the supported list
    ///
    /// # Errors
    /// - `SettingsError::EmptyLanguageSet` when `supported` is empty
    /// - `SettingsError::InvalidLanguage` when a code is empty or contains
    ///   characters outside `[A-Za-z0-9-]`
    /// - `SettingsError::UnsupportedDefault` when `default` is not listed
    ///
    /// Details:
    /// - Duplicate codes are collapsed, keeping the first occurrence.
    pub fn new<S: AsRef<str>>(supported: &[S], default: &str) -> Result<Self, SettingsError> {
        if supported.is_empty() {
            return Err(SettingsError::EmptyLanguageSet);
        }
        let mut codes: Vec<LanguageCode> = Vec::with_capacity(supported.len());
        for raw in supported {
            let raw = raw.as_ref();
            if !is_valid_code_format(raw) {
                return Err(SettingsError::InvalidLanguage(raw.to_string()));
            }
            if !codes.iter().any(|c| c.0 == raw) {
                codes.push(LanguageCode(raw.to_string()));
            }
        }
        let Some(default) = codes.iter().find(|c| c.0 == default).cloned() else {
            return Err(SettingsError::UnsupportedDefault(default.to_string()));
        };
        Ok(Self {
            supported: codes,
            default,
        })
    }

    /// Look up `raw` in the set; exact, case-sensitive match.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<LanguageCode> {
        self.supported.iter().find(|c| c.0 == raw).cloned()
    }

    /// What: Validate a raw code, falling back to the default.
    ///
    /// Inputs:
    /// - `raw`: Untrusted code (stored preference, switch-control attribute)
    ///
    /// Output:
    /// - The matching supported code, or the default code when `raw` is unknown
    #[must_use]
    pub fn coerce(&self, raw: &str) -> LanguageCode {
        self.parse(raw).unwrap_or_else(|| {
            tracing::debug!(code = raw, default = %self.default, "unsupported language code, using default");
            self.default.clone()
        })
    }

    /// The default code.
    #[must_use]
    pub const fn default_code(&self) -> &LanguageCode {
        &self.default
    }

    /// Whether `code` is the default code.
    #[must_use]
    pub fn is_default(&self, code: &LanguageCode) -> bool {
        *code == self.default
    }

    /// Iterate the supported codes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &LanguageCode> {
        self.supported.iter()
    }
}

impl Default for SiteLanguages {
    /// Spanish-authored site with English, German and French catalogs.
    fn default() -> Self {
        let code = |s: &str| LanguageCode(s.to_string());
        Self {
            supported: vec![code("es"), code("en"), code("de"), code("fr")],
            default: code("es"),
        }
    }
}

/// What: Validate language code format.
///
/// Inputs:
/// - `code`: Code to validate
///
/// Output:
/// - `true` if format looks valid, `false` otherwise
///
/// Details:
/// - Allows simple codes (`en`) and tagged codes (`pt-BR`)
/// - Rejects empty strings, spaces, path separators and doubled hyphens, since
///   the code ends up in a catalog URL
fn is_valid_code_format(code: &str) -> bool {
    if code.is_empty() || code.len() > 20 {
        return false;
    }
    code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !code.starts_with('-')
        && !code.ends_with('-')
        && !code.contains("--")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_matches_site() {
        let langs = SiteLanguages::default();
        let codes: Vec<&str> = langs.iter().map(LanguageCode::as_str).collect();
        assert_eq!(codes, vec!["es", "en", "de", "fr"]);
        assert_eq!(langs.default_code().as_str(), "es");
    }

    #[test]
    fn coerce_falls_back_to_default() {
        let langs = SiteLanguages::default();
        assert_eq!(langs.coerce("de").as_str(), "de");
        assert_eq!(langs.coerce("it").as_str(), "es");
        assert_eq!(langs.coerce("EN").as_str(), "es");
        assert_eq!(langs.coerce("").as_str(), "es");
        assert_eq!(langs.coerce(" en").as_str(), "es");
    }

    #[test]
    fn parse_is_exact() {
        let langs = SiteLanguages::default();
        assert!(langs.parse("fr").is_some());
        assert!(langs.parse("fr-FR").is_none());
    }

    #[test]
    fn new_rejects_bad_sets() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            SiteLanguages::new(&empty, "en"),
            Err(SettingsError::EmptyLanguageSet)
        ));
        assert!(matches!(
            SiteLanguages::new(&["en", "de"], "fr"),
            Err(SettingsError::UnsupportedDefault(code)) if code == "fr"
        ));
        assert!(matches!(
            SiteLanguages::new(&["en", "../x"], "en"),
            Err(SettingsError::InvalidLanguage(code)) if code == "../x"
        ));
    }

    #[test]
    fn new_collapses_duplicates() {
        let langs = SiteLanguages::new(&["en", "pt-BR", "en"], "pt-BR")
            .expect("valid language set");
        assert_eq!(langs.iter().count(), 2);
        assert!(langs.is_default(&langs.coerce("pt-BR")));
    }

    #[test]
    fn code_compares_with_str() {
        let langs = SiteLanguages::default();
        let en = langs.coerce("en");
        assert_eq!(en, "en");
        assert_eq!(en.to_string(), "en");
    }
}
