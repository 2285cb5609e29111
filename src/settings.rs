//! Site settings: languages, storage key, catalog location and markup names.
//!
//! Settings are read from a `key = value` file:
//!
//! ```text
//! # sitelang settings
//! supported_languages = es, en, de, fr
//! default_language = es
//! storage_key = photoness_lang
//! script_path = js/i18n.js
//! catalog_dir = lang
//! active_class = lang-active
//! request_timeout_secs = 10
//! ```
//!
//! Every key is optional; missing keys keep the defaults shown above.

pub mod paths;

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::dom::Markup;
use crate::i18n::{SettingsError, SiteLanguages};
use crate::util::config::{normalize_key, parse_key_value, skip_comment_or_empty, split_list};

/// Everything the engine needs to know about a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    /// Supported languages and the default.
    pub languages: SiteLanguages,
    /// Storage key of the persisted preference.
    pub storage_key: String,
    /// Path of the engine script relative to the site root.
    pub script_path: String,
    /// Directory of the catalogs relative to the site root.
    pub catalog_dir: String,
    /// Markup contract.
    pub markup: Markup,
    /// Per-request timeout for HTTP catalog fetches; none by default.
    pub request_timeout: Option<Duration>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            languages: SiteLanguages::default(),
            storage_key: "photoness_lang".to_string(),
            script_path: "js/i18n.js".to_string(),
            catalog_dir: "lang".to_string(),
            markup: Markup::default(),
            request_timeout: None,
        }
    }
}

impl SiteSettings {
    /// What: Parse settings file content.
    ///
    /// Inputs:
    /// - `content`: File text
    ///
    /// Output:
    /// - Settings with defaults for every key not present
    ///
    /// # Errors
    /// - `SettingsError::InvalidValue` for empty names or a non-numeric timeout
    /// - Language set errors from [`SiteLanguages::new`]
    ///
    /// Details:
    /// - Keys are case-insensitive; `.`, `-` and spaces count as `_`
    /// - Unknown keys are logged and ignored
    /// - A later occurrence of a key overrides an earlier one
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        let mut supported: Option<Vec<String>> = None;
        let mut default_language: Option<String> = None;

        for line in content.lines() {
            if skip_comment_or_empty(line) {
                continue;
            }
            let Some((raw_key, value)) = parse_key_value(line) else {
                tracing::warn!(line = line.trim(), "ignoring settings line without '='");
                continue;
            };
            let key = normalize_key(&raw_key);
            match key.as_str() {
                "supported_languages" | "languages" => supported = Some(split_list(&value)),
                "default_language" => default_language = Some(value),
                "request_timeout_secs" => {
                    settings.request_timeout = parse_timeout(&key, &value)?;
                }
                _ => {
                    let Some(slot) = settings.text_slot(&key) else {
                        tracing::warn!(key = %raw_key, "unknown settings key");
                        continue;
                    };
                    if value.is_empty() {
                        return Err(SettingsError::InvalidValue { key, value });
                    }
                    *slot = value;
                }
            }
        }

        if supported.is_some() || default_language.is_some() {
            let supported = supported.unwrap_or_else(|| {
                settings
                    .languages
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            });
            let default_language = default_language
                .unwrap_or_else(|| settings.languages.default_code().to_string());
            settings.languages = SiteLanguages::new(&supported, &default_language)?;
        }
        Ok(settings)
    }

    /// What: Load settings from `path`.
    ///
    /// # Errors
    /// - `SettingsError::Io` when the file cannot be read
    /// - Any error from [`Self::parse`]
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        let settings = Self::parse(&content)?;
        tracing::info!(path = %path.display(), "loaded site settings");
        Ok(settings)
    }

    /// String setting addressed by a normalized key.
    fn text_slot(&mut self, key: &str) -> Option<&mut String> {
        let slot = match key {
            "storage_key" => &mut self.storage_key,
            "script_path" => &mut self.script_path,
            "catalog_dir" => &mut self.catalog_dir,
            "content_attribute" => &mut self.markup.content_attr,
            "placeholder_attribute" => &mut self.markup.placeholder_attr,
            "title_attribute" => &mut self.markup.title_attr,
            "switch_attribute" => &mut self.markup.switch_attr,
            "active_class" => &mut self.markup.active_class,
            "placeholder_target" => &mut self.markup.placeholder_target,
            "description_meta" => &mut self.markup.description_meta,
            _ => return None,
        };
        Some(slot)
    }
}

/// Parse a timeout in whole seconds; empty or `0` disables it.
fn parse_timeout(key: &str, value: &str) -> Result<Option<Duration>, SettingsError> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
        Err(_) => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
