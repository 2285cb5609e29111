//! Error types for catalog loading, preference storage and settings.
//!
//! None of these reach the page: the engine logs them and leaves the document
//! as it was. They exist so callers and logs can tell failures apart.

use std::fmt;

/// What: Failure while fetching or decoding a translation catalog.
///
/// Details:
/// - A failed load leaves whatever catalog was applied before in place.
#[derive(Debug)]
pub enum CatalogError {
    /// The request never produced a response (connection refused, DNS, I/O).
    Transport {
        /// Requested catalog URL.
        url: String,
        /// Underlying error description.
        message: String,
    },
    /// The server answered with a status outside 200-299.
    Status {
        /// Requested catalog URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The body was not valid JSON.
    Malformed {
        /// Requested catalog URL.
        url: String,
        /// Parser error.
        source: serde_json::Error,
    },
    /// The body was JSON but not an object.
    NotAnObject {
        /// Requested catalog URL.
        url: String,
    },
}

impl CatalogError {
    /// URL of the request that failed.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Malformed { url, .. }
            | Self::NotAnObject { url } => url,
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { url, message } => write!(f, "request for {url} failed: {message}"),
            Self::Status { url, status } => write!(f, "{url} answered with status {status}"),
            Self::Malformed { url, source } => write!(f, "catalog {url} is not valid JSON: {source}"),
            Self::NotAnObject { url } => write!(f, "catalog {url} is not a JSON object"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed { source, .. } => Some(source),
            Self::Transport { .. } | Self::Status { .. } | Self::NotAnObject { .. } => None,
        }
    }
}

/// Failure reading or writing the persisted preference.
#[derive(Debug)]
pub enum StorageError {
    /// Storage is disabled or restricted (private browsing, quota).
    Unavailable(String),
    /// The backing file could not be read or written.
    Io(std::io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Io(err) => write!(f, "storage I/O error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Invalid site settings.
#[derive(Debug)]
pub enum SettingsError {
    /// No supported languages were configured.
    EmptyLanguageSet,
    /// A configured language code is malformed.
    InvalidLanguage(String),
    /// The default language is not in the supported list.
    UnsupportedDefault(String),
    /// A setting has a value that cannot be used.
    InvalidValue {
        /// Normalized setting key.
        key: String,
        /// Raw value from the file.
        value: String,
    },
    /// The settings file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLanguageSet => write!(f, "no supported languages configured"),
            Self::InvalidLanguage(code) => write!(f, "invalid language code '{code}'"),
            Self::UnsupportedDefault(code) => {
                write!(f, "default language '{code}' is not in the supported list")
            }
            Self::InvalidValue { key, value } => write!(f, "invalid value '{value}' for '{key}'"),
            Self::Io(err) => write!(f, "failed to read settings: {err}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn catalog_error_display_names_url() {
        let err = CatalogError::Status {
            url: "lang/en.json".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "lang/en.json answered with status 404");
        assert_eq!(err.url(), "lang/en.json");
        assert!(err.source().is_none());
    }

    #[test]
    fn malformed_exposes_parser_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated JSON");
        let err = CatalogError::Malformed {
            url: "lang/de.json".to_string(),
            source,
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("catalog lang/de.json is not valid JSON"));
    }

    #[test]
    fn storage_error_from_io() {
        let err: StorageError = std::io::Error::other("disk gone").into();
        assert!(matches!(err, StorageError::Io(_)));
        assert!(err.to_string().contains("disk gone"));
    }
}
