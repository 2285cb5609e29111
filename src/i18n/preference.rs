//! Persisted language preference and the storage backends behind it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::i18n::error::StorageError;
use crate::i18n::language::{LanguageCode, SiteLanguages};
use crate::util::config::{parse_key_value, skip_comment_or_empty};

/// Key-value storage the preference lives in (the browser's `localStorage`
/// on a real page).
pub trait StorageBackend {
    /// What: Read the value stored under `key`.
    ///
    /// Output:
    /// - `Ok(None)` when nothing is stored
    ///
    /// # Errors
    /// - When the storage cannot be read at all
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// What: Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// - When the storage rejects the write
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage; can be created disabled to mimic private browsing.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// Stored items.
    items: Mutex<HashMap<String, String>>,
    /// When `true`, every call fails with `StorageError::Unavailable`.
    disabled: bool,
}

impl MemoryStorage {
    /// Empty, working storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects every read and write.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            disabled: true,
        }
    }

    /// Storage pre-filled with one raw item, bypassing validation.
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.insert_raw(key, value);
        storage
    }

    /// Write a raw value without any validation (foreign scripts, old versions).
    pub fn insert_raw(&self, key: &str, value: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
    }

    /// Read a raw value regardless of the disabled flag.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.disabled {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        let items = self
            .items
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        let mut items = self
            .items
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage persisted to a `key = value` file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Backing file; created on first write.
    path: PathBuf,
}

impl FileStorage {
    /// Storage backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(content
            .lines()
            .filter(|line| !skip_comment_or_empty(line))
            .filter_map(parse_key_value)
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .last())
    }

    /// Rewrites the file, replacing the line for `key` and keeping every
    /// other line (comments included) as it was.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };

        let mut replaced = false;
        let mut lines: Vec<String> = Vec::new();
        for line in existing.lines() {
            let is_key_line = !skip_comment_or_empty(line)
                && parse_key_value(line).is_some_and(|(k, _)| k == key);
            if is_key_line {
                if !replaced {
                    lines.push(format!("{key} = {value}"));
                    replaced = true;
                }
            } else {
                lines.push(line.to_string());
            }
        }
        if !replaced {
            lines.push(format!("{key} = {value}"));
        }

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// What: Reads and writes the visitor's language choice.
///
/// Details:
/// - Every value coming out of [`PreferenceStore::get`] belongs to the
///   configured [`SiteLanguages`]
/// - Storage failures degrade to the default language and are only logged
#[derive(Debug)]
pub struct PreferenceStore<S> {
    /// Storage handle.
    storage: S,
    /// Storage key holding the code.
    key: String,
    /// Supported set used to validate stored values.
    languages: SiteLanguages,
}

impl<S: StorageBackend> PreferenceStore<S> {
    /// Store reading/writing `key` in `storage`.
    #[must_use]
    pub fn new(storage: S, key: impl Into<String>, languages: SiteLanguages) -> Self {
        Self {
            storage,
            key: key.into(),
            languages,
        }
    }

    /// What: Read the persisted language.
    ///
    /// Output:
    /// - The stored code when it is supported, the default code otherwise
    ///
    /// Details:
    /// - Absent, unreadable and foreign values all yield the default
    #[must_use]
    pub fn get(&self) -> LanguageCode {
        match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => self.languages.coerce(&raw),
            Ok(None) => self.languages.default_code().clone(),
            Err(err) => {
                tracing::debug!(key = %self.key, error = %err, "preference unreadable, using default");
                self.languages.default_code().clone()
            }
        }
    }

    /// What: Persist `code`, best effort.
    ///
    /// Details:
    /// - A rejected write is logged and otherwise ignored
    pub fn set(&self, code: &LanguageCode) {
        if let Err(err) = self.storage.set_item(&self.key, code.as_str()) {
            tracing::debug!(key = %self.key, code = %code, error = %err, "preference not persisted");
        }
    }

    /// Storage handle.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const KEY: &str = "photoness_lang";

    fn store(storage: MemoryStorage) -> PreferenceStore<MemoryStorage> {
        PreferenceStore::new(storage, KEY, SiteLanguages::default())
    }

    #[test]
    fn set_then_get_round_trips_every_supported_code() {
        let prefs = store(MemoryStorage::new());
        let languages = SiteLanguages::default();
        for code in languages.iter() {
            prefs.set(code);
            assert_eq!(&prefs.get(), code);
        }
    }

    #[test]
    fn get_without_value_is_default() {
        let prefs = store(MemoryStorage::new());
        assert_eq!(prefs.get(), "es");
    }

    #[test]
    fn get_with_foreign_value_is_default() {
        let prefs = store(MemoryStorage::with_item(KEY, "klingon"));
        assert_eq!(prefs.get(), "es");
    }

    #[test]
    fn disabled_storage_degrades_silently() {
        let prefs = store(MemoryStorage::disabled());
        let en = SiteLanguages::default().coerce("en");
        prefs.set(&en);
        assert_eq!(prefs.get(), "es");
        assert_eq!(prefs.storage().raw(KEY), None);
    }

    #[test]
    fn file_storage_missing_file_reads_none() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FileStorage::new(dir.path().join("prefs.conf"));
        assert!(matches!(storage.get_item(KEY), Ok(None)));
    }

    #[test]
    fn file_storage_preserves_other_lines() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("prefs.conf");
        fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
        fs::write(&path, "# visitor state\ntheme = dark\nphotoness_lang = de\n")
            .expect("seed file");

        let storage = FileStorage::new(&path);
        storage.set_item(KEY, "fr").expect("write");

        let content = fs::read_to_string(&path).expect("read back");
        assert_eq!(content, "# visitor state\ntheme = dark\nphotoness_lang = fr\n");
        assert_eq!(storage.get_item(KEY).expect("read"), Some("fr".to_string()));
        assert_eq!(storage.get_item("theme").expect("read"), Some("dark".to_string()));
    }

    #[test]
    fn file_storage_creates_parent_directories() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FileStorage::new(dir.path().join("a").join("b").join("prefs.conf"));
        storage.set_item(KEY, "en").expect("write");
        let prefs = PreferenceStore::new(storage, KEY, SiteLanguages::default());
        assert_eq!(prefs.get(), "en");
    }

    #[test]
    fn file_storage_unreadable_path_degrades_to_default() {
        let dir = TempDir::new().expect("temp dir");
        // A directory cannot be read as a file.
        let prefs = PreferenceStore::new(
            FileStorage::new(dir.path()),
            KEY,
            SiteLanguages::default(),
        );
        assert_eq!(prefs.get(), "es");
        prefs.set(&SiteLanguages::default().coerce("en"));
        assert_eq!(prefs.get(), "es");
    }
}
