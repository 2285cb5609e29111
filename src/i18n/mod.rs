//! Translation engine for static pages.
//!
//! # Overview
//!
//! - **Languages**: a closed set of codes with one default ([`SiteLanguages`]);
//!   anything outside the set is treated as the default
//! - **Preference**: the visitor's choice, persisted through a [`StorageBackend`]
//!   ([`PreferenceStore`])
//! - **Catalogs**: one JSON object per language at `{base}lang/{code}.json`,
//!   fetched fresh on every switch ([`CatalogLoader`])
//! - **Switching**: [`SwitchController`] ties the pieces together and applies
//!   catalogs to the page through [`crate::dom::DomApplier`]
//!
//! # Catalog files
//!
//! ```json
//! {
//!   "nav.home": "Home",
//!   "hero.title": "Light, <em>captured</em>",
//!   "meta.description": "Photo studio"
//! }
//! ```
//!
//! `meta.description` is reserved and updates `<meta name="description">`.
//!
//! # Error Handling
//!
//! - Unreadable or disabled storage behaves as "no preference"
//! - Failed requests, error statuses and malformed catalogs leave the page as
//!   it was; they are logged at `warn` and returned to the caller
//! - Missing keys keep the authored text

mod catalog;
mod error;
mod fetch;
mod language;
mod loader;
mod preference;
mod switcher;

pub use catalog::{META_DESCRIPTION_KEY, TranslationCatalog, parse_catalog};
pub use error::{CatalogError, SettingsError, StorageError};
pub use fetch::{CatalogFetcher, DirFetcher, FetchResponse, HttpFetcher, StaticFetcher};
pub use language::{LanguageCode, SiteLanguages};
pub use loader::{CatalogLoader, ROOT_BASE_PATH};
pub use preference::{FileStorage, MemoryStorage, PreferenceStore, StorageBackend};
pub use switcher::{Phase, SwitchController};
