//! Startup sequencing and language switching.

use std::cell::{Cell, Ref, RefCell};

use ego_tree::NodeId;

use crate::dom::{ApplyReport, DomApplier, Markup, PageDocument};
use crate::i18n::error::CatalogError;
use crate::i18n::fetch::CatalogFetcher;
use crate::i18n::language::{LanguageCode, SiteLanguages};
use crate::i18n::loader::CatalogLoader;
use crate::i18n::preference::{PreferenceStore, StorageBackend};
use crate::settings::SiteSettings;

/// Where the controller is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded, or the last load failed.
    Idle,
    /// A catalog request is in flight.
    Loading,
    /// A catalog has been applied to the document.
    Applied,
}

/// What: Drives the translation engine for one page.
///
/// Inputs (at construction):
/// - Storage handle, fetcher and parsed document, all owned by the controller
///
/// Details:
/// - Single-threaded: state lives in `Cell`/`RefCell` and no borrow is held
///   across the fetch, so several [`SwitchController::switch_to`] futures may
///   be polled together
/// - Overlapping switches are not cancelled; the response that completes last
///   is applied last
/// - Failures never change the document; they are logged and returned
#[derive(Debug)]
pub struct SwitchController<S, F> {
    /// Supported languages.
    languages: SiteLanguages,
    /// Markup contract.
    markup: Markup,
    /// Persisted choice.
    preferences: PreferenceStore<S>,
    /// Catalog transport.
    loader: CatalogLoader<F>,
    /// The page.
    document: RefCell<PageDocument>,
    /// Load cycle state.
    phase: Cell<Phase>,
    /// Most recently requested language.
    current: RefCell<LanguageCode>,
    /// Report of the last successful apply.
    last_report: Cell<Option<ApplyReport>>,
}

impl<S: StorageBackend, F: CatalogFetcher> SwitchController<S, F> {
    /// What: Assemble a controller.
    ///
    /// Inputs:
    /// - `settings`: Languages, storage key, paths and markup contract
    /// - `storage`: Where the preference is persisted
    /// - `fetcher`: How catalogs are retrieved
    /// - `document`: The page to translate
    ///
    /// Details:
    /// - Does no I/O; call [`Self::start`] to run the startup sequence
    #[must_use]
    pub fn new(settings: &SiteSettings, storage: S, fetcher: F, document: PageDocument) -> Self {
        let languages = settings.languages.clone();
        Self {
            current: RefCell::new(languages.default_code().clone()),
            preferences: PreferenceStore::new(
                storage,
                settings.storage_key.clone(),
                languages.clone(),
            ),
            loader: CatalogLoader::new(
                fetcher,
                settings.script_path.clone(),
                settings.catalog_dir.clone(),
            ),
            markup: settings.markup.clone(),
            languages,
            document: RefCell::new(document),
            phase: Cell::new(Phase::Idle),
            last_report: Cell::new(None),
        }
    }

    /// What: Run the page-load sequence.
    ///
    /// Details:
    /// - Default language: no request, the matching switch control is marked
    ///   active
    /// - Any other stored language: full [`Self::switch_to`] pipeline
    pub async fn start(&self) {
        let stored = self.preferences.get();
        tracing::info!(language = %stored, "starting translation engine");
        if self.languages.is_default(&stored) {
            *self.current.borrow_mut() = stored.clone();
            self.sync_switch_controls(&stored);
        } else {
            // Failures are already logged and leave the authored page in place.
            let _ = self.switch_to(stored.as_str()).await;
        }
    }

    /// What: Switch the page to `raw`.
    ///
    /// Inputs:
    /// - `raw`: Requested code; unknown codes mean the default language
    ///
    /// Output:
    /// - What was applied, or why nothing was; the page never shows either
    ///
    /// # Errors
    /// - The [`CatalogError`] of a failed load; the document keeps its prior content
    ///
    /// Details:
    /// - Persists the code, sets `<html lang>` and the switch-control classes
    ///   before the request is issued
    /// - The default language is loaded like any other, so switching back
    ///   restores its catalog text
    pub async fn switch_to(&self, raw: &str) -> Result<ApplyReport, CatalogError> {
        let code = self.languages.coerce(raw);
        self.preferences.set(&code);
        *self.current.borrow_mut() = code.clone();

        let base_path = {
            let mut document = self.document.borrow_mut();
            document.set_document_language(code.as_str());
            self.loader.resolve_base_path(&document)
        };
        self.sync_switch_controls(&code);

        self.phase.set(Phase::Loading);
        match self.loader.load(&base_path, &code).await {
            Ok(catalog) => {
                let report =
                    DomApplier::new(&self.markup).apply(&mut self.document.borrow_mut(), &catalog);
                self.phase.set(Phase::Applied);
                self.last_report.set(Some(report));
                tracing::info!(language = %code, keys = catalog.len(), "language applied");
                Ok(report)
            }
            Err(err) => {
                self.phase.set(Phase::Idle);
                tracing::warn!(language = %code, error = %err, "catalog load failed, page left unchanged");
                Err(err)
            }
        }
    }

    /// What: Handle an activation (click, tap, key press) on `target`.
    ///
    /// Inputs:
    /// - `target`: Node that received the activation; may be nested inside a
    ///   switch control
    ///
    /// Output:
    /// - `true` when a switch control was activated and the host should
    ///   suppress the default action
    pub async fn activate(&self, target: NodeId) -> bool {
        let raw = {
            let document = self.document.borrow();
            document
                .closest_with_attr(target, &self.markup.switch_attr)
                .and_then(|id| document.element(id))
                .and_then(|el| el.attr(&self.markup.switch_attr))
                .map(ToString::to_string)
        };
        let Some(raw) = raw else {
            return false;
        };
        let _ = self.switch_to(&raw).await;
        true
    }

    /// What: Activate the first switch control whose code is `raw`.
    ///
    /// Output:
    /// - `false` when the page has no such control
    pub async fn activate_code(&self, raw: &str) -> bool {
        let control = {
            let document = self.document.borrow();
            document
                .elements_with_attr(&self.markup.switch_attr)
                .into_iter()
                .find(|id| {
                    document
                        .element(*id)
                        .and_then(|el| el.attr(&self.markup.switch_attr))
                        == Some(raw)
                })
        };
        match control {
            Some(id) => self.activate(id).await,
            None => {
                tracing::debug!(code = raw, "no switch control for code");
                false
            }
        }
    }

    /// Mark the controls for `code` active and every other control inactive.
    fn sync_switch_controls(&self, code: &LanguageCode) {
        let attr = &self.markup.switch_attr;
        let class = &self.markup.active_class;
        let mut document = self.document.borrow_mut();
        for id in document.elements_with_attr(attr) {
            document.update_element(id, |el| {
                if el.attr(attr) == Some(code.as_str()) {
                    el.add_class(class);
                } else {
                    el.remove_class(class);
                }
            });
        }
    }

    /// Current load cycle state.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Most recently requested language.
    #[must_use]
    pub fn current(&self) -> LanguageCode {
        self.current.borrow().clone()
    }

    /// Counters of the last successful apply.
    #[must_use]
    pub fn last_report(&self) -> Option<ApplyReport> {
        self.last_report.get()
    }

    /// Borrow the page.
    ///
    /// # Panics
    /// - If called while the controller is mutating the document, which cannot
    ///   happen from outside since no borrow outlives a method call
    #[must_use]
    pub fn document(&self) -> Ref<'_, PageDocument> {
        self.document.borrow()
    }

    /// Give back the page.
    #[must_use]
    pub fn into_document(self) -> PageDocument {
        self.document.into_inner()
    }

    /// Preference store.
    #[must_use]
    pub const fn preferences(&self) -> &PreferenceStore<S> {
        &self.preferences
    }

    /// Catalog loader.
    #[must_use]
    pub const fn loader(&self) -> &CatalogLoader<F> {
        &self.loader
    }

    /// Supported languages.
    #[must_use]
    pub const fn languages(&self) -> &SiteLanguages {
        &self.languages
    }
}
