//! Writes a translation catalog into a page.

use serde::Serialize;

use crate::dom::document::PageDocument;
use crate::dom::markup::Markup;
use crate::i18n::TranslationCatalog;

/// Counters describing one [`DomApplier::apply`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Content bindings whose key was found and written.
    pub content_applied: usize,
    /// Content bindings left with their authored content.
    pub content_missing: usize,
    /// Placeholder bindings written.
    pub placeholders_applied: usize,
    /// Placeholder bindings whose key was missing.
    pub placeholders_missing: usize,
    /// Whether the document title was replaced.
    pub title_applied: bool,
    /// Whether the description metadata was replaced.
    pub description_applied: bool,
}

/// What: Applies a catalog to the bindings flagged in a page.
///
/// Details:
/// - Stateless: every call rescans the document for flagged elements
/// - Missing keys leave the authored content in place
/// - Catalog values are inserted as HTML, unescaped. This is only safe for
///   catalogs written by the site's maintainers; never point the engine at a
///   catalog whose content an outsider controls.
#[derive(Debug, Clone, Copy)]
pub struct DomApplier<'a> {
    /// Attribute names to look for.
    markup: &'a Markup,
}

impl<'a> DomApplier<'a> {
    /// Applier recognizing the given markup contract.
    #[must_use]
    pub const fn new(markup: &'a Markup) -> Self {
        Self { markup }
    }

    /// What: Write `catalog` into `document`.
    ///
    /// Inputs:
    /// - `document`: Page to mutate
    /// - `catalog`: Translations for the target language
    ///
    /// Output:
    /// - Counts of applied and missing bindings
    ///
    /// Details:
    /// - Content bindings get their children replaced (`innerHTML` semantics)
    /// - Placeholder bindings get their placeholder attribute replaced
    /// - The first title binding sets the document title
    /// - A non-empty `meta.description` updates the description `<meta>`
    /// - Applying the same catalog again produces the same document
    pub fn apply(&self, document: &mut PageDocument, catalog: &TranslationCatalog) -> ApplyReport {
        let mut report = ApplyReport::default();
        let m = self.markup;

        for (id, key) in bindings(document, &m.content_attr) {
            if let Some(value) = catalog.get(&key) {
                document.set_inner_html(id, value);
                report.content_applied += 1;
            } else {
                tracing::trace!(key = %key, "no translation, keeping authored content");
                report.content_missing += 1;
            }
        }

        for (id, key) in bindings(document, &m.placeholder_attr) {
            if let Some(value) = catalog.get(&key) {
                document.update_element(id, |el| el.set_attr(&m.placeholder_target, value));
                report.placeholders_applied += 1;
            } else {
                report.placeholders_missing += 1;
            }
        }

        let title_key = document
            .first_element_with_attr(&m.title_attr)
            .and_then(|id| document.element(id))
            .and_then(|el| el.attr(&m.title_attr))
            .map(ToString::to_string);
        if let Some(title) = title_key.as_deref().and_then(|key| catalog.get(key)) {
            document.set_title(title);
            report.title_applied = true;
        }

        if let Some(description) = catalog.meta_description().filter(|d| !d.is_empty())
            && let Some(meta) = document.meta_named(&m.description_meta)
        {
            document.update_element(meta, |el| el.set_attr("content", description));
            report.description_applied = true;
        }

        tracing::debug!(
            applied = report.content_applied,
            missing = report.content_missing,
            placeholders = report.placeholders_applied,
            title = report.title_applied,
            description = report.description_applied,
            "applied catalog"
        );
        report
    }
}

/// Flagged elements and their keys, collected before any mutation.
fn bindings(document: &PageDocument, attr: &str) -> Vec<(ego_tree::NodeId, String)> {
    document
        .elements_with_attr(attr)
        .into_iter()
        .filter_map(|id| {
            let key = document.element(id)?.attr(attr)?.to_string();
            Some((id, key))
        })
        .collect()
}
