//! Catalog location and loading.

use crate::dom::PageDocument;
use crate::i18n::catalog::{TranslationCatalog, parse_catalog};
use crate::i18n::error::CatalogError;
use crate::i18n::fetch::CatalogFetcher;
use crate::i18n::language::LanguageCode;

/// Base path used when the page does not reference the engine script.
pub const ROOT_BASE_PATH: &str = "/";

/// What: Locates and fetches translation catalogs.
///
/// Details:
/// - Holds no state besides the fetcher; every load is a fresh request
/// - Concurrent loads are neither merged nor cancelled
#[derive(Debug)]
pub struct CatalogLoader<F> {
    /// Transport.
    fetcher: F,
    /// Site-relative path of the engine script, e.g. `js/i18n.js`.
    script_path: String,
    /// Site-relative directory holding `{code}.json` catalogs.
    catalog_dir: String,
}

impl<F: CatalogFetcher> CatalogLoader<F> {
    /// What: Create a loader.
    ///
    /// Inputs:
    /// - `fetcher`: Transport used for every request
    /// - `script_path`: Where the engine script sits relative to the site root
    /// - `catalog_dir`: Where catalogs sit relative to the site root
    #[must_use]
    pub fn new(fetcher: F, script_path: impl Into<String>, catalog_dir: impl Into<String>) -> Self {
        Self {
            fetcher,
            script_path: script_path.into(),
            catalog_dir: catalog_dir.into().trim_matches('/').to_string(),
        }
    }

    /// What: Derive the site root from the page's script reference.
    ///
    /// Inputs:
    /// - `document`: Page being translated
    ///
    /// Output:
    /// - Base path ending where the site root is, e.g. `""`, `"../"`,
    ///   `"/portfolio/"`; `"/"` when no usable script reference exists
    ///
    /// Details:
    /// - Picks the first `<script src>` mentioning the script's file name
    /// - Strips `script_path` and any query string from the end of that `src`
    #[must_use]
    pub fn resolve_base_path(&self, document: &PageDocument) -> String {
        let file_name = self
            .script_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.script_path);
        let Some(src) = document
            .script_sources()
            .into_iter()
            .find(|src| src.contains(file_name))
        else {
            return ROOT_BASE_PATH.to_string();
        };

        let path = src.split_once('?').map_or(src.as_str(), |(path, _)| path);
        if let Some(base) = path.strip_suffix(self.script_path.as_str()) {
            return base.to_string();
        }
        tracing::debug!(src = %src, script = %self.script_path, "script reference does not end with the script path, using site root");
        ROOT_BASE_PATH.to_string()
    }

    /// Catalog URL for `code` under `base_path`.
    #[must_use]
    pub fn catalog_url(&self, base_path: &str, code: &LanguageCode) -> String {
        format!("{base_path}{}/{code}.json", self.catalog_dir)
    }

    /// What: Fetch and decode the catalog for `code`.
    ///
    /// Inputs:
    /// - `base_path`: Result of [`Self::resolve_base_path`]
    /// - `code`: Language to load
    ///
    /// Output:
    /// - The decoded catalog
    ///
    /// # Errors
    /// - `CatalogError::Transport` when the request fails
    /// - `CatalogError::Status` for responses outside 200-299
    /// - `CatalogError::Malformed` / `CatalogError::NotAnObject` for bad bodies
    ///
    /// Details:
    /// - One request, no retry and no fallback catalog
    pub async fn load(
        &self,
        base_path: &str,
        code: &LanguageCode,
    ) -> Result<TranslationCatalog, CatalogError> {
        let url = self.catalog_url(base_path, code);
        let response = self.fetcher.fetch(&url).await?;
        if !response.is_success() {
            return Err(CatalogError::Status {
                url,
                status: response.status,
            });
        }
        let catalog = parse_catalog(&response.body, &url)?;
        tracing::debug!(url = %url, keys = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Transport handle.
    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::fetch::{FetchResponse, StaticFetcher};
    use crate::i18n::language::SiteLanguages;

    fn loader(fetcher: StaticFetcher) -> CatalogLoader<StaticFetcher> {
        CatalogLoader::new(fetcher, "js/i18n.js", "lang")
    }

    fn page_with_script(src: &str) -> PageDocument {
        PageDocument::parse(&format!(
            "<!DOCTYPE html><html><head><script src=\"js/vendor.js\"></script><script src=\"{src}\"></script></head><body></body></html>"
        ))
    }

    #[test]
    fn base_path_from_relative_script() {
        let l = loader(StaticFetcher::new());
        assert_eq!(l.resolve_base_path(&page_with_script("js/i18n.js")), "");
        assert_eq!(l.resolve_base_path(&page_with_script("../js/i18n.js")), "../");
        assert_eq!(
            l.resolve_base_path(&page_with_script("/portfolio/js/i18n.js?v=3")),
            "/portfolio/"
        );
    }

    #[test]
    fn base_path_defaults_to_root() {
        let l = loader(StaticFetcher::new());
        let page = PageDocument::parse("<html><head></head><body></body></html>");
        assert_eq!(l.resolve_base_path(&page), "/");
        assert_eq!(l.resolve_base_path(&page_with_script("scripts/i18n.js")), "/");
    }

    #[test]
    fn catalog_url_joins_base_dir_and_code() {
        let l = loader(StaticFetcher::new());
        let en = SiteLanguages::default().coerce("en");
        assert_eq!(l.catalog_url("", &en), "lang/en.json");
        assert_eq!(l.catalog_url("../", &en), "../lang/en.json");
        assert_eq!(l.catalog_url("/", &en), "/lang/en.json");
    }

    #[tokio::test]
    async fn load_decodes_success() {
        let l = loader(StaticFetcher::new().with_body("lang/en.json", r#"{"a.b": "Hi"}"#));
        let en = SiteLanguages::default().coerce("en");
        let catalog = l.load("", &en).await.expect("catalog");
        assert_eq!(catalog.get("a.b"), Some("Hi"));
    }

    #[tokio::test]
    async fn load_reports_status_and_bad_bodies() {
        let fetcher = StaticFetcher::new()
            .with_response(
                "lang/de.json",
                FetchResponse {
                    status: 500,
                    body: "{}".to_string(),
                },
            )
            .with_body("lang/fr.json", "<html>oops</html>");
        let l = loader(fetcher);
        let langs = SiteLanguages::default();

        let err = l.load("", &langs.coerce("de")).await.expect_err("500");
        assert!(matches!(err, CatalogError::Status { status: 500, .. }));

        let err = l.load("", &langs.coerce("fr")).await.expect_err("html body");
        assert!(matches!(err, CatalogError::Malformed { .. }));

        let err = l.load("", &langs.coerce("en")).await.expect_err("missing");
        assert!(matches!(err, CatalogError::Status { status: 404, .. }));

        assert_eq!(l.fetcher().requests().len(), 3);
    }
}
