//! Ways of retrieving a catalog body for a URL.
//!
//! The loader only builds URLs and decodes bodies; the transport is one of the
//! fetchers below, chosen by whoever constructs the engine.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::i18n::error::CatalogError;

/// Raw response to a catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code (local fetchers synthesize 200/404).
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl FetchResponse {
    /// A 200 response with `body`.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// An empty 404 response.
    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            status: 404,
            body: String::new(),
        }
    }

    /// Whether the status is in 200-299.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Issues a GET for a catalog URL.
///
/// `url` is exactly what the page would request: possibly relative
/// (`../lang/en.json`) or root-relative (`/lang/en.json`).
pub trait CatalogFetcher {
    /// What: Fetch `url`.
    ///
    /// Output:
    /// - The response, whatever its status
    ///
    /// # Errors
    /// - `CatalogError::Transport` when no response could be obtained
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse, CatalogError>>;
}

/// What: Fetches catalogs over HTTP with `reqwest`.
///
/// Details:
/// - Relative URLs are resolved against the page URL, as a browser would
/// - No timeout unless one is configured
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Shared client with connection pooling.
    client: reqwest::Client,
    /// URL of the page the catalogs are requested from.
    page_url: reqwest::Url,
}

impl HttpFetcher {
    /// What: Build a fetcher for a page.
    ///
    /// Inputs:
    /// - `page_url`: Absolute URL of the page being translated
    /// - `timeout`: Optional whole-request timeout
    ///
    /// # Errors
    /// - When the HTTP client cannot be constructed (TLS backend failure)
    pub fn new(page_url: reqwest::Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(format!(
            "sitelang/{}",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            page_url,
        })
    }

    /// Page URL relative catalog paths are joined onto.
    #[must_use]
    pub const fn page_url(&self) -> &reqwest::Url {
        &self.page_url
    }
}

impl CatalogFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CatalogError> {
        let transport = |message: String| CatalogError::Transport {
            url: url.to_string(),
            message,
        };
        let target = self
            .page_url
            .join(url)
            .map_err(|e| transport(format!("invalid URL: {e}")))?;
        tracing::debug!(url = %target, "requesting catalog");
        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| transport(e.to_string()))?;
        Ok(FetchResponse { status, body })
    }
}

/// What: Serves catalogs from a site checked out on disk.
///
/// Details:
/// - `/`-prefixed URLs resolve against `site_root`
/// - Other URLs resolve against the page's directory
/// - Missing files answer 404, like a static file server
#[derive(Debug, Clone)]
pub struct DirFetcher {
    /// Directory the site is deployed from.
    site_root: PathBuf,
    /// Directory containing the page.
    page_dir: PathBuf,
}

impl DirFetcher {
    /// Fetcher for a page living in `page_dir` of a site rooted at `site_root`.
    #[must_use]
    pub fn new(site_root: impl Into<PathBuf>, page_dir: impl Into<PathBuf>) -> Self {
        Self {
            site_root: site_root.into(),
            page_dir: page_dir.into(),
        }
    }

    /// What: Map a catalog URL to a file path.
    ///
    /// Output:
    /// - `None` for absolute `scheme://` URLs, which cannot be served from disk
    #[must_use]
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        if url.contains("://") {
            return None;
        }
        let path = url.split(['?', '#']).next().unwrap_or(url);
        Some(path.strip_prefix('/').map_or_else(
            || self.page_dir.join(path),
            |rooted| self.site_root.join(rooted),
        ))
    }

    /// Site root directory.
    #[must_use]
    pub fn site_root(&self) -> &Path {
        &self.site_root
    }
}

impl CatalogFetcher for DirFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CatalogError> {
        let Some(path) = self.resolve(url) else {
            return Err(CatalogError::Transport {
                url: url.to_string(),
                message: "absolute URLs need an HTTP fetcher".to_string(),
            });
        };
        tracing::debug!(path = %path.display(), "reading catalog from disk");
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(FetchResponse::not_found()),
            Err(err) => Err(CatalogError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }),
        }
    }
}

/// What: Serves catalog bodies from memory.
///
/// Details:
/// - Unknown URLs answer 404
/// - Every requested URL is recorded, in order
#[derive(Debug, Default)]
pub struct StaticFetcher {
    /// URL -> response.
    responses: HashMap<String, FetchResponse>,
    /// Requested URLs.
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    /// Fetcher with no responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 for `url`.
    #[must_use]
    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), FetchResponse::ok(body));
        self
    }

    /// Serve an arbitrary response for `url`.
    #[must_use]
    pub fn with_response(mut self, url: &str, response: FetchResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    /// URLs requested so far.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl CatalogFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CatalogError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        Ok(self
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(FetchResponse::not_found))
    }
}
