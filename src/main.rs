//! sitelang binary entrypoint: runs the language switcher against a page on
//! disk, the way a visitor's browser would, and prints the resulting HTML.

mod args;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use sitelang::SwitchController;
use sitelang::dom::PageDocument;
use sitelang::i18n::{CatalogFetcher, DirFetcher, FileStorage, HttpFetcher};
use sitelang::settings::{SiteSettings, paths};

/// Result type for the binary's setup path.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> ExitCode {
    let args = args::Args::parse();
    logging::init(&args::determine_log_level(&args));

    tracing::info!(page = %args.page.display(), switch = ?args.switch, "sitelang starting");
    match run(&args).await {
        Ok(()) => {
            tracing::info!("sitelang finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "sitelang failed");
            eprintln!("sitelang: {err}");
            ExitCode::FAILURE
        }
    }
}

/// What: Load settings and the page, pick a fetcher, run the engine, write the page.
///
/// Inputs:
/// - `args`: Parsed command line
///
/// # Errors
/// - Unreadable page or settings, invalid `--origin`, output write failure
///
/// Details:
/// - Catalog failures are not errors here: like in the browser, the page is
///   written untranslated and the failure is only logged
async fn run(args: &args::Args) -> Result<()> {
    let settings = match args.config.clone().or_else(paths::resolve_settings_path) {
        Some(path) => SiteSettings::load(&path)?,
        None => SiteSettings::default(),
    };

    let html = tokio::fs::read_to_string(&args.page)
        .await
        .map_err(|e| format!("cannot read {}: {e}", args.page.display()))?;
    let document = PageDocument::parse(&html);
    let storage = FileStorage::new(
        args.preferences
            .clone()
            .unwrap_or_else(paths::preferences_path),
    );

    let translated = if let Some(origin) = &args.origin {
        let page_url = reqwest::Url::parse(origin)?;
        let fetcher = HttpFetcher::new(page_url, settings.request_timeout)?;
        drive(&settings, storage, fetcher, document, args).await
    } else {
        let page_dir = paths::parent_or_current(&args.page);
        let site_root = args.site_root.clone().unwrap_or_else(|| page_dir.clone());
        let fetcher = DirFetcher::new(site_root, page_dir);
        drive(&settings, storage, fetcher, document, args).await
    };

    if let Some(path) = &args.output {
        tokio::fs::write(path, translated)
            .await
            .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote translated page");
    } else {
        println!("{translated}");
    }
    Ok(())
}

/// What: Run startup plus the optional switch and return the final HTML.
///
/// Details:
/// - `--switch` goes through the page's own switch control when it has one,
///   and calls `switch_to` directly otherwise
async fn drive<F: CatalogFetcher>(
    settings: &SiteSettings,
    storage: FileStorage,
    fetcher: F,
    document: PageDocument,
    args: &args::Args,
) -> String {
    let controller = SwitchController::new(settings, storage, fetcher, document);
    controller.start().await;

    if let Some(code) = &args.switch
        && !controller.activate_code(code).await
    {
        tracing::warn!(code = %code, "page has no switch control for this code; switching directly");
        let _ = controller.switch_to(code).await;
    }

    if args.report {
        match serde_json::to_string(&controller.last_report()) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode apply report"),
        }
    }
    controller.into_document().to_html()
}
