//! Command-line argument definition.

use std::path::PathBuf;

use clap::Parser;

/// sitelang - run a static site's language switcher against a page on disk
#[derive(Parser, Debug)]
#[command(name = "sitelang")]
#[command(version)]
#[command(about = "Run a static site's language switcher against a page and print the translated HTML", long_about = None)]
pub struct Args {
    /// HTML page to translate
    pub page: PathBuf,

    /// Public URL of the page; catalogs are then fetched over HTTP relative to it
    #[arg(long)]
    pub origin: Option<String>,

    /// Directory that `/`-prefixed catalog paths resolve against (default: the page's directory)
    #[arg(long)]
    pub site_root: Option<PathBuf>,

    /// Activate the switch control for this language after startup
    #[arg(short, long)]
    pub switch: Option<String>,

    /// Settings file (default: ~/.config/sitelang/settings.conf when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// File the language preference is persisted in (default: ~/.local/state/sitelang/preferences.conf)
    #[arg(long)]
    pub preferences: Option<PathBuf>,

    /// Write the translated page here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the last apply report as JSON on stderr
    #[arg(long)]
    pub report: bool,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let args = Args::try_parse_from(["sitelang", "index.html"]).expect("valid args");
        assert_eq!(args.page, PathBuf::from("index.html"));
        assert!(args.switch.is_none());
        assert_eq!(args.log_level, "info");
        assert!(!args.report);
    }

    #[test]
    fn parses_full_invocation() {
        let args = Args::try_parse_from([
            "sitelang",
            "site/about.html",
            "--origin",
            "https://example.org/about.html",
            "--site-root",
            "site",
            "-s",
            "en",
            "--preferences",
            "prefs.conf",
            "-o",
            "out.html",
            "--report",
            "-v",
        ])
        .expect("valid args");
        assert_eq!(args.origin.as_deref(), Some("https://example.org/about.html"));
        assert_eq!(args.site_root, Some(PathBuf::from("site")));
        assert_eq!(args.switch.as_deref(), Some("en"));
        assert_eq!(args.preferences, Some(PathBuf::from("prefs.conf")));
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        assert!(args.report);
        assert!(args.verbose);
    }

    #[test]
    fn page_is_required() {
        assert!(Args::try_parse_from(["sitelang"]).is_err());
    }
}
