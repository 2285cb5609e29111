//! Shared utilities for argument processing.

/// What: Determine the log level based on command-line arguments and environment variables.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides `log_level` argument.
/// - `SITELANG_TRACE=1` enables TRACE level, which also logs every missing key.
#[must_use]
pub fn determine_log_level(args: &crate::args::Args) -> String {
    if std::env::var("SITELANG_TRACE").ok().as_deref() == Some("1") {
        "trace".to_string()
    } else if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn verbose_overrides_log_level() {
        let args = crate::args::Args::try_parse_from([
            "sitelang",
            "index.html",
            "--log-level",
            "warn",
            "--verbose",
        ])
        .expect("valid args");
        if std::env::var("SITELANG_TRACE").ok().as_deref() != Some("1") {
            assert_eq!(determine_log_level(&args), "debug");
        }
    }

    #[test]
    fn explicit_log_level_is_kept() {
        let args = crate::args::Args::try_parse_from(["sitelang", "index.html", "--log-level", "warn"])
            .expect("valid args");
        if std::env::var("SITELANG_TRACE").ok().as_deref() != Some("1") {
            assert_eq!(determine_log_level(&args), "warn");
        }
    }
}
