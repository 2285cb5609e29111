//! Line-oriented `key = value` parsing shared by the settings file and the
//! file-backed preference storage.

/// What: Check if a line should be skipped (empty or comment).
///
/// Inputs:
/// - `line`: Line to check
///
/// Output:
/// - `true` if the line should be skipped, `false` otherwise
///
/// Details:
/// - Skips empty lines and lines starting with `#`, `//`, or `;`
#[must_use]
pub fn skip_comment_or_empty(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with(';')
}

/// What: Parse a key-value pair from a line.
///
/// Inputs:
/// - `line`: Line containing key=value format
///
/// Output:
/// - `Some((key, value))` if parsing succeeds, `None` otherwise
///
/// Details:
/// - Splits on the first `=` character
/// - Trims whitespace from both key and value
#[must_use]
pub fn parse_key_value(line: &str) -> Option<(String, String)> {
    let (key, value) = line.trim().split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// What: Normalize a configuration key for lookups.
///
/// Inputs:
/// - `key`: Raw key as written in the file
///
/// Output:
/// - Lowercase key with `.`, `-` and spaces folded to `_`
///
/// Details:
/// - `Default-Language`, `default.language` and `default_language` all match.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(['.', '-', ' '], "_")
}

/// What: Split a comma or whitespace separated list value.
///
/// Inputs:
/// - `value`: Raw value such as `es, en de`
///
/// Output:
/// - Non-empty trimmed items in their original order
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        assert!(skip_comment_or_empty(""));
        assert!(skip_comment_or_empty("   "));
        assert!(skip_comment_or_empty("# comment"));
        assert!(skip_comment_or_empty("// comment"));
        assert!(skip_comment_or_empty("; comment"));
        assert!(!skip_comment_or_empty("key = value"));
    }

    #[test]
    fn parses_key_value_on_first_equals() {
        assert_eq!(
            parse_key_value(" storage_key = a=b "),
            Some(("storage_key".to_string(), "a=b".to_string()))
        );
        assert_eq!(
            parse_key_value("empty ="),
            Some(("empty".to_string(), String::new()))
        );
        assert_eq!(parse_key_value("no separator"), None);
        assert_eq!(parse_key_value("= value"), None);
    }

    #[test]
    fn normalizes_key_variants() {
        assert_eq!(normalize_key("Default-Language"), "default_language");
        assert_eq!(normalize_key("default.language"), "default_language");
        assert_eq!(normalize_key(" default language "), "default_language");
    }

    #[test]
    fn splits_mixed_separators() {
        assert_eq!(split_list("es, en de,,fr"), vec!["es", "en", "de", "fr"]);
        assert!(split_list(" , ").is_empty());
    }
}
