use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fmt::Display, fs, path::Path};

use crate::CleanerError;

pub const DEFAULT_SPECIAL_CHARS_PATTERN: &str = "[^A-Za-z0-9.,?_@\n]+";

/// Excel carriage-return artifact and the non-breaking space.
pub const DEFAULT_CUSTOM_CHARS: [&str; 2] = ["_x000d_", r"\xa0"];

/// Reads `source` as a file when such a path exists, otherwise parses it
/// as inline JSON (or TOML with the `toml_config` feature).
pub(crate) fn load_source<T: DeserializeOwned>(source: &str) -> Result<T, CleanerError> {
    if Path::new(source).exists() {
        let content = fs::read_to_string(source)?;
        if source.ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else if source.ends_with(".toml") {
            #[cfg(feature = "toml_config")]
            {
                Ok(toml::from_str(&content)?)
            }
            #[cfg(not(feature = "toml_config"))]
            {
                Err(CleanerError::TomlNotEnabled)
            }
        } else {
            Err(CleanerError::UnsupportedFormat)
        }
    } else {
        match serde_json::from_str(source) {
            Ok(parsed) => Ok(parsed),
            #[cfg(feature = "toml_config")]
            Err(_) => Ok(toml::from_str(source)?),
            #[cfg(not(feature = "toml_config"))]
            Err(err) => Err(err.into()),
        }
    }
}

/// Stage toggles and the two pattern resources of a [`Cleaner`](crate::Cleaner).
///
/// Missing fields take their default when deserialized, so a config file only
/// needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub remove_custom_chars: bool,
    pub remove_urls: bool,
    pub remove_html_tags: bool,
    pub remove_diacritics: bool,
    pub remove_digits: bool,
    pub remove_digit_blocks: bool,
    pub fix_contractions: bool,
    pub remove_special_chars: bool,
    pub remove_stopwords: bool,
    pub remove_whitespaces: bool,
    pub lowercase: bool,
    /// Literal substrings or regex fragments, stripped case-insensitively.
    pub custom_chars: Vec<String>,
    /// Runs matching this pattern are replaced with a single space.
    pub special_chars_pattern: String,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        CleanerConfig {
            remove_custom_chars: false,
            remove_urls: true,
            remove_html_tags: true,
            remove_diacritics: true,
            remove_digits: false,
            remove_digit_blocks: false,
            fix_contractions: true,
            remove_special_chars: true,
            remove_stopwords: false,
            remove_whitespaces: true,
            lowercase: true,
            custom_chars: DEFAULT_CUSTOM_CHARS.iter().map(|s| s.to_string()).collect(),
            special_chars_pattern: DEFAULT_SPECIAL_CHARS_PATTERN.to_string(),
        }
    }
}

impl CleanerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a config from a `.json`/`.toml` path or from inline data.
    pub fn from_config(config: &str) -> Result<CleanerConfig, CleanerError> {
        load_source(config)
    }

    /// Names of the optional stages that will run, in pipeline order.
    pub fn enabled_stages(&self) -> Vec<&'static str> {
        [
            ("fix_contractions", self.fix_contractions),
            ("remove_custom_chars", self.remove_custom_chars),
            ("remove_urls", self.remove_urls),
            ("remove_html_tags", self.remove_html_tags),
            ("remove_diacritics", self.remove_diacritics),
            ("remove_digits", self.remove_digits),
            ("remove_digit_blocks", self.remove_digit_blocks),
            ("remove_special_chars", self.remove_special_chars),
            ("lowercase", self.lowercase),
            ("remove_stopwords", self.remove_stopwords),
            ("remove_whitespaces", self.remove_whitespaces),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

impl Display for CleanerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_typical_cleanup() {
        let config = CleanerConfig::default();
        assert!(config.remove_urls && config.remove_html_tags && config.lowercase);
        assert!(!config.remove_digits && !config.remove_digit_blocks);
        assert!(!config.remove_stopwords && !config.remove_custom_chars);
        assert_eq!(config.special_chars_pattern, "[^A-Za-z0-9.,?_@\n]+");
        assert_eq!(config.custom_chars, vec!["_x000d_", r"\xa0"]);
    }

    #[test]
    fn inline_json_overrides_only_listed_fields() {
        let config =
            CleanerConfig::from_config(r#"{"remove_digits": true, "lowercase": false}"#).unwrap();
        assert!(config.remove_digits);
        assert!(!config.lowercase);
        assert!(config.remove_urls);
    }

    #[test]
    fn reads_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"remove_stopwords": true}}"#).unwrap();
        let config = CleanerConfig::from_config(file.path().to_str().unwrap()).unwrap();
        assert!(config.remove_stopwords);
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = CleanerConfig::from_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CleanerError::UnsupportedFormat));
    }

    #[cfg(not(feature = "toml_config"))]
    #[test]
    fn toml_file_needs_feature() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = CleanerConfig::from_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CleanerError::TomlNotEnabled));
    }

    #[cfg(feature = "toml_config")]
    #[test]
    fn inline_toml_is_accepted() {
        let config = CleanerConfig::from_config("remove_digit_blocks = true").unwrap();
        assert!(config.remove_digit_blocks);
    }

    #[test]
    fn enabled_stages_follow_pipeline_order() {
        let config = CleanerConfig {
            remove_stopwords: true,
            ..CleanerConfig::default()
        };
        assert_eq!(
            config.enabled_stages(),
            vec![
                "fix_contractions",
                "remove_urls",
                "remove_html_tags",
                "remove_diacritics",
                "remove_special_chars",
                "lowercase",
                "remove_stopwords",
                "remove_whitespaces",
            ]
        );
    }

    #[test]
    fn display_round_trips_through_json() {
        let config = CleanerConfig::default();
        let parsed = CleanerConfig::from_config(&config.to_string()).unwrap();
        assert_eq!(parsed, config);
    }
}
