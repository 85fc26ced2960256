use std::{
    fmt::{self, Debug, Display, Formatter},
    sync::Arc,
};

use log::{debug, trace};
use regex::Regex;

use crate::{
    cleaner_config::CleanerConfig,
    lexicon::{ContractionExpander, Stopwords},
    stages, CleanerError,
};

/// Seam for anything that turns raw text into cleaned text.
pub trait TextCleaner: Send + Sync {
    fn clean(&self, text: &str) -> String;
}

enum ConfigInput {
    Ready(CleanerConfig),
    Source(String),
}

/// A builder for the `Cleaner` struct
/// that takes the stage toggles and lexical resources
/// before compiling the pipeline
pub struct CleanerBuilder {
    config: Option<ConfigInput>,
    stopwords: Option<Stopwords>,
    contractions: Option<Arc<dyn ContractionExpander>>,
}

impl CleanerBuilder {
    pub fn new() -> Self {
        CleanerBuilder {
            config: None,
            stopwords: None,
            contractions: None,
        }
    }

    pub fn with_config(mut self, config: CleanerConfig) -> Self {
        self.config = Some(ConfigInput::Ready(config));
        self
    }

    /// Path to a `.json`/`.toml` file, or inline config data. Parsed in `build`.
    pub fn with_config_source(mut self, source: &str) -> Self {
        self.config = Some(ConfigInput::Source(source.to_string()));
        self
    }

    pub fn with_stopwords(mut self, stopwords: Stopwords) -> Self {
        self.stopwords = Some(stopwords);
        self
    }

    pub fn with_contractions<T: ContractionExpander + 'static>(mut self, expander: T) -> Self {
        self.contractions = Some(Arc::new(expander));
        self
    }

    pub fn build(self) -> Result<Cleaner, CleanerError> {
        let config = match self.config {
            Some(ConfigInput::Ready(config)) => config,
            Some(ConfigInput::Source(source)) => CleanerConfig::from_config(&source)?,
            None => CleanerConfig::default(),
        };
        let custom_chars = stages::custom_chars_regex(&config.custom_chars)?;
        let special_chars = stages::special_chars_regex(&config.special_chars_pattern)?;
        let stopwords = self.stopwords.unwrap_or_default();

        debug!(
            "cleaner stages {:?}, {} stopwords, contraction provider: {}",
            config.enabled_stages(),
            stopwords.len(),
            self.contractions.is_some()
        );

        Ok(Cleaner {
            config: Arc::new(config),
            stopwords: Arc::new(stopwords),
            contractions: self.contractions,
            custom_chars,
            special_chars,
        })
    }
}

impl Default for CleanerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The text-normalization pipeline.
///
/// Stages run in a fixed order; each optional one is skipped outright when
/// its toggle is off. Everything is read-only after `build`, so one instance
/// can serve concurrent callers.
///
/// ```
/// use text_cleaner::{Cleaner, ContractionTable};
///
/// let cleaner = Cleaner::builder()
///     .with_contractions(ContractionTable::from_map([("won't", "would not")]))
///     .build()
///     .unwrap();
/// assert_eq!(cleaner.clean("I won't go."), "i would not go.");
/// ```
#[derive(Clone)]
pub struct Cleaner {
    config: Arc<CleanerConfig>,
    stopwords: Arc<Stopwords>,
    contractions: Option<Arc<dyn ContractionExpander>>,
    custom_chars: Option<Regex>,
    special_chars: Regex,
}

impl Debug for Cleaner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleaner")
            .field("config", &self.config)
            .field("stopwords", &self.stopwords.len())
            .field("contractions", &self.contractions.is_some())
            .finish()
    }
}

fn apply(
    text: String,
    name: &'static str,
    enabled: bool,
    stage: impl FnOnce(&str) -> String,
) -> String {
    if !enabled {
        return text;
    }
    trace!("stage {}", name);
    stage(&text)
}

impl Cleaner {
    pub fn builder() -> CleanerBuilder {
        CleanerBuilder::new()
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Cleans any displayable value; non-strings are cleaned in their
    /// `Display` form.
    pub fn clean<T: Display + ?Sized>(&self, text: &T) -> String {
        self.run(&text.to_string())
    }

    #[cfg(not(feature = "multi_thread"))]
    pub fn clean_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts.iter().map(|text| self.run(text.as_ref())).collect()
    }

    pub(crate) fn run(&self, text: &str) -> String {
        let config = &self.config;

        let text = apply(text.to_string(), "fix_contractions", config.fix_contractions, |t| {
            match &self.contractions {
                Some(expander) => stages::fix_contractions(t, expander.as_ref()),
                None => t.to_string(),
            }
        });
        let text = apply(text, "remove_custom_chars", config.remove_custom_chars, |t| {
            stages::remove_custom_chars(t, self.custom_chars.as_ref())
        });
        let text = apply(text, "remove_urls", config.remove_urls, stages::remove_urls);
        let text = apply(
            text,
            "remove_html_tags",
            config.remove_html_tags,
            stages::remove_html_tags,
        );
        let text = apply(
            text,
            "remove_diacritics",
            config.remove_diacritics,
            stages::remove_diacritics,
        );
        let text = apply(text, "remove_digits", config.remove_digits, stages::remove_digits);
        let text = apply(
            text,
            "remove_digit_blocks",
            config.remove_digit_blocks,
            stages::remove_digit_blocks,
        );
        let text = apply(text, "remove_special_chars", config.remove_special_chars, |t| {
            stages::remove_special_chars(t, &self.special_chars)
        });
        let text = apply(text, "lowercase", config.lowercase, stages::lowercase);
        let text = apply(text, "remove_stopwords", config.remove_stopwords, |t| {
            stages::remove_stopwords(t, &self.stopwords)
        });
        let text = apply(
            text,
            "remove_whitespaces",
            config.remove_whitespaces,
            stages::remove_whitespaces,
        );

        // Always on.
        let text = stages::remove_left_padded_special_chars(&text);
        let text = stages::remove_extra_whitespaces(&text);
        text.trim().to_string()
    }
}

impl TextCleaner for Cleaner {
    fn clean(&self, text: &str) -> String {
        self.run(text)
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Cleaner {
            config: Arc::new(CleanerConfig::default()),
            stopwords: Arc::new(Stopwords::default()),
            contractions: None,
            custom_chars: Some(Regex::clone(&stages::DEFAULT_CUSTOM_CHARS_RE)),
            special_chars: Regex::clone(&stages::DEFAULT_SPECIAL_CHARS_RE),
        }
    }
}
