mod cleaner;
mod cleaner_config;
#[cfg(feature = "multi_thread")]
mod cleaner_mt;
mod error;
mod lexicon;
pub mod stages;

pub use cleaner::{Cleaner, CleanerBuilder, TextCleaner};
pub use cleaner_config::{CleanerConfig, DEFAULT_CUSTOM_CHARS, DEFAULT_SPECIAL_CHARS_PATTERN};
pub use error::{CleanerError, ExpansionError};
pub use lexicon::{ContractionExpander, ContractionTable, Stopwords};
