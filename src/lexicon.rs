//! Lexical resources the pipeline reads but never owns: the stopword set and
//! the contraction provider.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use crate::{cleaner_config::load_source, CleanerError, ExpansionError};

/// An immutable set of stopwords.
///
/// Matching is exact, so case sensitivity is whatever the provider put in the
/// set. The pipeline lowercases before it looks words up, so lowercase sets
/// are the norm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StopwordList {
    Words(Vec<String>),
    Table { words: Vec<String> },
}

impl Stopwords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads stopwords from a path or inline data.
    ///
    /// Accepts a JSON array, a TOML table with a `words` array, or a `.txt`
    /// file with one word per line where `#` starts a comment.
    pub fn from_source(source: &str) -> Result<Self, CleanerError> {
        if source.ends_with(".txt") && Path::new(source).exists() {
            let content = fs::read_to_string(source)?;
            return Ok(Self::from_lines(&content));
        }
        let words = match load_source::<StopwordList>(source)? {
            StopwordList::Words(words) | StopwordList::Table { words } => words,
        };
        Ok(words.into_iter().collect())
    }

    fn from_lines(content: &str) -> Self {
        content
            .lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|word| !word.is_empty())
            .collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Stopwords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Stopwords {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Anything that can expand contractions in a piece of text.
///
/// Invoked once per `clean` call with the whole input. An `Err` makes the
/// cleaner continue on an empty string.
pub trait ContractionExpander: Send + Sync {
    fn expand(&self, text: &str) -> Result<String, ExpansionError>;
}

impl<F> ContractionExpander for F
where
    F: Fn(&str) -> Result<String, ExpansionError> + Send + Sync,
{
    fn expand(&self, text: &str) -> Result<String, ExpansionError> {
        self(text)
    }
}

static CONTRACTION_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w'’]+").unwrap());

/// Table-driven contraction expander.
///
/// The table itself comes from the caller (a dictionary file or an in-memory
/// map); keys are matched case-insensitively against word tokens that carry
/// an apostrophe, and the token's casing is carried onto the expansion.
#[derive(Debug, Clone, Default)]
pub struct ContractionTable {
    entries: HashMap<String, String>,
}

impl ContractionTable {
    pub fn from_map<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        ContractionTable {
            entries: entries
                .into_iter()
                .map(|(k, v)| (normalize_key(k.as_ref()), v.into()))
                .collect(),
        }
    }

    /// Loads a `{"contraction": "expansion"}` table from a path or inline data.
    pub fn from_source(source: &str) -> Result<Self, CleanerError> {
        let entries: HashMap<String, String> = load_source(source)?;
        Ok(Self::from_map(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks `token` up as is, then with surrounding quote marks peeled off.
    /// Peeled quotes are put back around the expansion.
    fn lookup(&self, token: &str) -> Option<String> {
        let lead = token.len() - token.trim_start_matches(is_apostrophe).len();
        let trail = token.len() - token.trim_end_matches(is_apostrophe).len();
        if lead + trail >= token.len() {
            return None;
        }
        [(0, 0), (lead, 0), (0, trail), (lead, trail)]
            .into_iter()
            .find_map(|(start, end)| {
                let core = &token[start..token.len() - end];
                self.lookup_exact(core).map(|expansion| {
                    format!("{}{}{}", &token[..start], expansion, &token[token.len() - end..])
                })
            })
    }

    fn lookup_exact(&self, token: &str) -> Option<String> {
        if !token.contains(is_apostrophe) {
            return None;
        }
        self.entries
            .get(&normalize_key(token))
            .map(|expansion| match_case(token, expansion))
    }
}

impl ContractionExpander for ContractionTable {
    fn expand(&self, text: &str) -> Result<String, ExpansionError> {
        Ok(CONTRACTION_TOKEN_RE
            .replace_all(text, |caps: &regex::Captures| {
                let token = &caps[0];
                self.lookup(token).unwrap_or_else(|| token.to_string())
            })
            .into_owned())
    }
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '’'
}

fn normalize_key(key: &str) -> String {
    key.replace('’', "'").to_lowercase()
}

fn match_case(token: &str, expansion: &str) -> String {
    let letters: Vec<char> = token.chars().filter(|c| c.is_alphabetic()).collect();
    let all_upper = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());
    let first_upper = letters.first().map_or(false, |c| c.is_uppercase());

    if all_upper {
        expansion.to_uppercase()
    } else if first_upper {
        let mut chars = expansion.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        expansion.to_string()
    }
}
