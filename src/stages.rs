//! The individual transformations a [`Cleaner`](crate::Cleaner) chains together.
//!
//! Every function here is total: any `&str`, including the empty string, maps
//! to a `String` without panicking.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{char::canonical_combining_class, UnicodeNormalization};

use crate::{
    cleaner_config::{DEFAULT_CUSTOM_CHARS, DEFAULT_SPECIAL_CHARS_PATTERN},
    lexicon::{ContractionExpander, Stopwords},
    CleanerError,
};

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+").unwrap());

static HTML_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>|&(?i:[a-z0-9]+|#[0-9]{1,6}|#x[0-9a-f]{1,6});").unwrap()
});

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static DIGIT_BLOCKS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").unwrap());

// Words with internal hyphens, whitespace runs, single symbols.
static STOPWORD_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r##"\w+(?:-\w+)*|\s+|[\[\]!"#$%&'*+,\-./:;<=>?@\\^():_`{|}~]"##).unwrap()
});

static LEFT_PADDED_SPECIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ ]+[^\p{L}\p{N}\s]+").unwrap());

static EXTRA_SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());

pub(crate) static DEFAULT_SPECIAL_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_SPECIAL_CHARS_PATTERN).unwrap());

pub(crate) static DEFAULT_CUSTOM_CHARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(?i)(?:{})", DEFAULT_CUSTOM_CHARS.join("|"))).unwrap()
});

/// Joins the custom fragments into one case-insensitive alternation.
///
/// Returns `Ok(None)` for an empty list, which makes the stage a no-op.
pub fn custom_chars_regex(fragments: &[String]) -> Result<Option<Regex>, CleanerError> {
    if fragments.is_empty() {
        return Ok(None);
    }
    let pattern = format!("(?i)(?:{})", fragments.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|source| CleanerError::InvalidPattern { pattern, source })
}

pub fn special_chars_regex(pattern: &str) -> Result<Regex, CleanerError> {
    Regex::new(pattern).map_err(|source| CleanerError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Expands contractions ("won't" -> "would not").
///
/// A provider failure yields an empty string: nothing of the unexpandable
/// text reaches the later stages.
pub fn fix_contractions(text: &str, expander: &dyn ContractionExpander) -> String {
    match expander.expand(text) {
        Ok(expanded) => expanded,
        Err(err) => {
            warn!("contraction expansion failed, dropping text: {}", err);
            String::new()
        }
    }
}

pub fn remove_custom_chars(text: &str, pattern: Option<&Regex>) -> String {
    match pattern {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Replaces anything starting with `http` up to the next whitespace.
pub fn remove_urls(text: &str) -> String {
    URL_RE.replace_all(text, " ").into_owned()
}

/// Replaces `<...>` tags and `&name;` / `&#123;` / `&#x1f;` entities with a space.
pub fn remove_html_tags(text: &str) -> String {
    HTML_RE.replace_all(text, " ").into_owned()
}

/// NFKD-decomposes and drops combining marks, so "café" becomes "cafe".
pub fn remove_diacritics(text: &str) -> String {
    text.nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect()
}

/// "7th Street" becomes " th Street".
pub fn remove_digits(text: &str) -> String {
    DIGITS_RE.replace_all(text, " ").into_owned()
}

/// Only whole-token digit runs: "Transferred 60 files" loses the "60",
/// "7th" is kept.
pub fn remove_digit_blocks(text: &str) -> String {
    DIGIT_BLOCKS_RE.replace_all(text, " ").into_owned()
}

pub fn remove_special_chars(text: &str, pattern: &Regex) -> String {
    pattern.replace_all(text, " ").into_owned()
}

pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Swaps every token that is a member of `stopwords` for a single space.
///
/// Tokens are words (with internal hyphens), whitespace runs and single
/// symbols. Anything between tokens is copied through untouched.
pub fn remove_stopwords(text: &str, stopwords: &Stopwords) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for token in STOPWORD_TOKEN_RE.find_iter(text) {
        out.push_str(&text[last..token.start()]);
        if stopwords.contains(token.as_str()) {
            out.push(' ');
        } else {
            out.push_str(token.as_str());
        }
        last = token.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Collapses tabs, newlines and every Unicode space (NBSP included) to
/// single ASCII spaces and trims the ends.
pub fn remove_whitespaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drops symbols orphaned behind a space: "apples , oranges, mangoes"
/// becomes "apples  oranges, mangoes".
pub fn remove_left_padded_special_chars(text: &str) -> String {
    LEFT_PADDED_SPECIAL_RE.replace_all(text, " ").into_owned()
}

pub fn remove_extra_whitespaces(text: &str) -> String {
    EXTRA_SPACES_RE.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExpansionError;

    #[test]
    fn custom_chars_are_case_insensitive() {
        let re = custom_chars_regex(&["_x000d_".to_string(), r"\xa0".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(
            remove_custom_chars("line_X000D_break\u{a0}here", Some(&re)),
            "linebreakhere"
        );
    }

    #[test]
    fn empty_custom_list_is_a_no_op() {
        assert!(custom_chars_regex(&[]).unwrap().is_none());
        assert_eq!(remove_custom_chars("keep me", None), "keep me");
    }

    #[test]
    fn bad_fragment_is_reported() {
        let err = custom_chars_regex(&["(".to_string()]).unwrap_err();
        assert!(matches!(err, CleanerError::InvalidPattern { .. }));
    }

    #[test]
    fn urls_become_spaces() {
        assert_eq!(remove_urls("see https://example.com/a?b=c now"), "see   now");
        assert_eq!(remove_urls("plain http"), "plain http");
    }

    #[test]
    fn tags_and_entities_become_spaces() {
        assert_eq!(remove_html_tags("<b>Hi</b>&nbsp;there"), " Hi  there");
        assert_eq!(remove_html_tags("a&#123;b&#x1F;c&AMP;d"), "a b c d");
        assert_eq!(remove_html_tags("fish & chips; ok"), "fish & chips; ok");
    }

    #[test]
    fn diacritics_map_to_base_letters() {
        assert_eq!(
            remove_diacritics("Crème brûlée à São Paulo"),
            "Creme brulee a Sao Paulo"
        );
        assert_eq!(remove_diacritics(""), "");
    }

    #[test]
    fn digits_inside_words_are_removed() {
        assert_eq!(remove_digits("7th Street"), " th Street");
    }

    #[test]
    fn digit_blocks_keep_embedded_digits() {
        assert_eq!(remove_digit_blocks("Transferred 60 files"), "Transferred   files");
        assert_eq!(remove_digit_blocks("7th Street"), "7th Street");
    }

    #[test]
    fn special_chars_collapse_to_one_space() {
        let re = special_chars_regex(crate::DEFAULT_SPECIAL_CHARS_PATTERN).unwrap();
        assert_eq!(
            remove_special_chars("a*&^b c.d,e?f_g@h\ni", &re),
            "a b c.d,e?f_g@h\ni"
        );
    }

    #[test]
    fn stopwords_are_replaced_not_deleted() {
        let stopwords: Stopwords = ["the", "is"].into_iter().collect();
        assert_eq!(
            remove_stopwords("the state-of-the-art is here, the end.", &stopwords),
            "  state-of-the-art   here,   end."
        );
    }

    #[test]
    fn stopword_match_is_exact() {
        let stopwords: Stopwords = ["the"].into_iter().collect();
        assert_eq!(remove_stopwords("The theme", &stopwords), "The theme");
    }

    #[test]
    fn stopwords_keep_uncovered_characters() {
        let stopwords: Stopwords = ["a"].into_iter().collect();
        assert_eq!(remove_stopwords("a £5 fee", &stopwords), "  £5 fee");
    }

    #[test]
    fn whitespace_includes_nbsp() {
        assert_eq!(remove_whitespaces(" a\u{a0}\tb\n\nc  "), "a b c");
        assert_eq!(remove_whitespaces(" \t\n"), "");
    }

    #[test]
    fn left_padded_specials_are_dropped() {
        assert_eq!(
            remove_left_padded_special_chars("apples , oranges, mangoes"),
            "apples  oranges, mangoes"
        );
        assert_eq!(remove_left_padded_special_chars("a .. b"), "a  b");
        assert_eq!(remove_left_padded_special_chars("a café"), "a café");
    }

    #[test]
    fn extra_spaces_collapse() {
        assert_eq!(remove_extra_whitespaces("a   b  c"), "a b c");
    }

    #[test]
    fn failed_expansion_empties_text() {
        let failing = |_: &str| -> Result<String, ExpansionError> {
            Err(ExpansionError::Malformed("bad".into()))
        };
        assert_eq!(fix_contractions("I won't", &failing), "");
    }
}
