//! Free-text matching

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// How the free-text query is matched against cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMatch {
    /// Case-insensitive substring match.
    #[default]
    Substring,
    /// Fuzzy match using nucleo-matcher (characters in order, gaps allowed).
    Fuzzy,
}

/// Matches one query against many haystacks.
///
/// Built once per evaluation so the fuzzy pattern and its scratch buffers are
/// reused across records.
pub(crate) struct TextMatcher {
    needle: String,
    fuzzy: Option<(Pattern, Matcher)>,
    buf: Vec<char>,
}

impl TextMatcher {
    pub(crate) fn new(needle: &str, mode: TextMatch) -> Self {
        let fuzzy = match mode {
            TextMatch::Substring => None,
            TextMatch::Fuzzy => Some((
                Pattern::new(
                    needle,
                    CaseMatching::Ignore,
                    Normalization::Smart,
                    AtomKind::Fuzzy,
                ),
                Matcher::new(Config::DEFAULT),
            )),
        };
        Self {
            needle: needle.to_lowercase(),
            fuzzy,
            buf: Vec::new(),
        }
    }

    pub(crate) fn is_match(&mut self, haystack: &str) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        match &mut self.fuzzy {
            None => haystack.to_lowercase().contains(&self.needle),
            Some((pattern, matcher)) => {
                let haystack = Utf32Str::new(haystack, &mut self.buf);
                pattern.score(haystack, matcher).is_some()
            }
        }
    }
}
