#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod pattern;
mod word_list;
mod xword_dict;

use once_cell::sync::Lazy;
use regex::Regex;

pub use pattern::Pattern;
pub use word_list::{ScanMatches, WordList};
pub use xword_dict::{PatternMatches, WordIndex};

/// Words shorter than this never fill a slot.
pub const MIN_WORD_LENGTH: u32 = 2;

/// A word list line: a single alphabetic word, optionally followed by a
/// numeric score column (`word;50`, `word,50` or `word<TAB>50`).
#[allow(clippy::expect_used)]
static WORD_LINE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^\s*(\p{Alphabetic}+)\s*(?:[;,\t]\s*-?\d+(?:\.\d+)?\s*)?$")
    .expect("word line regex is valid")
});

/// Extracts the canonical (upper-cased) word from a word list line, or `None`
/// if the line doesn't hold a usable word.
pub fn canonicalize_word(line: &str) -> Option<String> {
  WORD_LINE
    .captures(line)
    .and_then(|captures| captures.get(1))
    .map(|word| word.as_str().to_uppercase())
}

/// Read-only word source the solver fills slots from.
pub trait Dictionary {
  type Matches<'a>: Iterator<Item = &'a str>
  where
    Self: 'a;

  /// Every word of `pattern.len()` letters agreeing with all of the pattern's
  /// fixed letters, in a deterministic order.
  fn matches(&self, pattern: &Pattern) -> Self::Matches<'_>;

  fn count_matches(&self, pattern: &Pattern) -> usize {
    self.matches(pattern).count()
  }

  fn contains(&self, word: &str) -> bool;

  fn max_word_length(&self) -> u32;

  fn len(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
