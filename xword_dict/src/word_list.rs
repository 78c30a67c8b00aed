use std::slice;

use itertools::Itertools;

use crate::{canonicalize_word, Dictionary, Pattern, MIN_WORD_LENGTH};

/// Unindexed dictionary answering every query with a full scan. Serves as the
/// reference the indexed [`crate::WordIndex`] is checked against.
#[derive(Clone, Debug)]
pub struct WordList {
  words: Vec<String>,
  max_word_length: u32,
}

impl WordList {
  pub fn from_words<S>(words: impl IntoIterator<Item = S>, max_word_length: u32) -> Self
  where
    S: AsRef<str>,
  {
    let words = words
      .into_iter()
      .filter_map(|word| canonicalize_word(word.as_ref()))
      .filter(|word| {
        (MIN_WORD_LENGTH..=max_word_length).contains(&(word.chars().count() as u32))
      })
      .unique()
      .collect();
    Self { words, max_word_length }
  }
}

impl Dictionary for WordList {
  type Matches<'a> = ScanMatches<'a>;

  fn matches(&self, pattern: &Pattern) -> ScanMatches<'_> {
    ScanMatches { words: self.words.iter(), pattern: pattern.clone() }
  }

  fn contains(&self, word: &str) -> bool {
    self.words.iter().any(|w| w == word)
  }

  fn max_word_length(&self) -> u32 {
    self.max_word_length
  }

  fn len(&self) -> usize {
    self.words.len()
  }
}

pub struct ScanMatches<'a> {
  words: slice::Iter<'a, String>,
  pattern: Pattern,
}

impl<'a> Iterator for ScanMatches<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<&'a str> {
    let pattern = &self.pattern;
    self
      .words
      .find(|word| pattern.matches(word))
      .map(String::as_str)
  }
}
