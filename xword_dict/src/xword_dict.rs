use std::{collections::HashMap, fs, iter::Copied, ops::Range, path::Path, slice};

use itertools::Itertools;
use log::debug;
use util::{
  error::{XWordError, XWordResult},
  variant::Variant2,
};

use crate::{canonicalize_word, Dictionary, Pattern, MIN_WORD_LENGTH};

/// All indexed words of a single length.
#[derive(Debug, Default)]
struct LengthBucket {
  words: Vec<String>,
  letters: Vec<Vec<char>>,
  /// (index, letter) -> ascending ids of the words with `letter` at `index`.
  postings: HashMap<(u32, char), Vec<u32>>,
}

impl LengthBucket {
  fn from_sorted_words(words: Vec<String>) -> Self {
    let letters: Vec<Vec<char>> = words.iter().map(|word| word.chars().collect()).collect();
    let postings = letters.iter().enumerate().fold(
      HashMap::<_, Vec<_>>::new(),
      |mut postings, (id, letters)| {
        for (idx, &letter) in letters.iter().enumerate() {
          postings.entry((idx as u32, letter)).or_default().push(id as u32);
        }
        postings
      },
    );
    Self { words, letters, postings }
  }

  fn posting(&self, idx: usize, letter: char) -> &[u32] {
    self
      .postings
      .get(&(idx as u32, letter))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }
}

/// A dictionary bucketed by word length, with each bucket indexed by
/// `(position, letter)` so pattern queries only touch words that already
/// agree with one of the pattern's fixed letters.
#[derive(Debug)]
pub struct WordIndex {
  buckets: HashMap<u32, LengthBucket>,
  max_word_length: u32,
  len: usize,
}

impl WordIndex {
  pub fn load<S>(lines: impl IntoIterator<Item = S>, max_word_length: u32) -> XWordResult<Self>
  where
    S: AsRef<str>,
  {
    let mut skipped = 0usize;
    let by_length = lines
      .into_iter()
      .filter_map(|line| {
        let word = canonicalize_word(line.as_ref());
        if word.is_none() && !line.as_ref().trim().is_empty() {
          skipped += 1;
        }
        word
      })
      .map(|word| (word.chars().count() as u32, word))
      .filter(|&(len, _)| (MIN_WORD_LENGTH..=max_word_length).contains(&len))
      .into_group_map();

    let buckets: HashMap<_, _> = by_length
      .into_iter()
      .map(|(len, words)| {
        let words = words.into_iter().sorted().dedup().collect();
        (len, LengthBucket::from_sorted_words(words))
      })
      .collect();

    let len = buckets.values().map(|bucket| bucket.words.len()).sum();
    if len == 0 {
      return Err(
        XWordError::DictionaryLoad(format!(
          "No usable words of length {MIN_WORD_LENGTH}..={max_word_length}"
        ))
        .into(),
      );
    }
    debug!(
      "Indexed {len} words in {} length buckets ({skipped} malformed lines skipped)",
      buckets.len()
    );

    Ok(Self { buckets, max_word_length, len })
  }

  pub fn open(path: impl AsRef<Path>, max_word_length: u32) -> XWordResult<Self> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|err| {
      XWordError::DictionaryLoad(format!("Failed to read {}: {err}", path.display()))
    })?;
    Self::load(contents.lines(), max_word_length)
  }

  pub fn words_with_length(&self, word_length: u32) -> impl Iterator<Item = &str> {
    self
      .buckets
      .get(&word_length)
      .into_iter()
      .flat_map(|bucket| bucket.words.iter().map(String::as_str))
  }
}

impl Dictionary for WordIndex {
  type Matches<'a> = PatternMatches<'a>;

  fn matches(&self, pattern: &Pattern) -> PatternMatches<'_> {
    let Some(bucket) = self.buckets.get(&(pattern.len() as u32)) else {
      return PatternMatches::empty();
    };

    let fixed: Vec<_> = pattern.fixed().collect();
    let ids = match fixed
      .iter()
      .map(|&(idx, letter)| bucket.posting(idx, letter))
      .min_by_key(|posting| posting.len())
    {
      Some(posting) => Variant2::Opt2(posting.iter().copied()),
      None => Variant2::Opt1(0..bucket.words.len() as u32),
    };

    PatternMatches { bucket: Some(bucket), ids, fixed }
  }

  fn contains(&self, word: &str) -> bool {
    self
      .buckets
      .get(&(word.chars().count() as u32))
      .is_some_and(|bucket| bucket.words.binary_search_by(|w| w.as_str().cmp(word)).is_ok())
  }

  fn max_word_length(&self) -> u32 {
    self.max_word_length
  }

  fn len(&self) -> usize {
    self.len
  }
}

/// Lazy result of a [`WordIndex`] pattern query. A clone taken before iterating
/// (or a fresh query) replays the same sequence.
#[derive(Clone)]
pub struct PatternMatches<'a> {
  bucket: Option<&'a LengthBucket>,
  ids: Variant2<Range<u32>, Copied<slice::Iter<'a, u32>>>,
  fixed: Vec<(usize, char)>,
}

impl PatternMatches<'_> {
  fn empty() -> Self {
    Self { bucket: None, ids: Variant2::Opt1(0..0), fixed: Vec::new() }
  }
}

impl<'a> Iterator for PatternMatches<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<&'a str> {
    let bucket = self.bucket?;
    self.ids.find_map(|id| {
      let letters = &bucket.letters[id as usize];
      self
        .fixed
        .iter()
        .all(|&(idx, letter)| letters[idx] == letter)
        .then(|| bucket.words[id as usize].as_str())
    })
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (0, self.ids.size_hint().1)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use itertools::Itertools;

  use crate::{Dictionary, Pattern, WordList};

  use super::WordIndex;

  const WORDS: [&str; 14] = [
    "cat", "car", "cot", "dog", "cod", "act", "tig", "a", "caterpillar", "coda", "acts", "dogs",
    "cat", "n0pe",
  ];

  fn index() -> WordIndex {
    WordIndex::load(WORDS, 4).unwrap()
  }

  fn matches(index: &impl Dictionary, pattern: &str) -> Vec<String> {
    index
      .matches(&Pattern::parse(pattern))
      .map(str::to_owned)
      .collect()
  }

  #[gtest]
  fn test_load_filters_and_dedups() {
    let index = index();
    // "a" is too short, "caterpillar" too long, "n0pe" malformed, "cat" repeated.
    expect_that!(index.len(), eq(10));
    expect_that!(index.max_word_length(), eq(4));
    expect_true!(index.contains("CAT"));
    expect_false!(index.contains("A"));
    expect_false!(index.contains("CATERPILLAR"));
    expect_that!(
      index.words_with_length(4).map(str::to_owned).collect_vec(),
      container_eq(["ACTS".to_owned(), "CODA".to_owned(), "DOGS".to_owned()])
    );
  }

  #[gtest]
  fn test_load_empty_fails() {
    expect_that!(WordIndex::load(["a", "b", "toolong"], 3), err(anything()));
    expect_that!(WordIndex::load(Vec::<String>::new(), 3), err(anything()));
  }

  #[gtest]
  fn test_open_missing_file() {
    expect_that!(WordIndex::open("./definitely/not/a/dictionary.txt", 5), err(anything()));
  }

  #[gtest]
  fn test_query_fixed_letters() {
    let index = index();
    expect_that!(
      matches(&index, "C_T"),
      container_eq(["CAT".to_owned(), "COT".to_owned()])
    );
    expect_that!(
      matches(&index, "C__"),
      container_eq(["CAR".to_owned(), "CAT".to_owned(), "COD".to_owned(), "COT".to_owned()])
    );
    expect_that!(matches(&index, "___").len(), eq(7));
    expect_that!(matches(&index, "DOG"), container_eq(["DOG".to_owned()]));
    expect_that!(matches(&index, "Z__"), container_eq(Vec::<String>::new()));
    expect_that!(matches(&index, "_____"), container_eq(Vec::<String>::new()));
  }

  #[gtest]
  fn test_query_is_restartable() {
    let index = index();
    let pattern = Pattern::parse("_O_");
    let query = index.matches(&pattern);
    let first: Vec<_> = query.clone().collect();
    let second: Vec<_> = query.collect();
    expect_that!(first, container_eq(second));
    expect_that!(index.count_matches(&pattern), eq(3));
  }

  #[gtest]
  fn test_query_agrees_with_brute_force() {
    let index = index();
    let oracle = WordList::from_words(WORDS, 4);
    let letters = ['A', 'C', 'D', 'G', 'O', 'S', 'T', '_'];
    for len in 2..=4 {
      for pattern in (0..len)
        .map(|_| letters.iter().copied())
        .multi_cartesian_product()
        .map(|cells| cells.into_iter().collect::<String>())
      {
        let mut expected = matches(&oracle, &pattern);
        expected.sort();
        let actual = matches(&index, &pattern);
        expect_that!(actual, container_eq(expected));
      }
    }
  }
}
