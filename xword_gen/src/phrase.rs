use std::fmt::Display;

use itertools::Itertools;
use util::error::{XWordError, XWordResult};

/// The mandatory phrase: one or more whitespace-separated words of letters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phrase {
  segments: Vec<String>,
}

impl Phrase {
  pub fn parse(phrase: &str) -> XWordResult<Self> {
    let segments: Vec<_> = phrase.split_whitespace().map(str::to_uppercase).collect();
    if segments.is_empty() {
      return Err(XWordError::Parse("Puzzle phrase is empty".to_owned()).into());
    }
    if let Some(c) = segments.iter().flat_map(|segment| segment.chars()).find(|c| !c.is_alphabetic()) {
      return Err(XWordError::Parse(format!("Puzzle phrase contains non-letter '{c}'")).into());
    }
    Ok(Self { segments })
  }

  pub fn segments(&self) -> &[String] {
    &self.segments
  }

  /// Number of letters, not counting separators.
  pub fn len(&self) -> u32 {
    self.segments.iter().map(|segment| segment.chars().count() as u32).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
    self.segments.iter().flat_map(|segment| segment.chars())
  }
}

impl Display for Phrase {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.segments.iter().join(" "))
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;

  use super::Phrase;

  #[gtest]
  fn test_parse() {
    let phrase = Phrase::parse("  happy  birthday ").unwrap();
    expect_that!(
      phrase.segments().to_vec(),
      container_eq(["HAPPY".to_owned(), "BIRTHDAY".to_owned()])
    );
    expect_that!(phrase.len(), eq(13));
    expect_that!(phrase.to_string(), eq("HAPPY BIRTHDAY"));
    expect_that!(phrase.letters().collect::<String>(), eq("HAPPYBIRTHDAY"));
  }

  #[gtest]
  fn test_parse_rejects() {
    expect_that!(Phrase::parse(""), err(anything()));
    expect_that!(Phrase::parse("   "), err(anything()));
    expect_that!(Phrase::parse("cat-dog"), err(anything()));
  }
}
