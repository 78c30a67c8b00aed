use std::fmt::Display;

/// A fixed-length sequence of letters and wildcards, as read off a slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern {
  cells: Vec<Option<char>>,
}

impl Pattern {
  pub const WILDCARD: char = '_';

  pub fn new(cells: Vec<Option<char>>) -> Self {
    Self { cells }
  }

  /// Parses `_` and `.` as wildcards, anything else as an upper-cased letter.
  pub fn parse(pattern: &str) -> Self {
    pattern
      .chars()
      .map(|c| match c {
        Self::WILDCARD | '.' => None,
        c => c.to_uppercase().next(),
      })
      .collect()
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn cells(&self) -> &[Option<char>] {
    &self.cells
  }

  /// (index, letter) for every non-wildcard cell.
  pub fn fixed(&self) -> impl Iterator<Item = (usize, char)> + '_ {
    self
      .cells
      .iter()
      .enumerate()
      .filter_map(|(idx, cell)| cell.map(|c| (idx, c)))
  }

  pub fn is_complete(&self) -> bool {
    self.cells.iter().all(Option::is_some)
  }

  pub fn to_word(&self) -> Option<String> {
    self.cells.iter().copied().collect()
  }

  pub fn matches(&self, word: &str) -> bool {
    word.chars().count() == self.len()
      && word
        .chars()
        .zip(&self.cells)
        .all(|(letter, cell)| cell.is_none_or(|c| c == letter))
  }
}

impl FromIterator<Option<char>> for Pattern {
  fn from_iter<I: IntoIterator<Item = Option<char>>>(iter: I) -> Self {
    Self { cells: iter.into_iter().collect() }
  }
}

impl Display for Pattern {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self
      .cells
      .iter()
      .try_for_each(|cell| write!(f, "{}", cell.unwrap_or(Self::WILDCARD)))
  }
}

#[cfg(test)]
mod tests {
  use googletest::prelude::*;

  use super::Pattern;

  #[gtest]
  fn test_parse_and_display() {
    let pattern = Pattern::parse("c_t.");
    expect_that!(pattern.len(), eq(4));
    expect_that!(pattern.to_string(), eq("C_T_"));
    expect_that!(pattern.fixed().collect::<Vec<_>>(), container_eq([(0, 'C'), (2, 'T')]));
    expect_false!(pattern.is_complete());
    expect_that!(pattern.to_word(), none());
  }

  #[gtest]
  fn test_complete() {
    let pattern = Pattern::parse("OWL");
    expect_true!(pattern.is_complete());
    expect_that!(pattern.to_word(), some(eq("OWL")));
  }

  #[gtest]
  fn test_matches() {
    let pattern = Pattern::parse("C_T");
    expect_true!(pattern.matches("CAT"));
    expect_true!(pattern.matches("COT"));
    expect_false!(pattern.matches("CAR"));
    expect_false!(pattern.matches("CATS"));
    expect_true!(Pattern::parse("___").matches("DOG"));
  }
}
