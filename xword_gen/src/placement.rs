use itertools::Itertools;
use log::trace;
use util::pos::Diff;
use xword_dict::Dictionary;

use crate::{
  board::{Board, Slot, SlotId},
  phrase::Phrase,
};

/// A board with the phrase written into `slots`, everything else untouched.
#[derive(Clone, Debug)]
pub struct Placement {
  pub slots: Vec<SlotId>,
  pub board: Board,
}

/// Lazily yields every placement of a phrase on a board.
///
/// A phrase goes into a chain of slots along one row or column, each slot
/// starting two tiles past the end of the previous one (one wall apart). A
/// phrase of several words needs one slot per word with matching lengths; a
/// single word may also run across a chain whose total length equals its
/// length. A single slot of the right length is the common case. Every slot
/// the phrase covers must still spell a dictionary word.
pub struct PlacementEnumerator<'a, D> {
  board: &'a Board,
  phrase: &'a Phrase,
  dictionary: &'a D,
  next_slot: SlotId,
}

impl<'a, D> PlacementEnumerator<'a, D>
where
  D: Dictionary,
{
  pub fn new(board: &'a Board, phrase: &'a Phrase, dictionary: &'a D) -> Self {
    Self { board, phrase, dictionary, next_slot: 0 }
  }

  fn next_in_line(&self, slot: &Slot) -> Option<&'a Slot> {
    self
      .board
      .slot_at(slot.end() + Diff::step(slot.is_row) * 2, slot.is_row)
  }

  /// The chain starting at `start` that fits the phrase, if there is one.
  fn chain_from(&self, start: &'a Slot) -> Option<Vec<&'a Slot>> {
    let segments = self.phrase.segments();
    if segments.len() > 1 {
      let mut chain = vec![start];
      for _ in 1..segments.len() {
        chain.push(self.next_in_line(chain.last().copied()?)?);
      }
      return chain
        .iter()
        .zip(segments)
        .all(|(slot, segment)| slot.length as usize == segment.chars().count())
        .then_some(chain);
    }

    let total = self.phrase.len();
    let mut chain = vec![start];
    let mut length = start.length;
    while length < total {
      let next = self.next_in_line(chain.last().copied()?)?;
      length += next.length;
      chain.push(next);
    }
    (length == total).then_some(chain)
  }

  /// Writes the phrase across `chain`, or `None` if a pre-filled letter
  /// disagrees with it or a slot's share of the phrase isn't a word.
  fn place(&self, chain: &[&Slot]) -> Option<Board> {
    let mut board = self.board.clone();
    let mut letters = self.phrase.letters();
    for slot in chain {
      let word: String = letters.by_ref().take(slot.length as usize).collect();
      if !board.pattern(slot.id).matches(&word) || !self.dictionary.contains(&word) {
        return None;
      }
      board.write_word(slot.id, &word);
    }
    Some(board)
  }
}

impl<D> Iterator for PlacementEnumerator<'_, D>
where
  D: Dictionary,
{
  type Item = Placement;

  fn next(&mut self) -> Option<Placement> {
    while let Some(start) = self.board.slot(self.next_slot) {
      self.next_slot += 1;
      let Some(chain) = self.chain_from(start) else {
        continue;
      };
      if let Some(board) = self.place(&chain) {
        let slots = chain.iter().map(|slot| slot.id).collect_vec();
        trace!("Placing \"{}\" in slots {slots:?}", self.phrase);
        return Some(Placement { slots, board });
      }
    }
    None
  }
}
