use std::{
  cmp::Reverse,
  collections::{BTreeSet, HashSet},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use log::trace;
use xword_dict::Dictionary;

use crate::{
  board::{Board, SlotId},
  placement::Placement,
};

/// Shared flag telling solver runs to stop. Checked once per slot selection.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
  pub fn cancel(&self) {
    self.0.store(true, Ordering::Release);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }
}

#[derive(Debug)]
pub enum SolveOutcome {
  Success(Board),
  Failure,
  Cancelled,
}

impl SolveOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, SolveOutcome::Success(_))
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverStats {
  /// Slot selections made.
  pub states: u64,
  /// Words written and then taken back.
  pub backtracks: u64,
}

enum Step {
  Solved,
  Exhausted,
  Cancelled,
}

/// Depth-first fill of every slot the phrase doesn't occupy.
pub struct Solver<'a, D> {
  dictionary: &'a D,
  cancel: CancelFlag,
  board: Board,
  unfilled: BTreeSet<SlotId>,
  used: HashSet<String>,
  stats: SolverStats,
}

impl<'a, D> Solver<'a, D>
where
  D: Dictionary,
{
  pub fn new(dictionary: &'a D, placement: Placement, cancel: CancelFlag) -> Self {
    let Placement { slots: fixed, board } = placement;
    let used = fixed
      .iter()
      .filter_map(|&id| board.slot_word(id))
      .collect();
    let unfilled = (0..board.slots().len())
      .filter(|id| !fixed.contains(id))
      .collect();
    Self { dictionary, cancel, board, unfilled, used, stats: SolverStats::default() }
  }

  pub fn solve(mut self) -> (SolveOutcome, SolverStats) {
    let outcome = match self.search() {
      Step::Solved => SolveOutcome::Success(self.board),
      Step::Exhausted => SolveOutcome::Failure,
      Step::Cancelled => SolveOutcome::Cancelled,
    };
    (outcome, self.stats)
  }

  /// Matching words for `slot` that aren't used elsewhere on the board.
  fn candidates(&self, slot: SlotId) -> impl Iterator<Item = &'a str> + '_ {
    self
      .dictionary
      .matches(&self.board.pattern(slot))
      .filter(|word| !self.used.contains(*word))
  }

  /// The unfilled slot with the fewest candidates; ties go to the longer slot,
  /// then the earlier one in board-scan order.
  fn select_slot(&self) -> Option<(SlotId, usize)> {
    let mut best: Option<(SlotId, usize)> = None;
    for &slot in &self.unfilled {
      // Counts past the current best can't win, so stop counting there.
      let limit = best.map_or(usize::MAX, |(_, count)| count.saturating_add(1));
      let count = self.candidates(slot).take(limit).count();
      let better = best.is_none_or(|(best_slot, best_count)| {
        (count, Reverse(self.slot_length(slot))) < (best_count, Reverse(self.slot_length(best_slot)))
      });
      if better {
        best = Some((slot, count));
        if count == 0 {
          break;
        }
      }
    }
    best
  }

  fn slot_length(&self, slot: SlotId) -> u32 {
    self.board.slot(slot).map_or(0, |slot| slot.length)
  }

  /// Whether every unfilled slot crossing `slot` still has a candidate.
  fn forward_check(&self, slot: SlotId) -> bool {
    self
      .board
      .crossings(slot)
      .iter()
      .flatten()
      .filter(|crossing| self.unfilled.contains(&crossing.other))
      .all(|crossing| self.candidates(crossing.other).next().is_some())
  }

  fn search(&mut self) -> Step {
    if self.cancel.is_cancelled() {
      return Step::Cancelled;
    }
    self.stats.states += 1;

    let Some((slot, count)) = self.select_slot() else {
      return Step::Solved;
    };
    if count == 0 {
      return Step::Exhausted;
    }

    trace!("Filling slot {slot} ({} with {count} candidates)", self.board.pattern(slot));
    let words: Vec<&'a str> = self.candidates(slot).collect();
    self.unfilled.remove(&slot);

    for word in words {
      let written = self.board.write_word(slot, word);
      self.used.insert(word.to_owned());

      if self.forward_check(slot) {
        match self.search() {
          Step::Solved => return Step::Solved,
          Step::Cancelled => return Step::Cancelled,
          Step::Exhausted => {}
        }
      }

      self.used.remove(word);
      self.board.clear(&written);
      self.stats.backtracks += 1;
    }

    self.unfilled.insert(slot);
    Step::Exhausted
  }
}
