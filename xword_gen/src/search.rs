use std::{num::NonZeroUsize, sync::Arc, thread, time::Duration};

use log::{debug, info};
use tokio::task::JoinSet;
use util::{
  error::{XWordError, XWordResult},
  time::time_fn,
};
use xword_dict::Dictionary;

use crate::{
  board::{Board, SlotId},
  phrase::Phrase,
  placement::PlacementEnumerator,
  solver::{CancelFlag, SolveOutcome, Solver, SolverStats},
};

#[derive(Clone, Debug)]
pub struct SearchConfig {
  /// Maximum number of solver runs in flight at once.
  pub workers: usize,
}

impl SearchConfig {
  pub fn with_workers(workers: usize) -> Self {
    Self { workers: workers.max(1) }
  }
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self::with_workers(thread::available_parallelism().map_or(1, NonZeroUsize::get))
  }
}

#[derive(Debug, Default)]
pub struct SearchReport {
  pub solution: Option<Board>,
  /// Solver runs started, one per placement pulled from the enumerator.
  pub launched: usize,
  pub failed: usize,
  pub cancelled: usize,
  /// Runs that also succeeded after a solution had already been accepted.
  pub discarded: usize,
}

struct RunResult {
  index: usize,
  slots: Vec<SlotId>,
  time: Duration,
  outcome: SolveOutcome,
  stats: SolverStats,
}

/// Races solver runs over the placements of `phrase` on `board`, keeping the
/// first solution found. At most `config.workers` runs execute at a time, and
/// no new run starts once a solution is accepted.
pub async fn generate<D>(
  board: &Board,
  dictionary: Arc<D>,
  phrase: &Phrase,
  config: &SearchConfig,
) -> XWordResult<SearchReport>
where
  D: Dictionary + Send + Sync + 'static,
{
  let workers = config.workers.max(1);
  let cancel = CancelFlag::default();
  let mut placements = PlacementEnumerator::new(board, phrase, dictionary.as_ref()).enumerate();
  let mut runs = JoinSet::new();
  let mut report = SearchReport::default();

  info!("Searching for \"{phrase}\" with up to {workers} workers");

  loop {
    while report.solution.is_none() && runs.len() < workers {
      let Some((index, placement)) = placements.next() else {
        break;
      };
      debug!("Launching run {index} on slots {:?}", placement.slots);

      let dictionary = dictionary.clone();
      let cancel = cancel.clone();
      runs.spawn_blocking(move || {
        let slots = placement.slots.clone();
        let (time, (outcome, stats)) =
          time_fn(|| Solver::new(dictionary.as_ref(), placement, cancel).solve());
        RunResult { index, slots, time, outcome, stats }
      });
      report.launched += 1;
    }

    let Some(joined) = runs.join_next().await else {
      break;
    };
    let run = match joined {
      Ok(run) => run,
      Err(err) => {
        cancel.cancel();
        return Err(XWordError::Internal(format!("Solver run did not complete: {err}")).into());
      }
    };

    debug!(
      "Run {} on slots {:?} finished in {:.3}s: {} states, {} backtracks",
      run.index,
      run.slots,
      run.time.as_secs_f32(),
      run.stats.states,
      run.stats.backtracks
    );

    match run.outcome {
      SolveOutcome::Success(solution) => {
        if report.solution.is_none() {
          info!("Run {} found a solution", run.index);
          cancel.cancel();
          report.solution = Some(solution);
        } else {
          report.discarded += 1;
        }
      }
      SolveOutcome::Failure => report.failed += 1,
      SolveOutcome::Cancelled => report.cancelled += 1,
    }
  }

  info!(
    "Search finished: {} launched, {} failed, {} cancelled, {} discarded",
    report.launched, report.failed, report.cancelled, report.discarded
  );
  Ok(report)
}
