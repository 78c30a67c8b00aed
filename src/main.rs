#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod args;
mod output;
mod profile;

use std::{error::Error, process::ExitCode, sync::Arc};

use args::Args;
use clap::Parser;
use log::{error, info};
use util::{
  error::{XWordError, XWordResult},
  time::time_future,
};
use xword_dict::{Dictionary, WordIndex};
use xword_gen::{
  board::Board,
  phrase::Phrase,
  search::{generate, SearchConfig, SearchReport},
};

/// A failed stage of the run, mapped to the process exit code.
enum Failure {
  Layout(Box<dyn Error>),
  Dictionary(Box<dyn Error>),
  Generation(Box<dyn Error>),
  NoSolution,
  Output(Box<dyn Error>),
}

impl Failure {
  fn exit_code(&self) -> u8 {
    match self {
      Failure::Layout(_) => 2,
      Failure::Dictionary(_) => 3,
      Failure::Generation(_) => 4,
      Failure::NoSolution => 5,
      Failure::Output(_) => 6,
    }
  }

  fn report(&self, args: &Args) {
    match self {
      Failure::Layout(err) => {
        error!("Cannot load crossword layout from {}: {err}", args.input.display())
      }
      Failure::Dictionary(err) => {
        error!("Cannot load dictionary from {}: {err}", args.dictionary.display())
      }
      Failure::Generation(err) => error!("Generating crossword has failed: {err}"),
      Failure::NoSolution => error!("{}", XWordError::NoSolution(format!("\"{}\"", args.puzzle))),
      Failure::Output(err) => {
        error!("Saving result crossword to {} has failed: {err}", args.output.display())
      }
    }
  }
}

async fn search(
  board: &Board,
  dictionary: Arc<WordIndex>,
  phrase: &Phrase,
  args: &Args,
) -> XWordResult<SearchReport> {
  let config = args.workers.map_or_else(SearchConfig::default, SearchConfig::with_workers);
  let running = generate(board, dictionary, phrase, &config);
  match &args.flamegraph {
    Some(path) => profile::with_flamegraph(path, running).await?,
    None => running.await,
  }
}

async fn run(args: &Args) -> Result<(), Failure> {
  let board = Board::open(&args.input).map_err(Failure::Layout)?;
  info!(
    "Loaded {}x{} board with {} slots",
    board.width(),
    board.height(),
    board.slots().len()
  );

  let dictionary =
    WordIndex::open(&args.dictionary, board.max_word_length()).map_err(Failure::Dictionary)?;
  info!("Loaded {} words", dictionary.len());

  let phrase = Phrase::parse(&args.puzzle).map_err(Failure::Generation)?;
  let (time, report) = time_future(search(&board, Arc::new(dictionary), &phrase, args)).await;
  let report = report.map_err(Failure::Generation)?;
  info!("Search took {:.3}s", time.as_secs_f32());

  let solution = report.solution.ok_or(Failure::NoSolution)?;
  info!("Solution has been found:\n{solution}");
  output::save_solution(&solution, &args.output, args.format).map_err(Failure::Output)
}

#[tokio::main]
async fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    .format_timestamp(None)
    .format_target(false)
    .init();

  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(err) => {
      let _ = err.print();
      // Help and version requests land here too.
      return if err.use_stderr() { ExitCode::from(1) } else { ExitCode::SUCCESS };
    }
  };
  info!("xword-fill ver. {}", env!("CARGO_PKG_VERSION"));

  match run(&args).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(failure) => {
      failure.report(&args);
      ExitCode::from(failure.exit_code())
    }
  }
}
