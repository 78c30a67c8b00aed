use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
  /// The filled grid followed by one line per slot.
  Text,
  /// The filled tile grid, bitcode-encoded.
  Bitcode,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
  /// Board layout file.
  #[arg(short, long)]
  pub input: PathBuf,

  /// Word list, one word per line.
  #[arg(short, long)]
  pub dictionary: PathBuf,

  #[arg(short, long)]
  pub output: PathBuf,

  /// Phrase that must appear on the board.
  #[arg(short, long)]
  pub puzzle: String,

  /// Solver runs allowed in flight at once. Defaults to the number of CPUs.
  #[arg(long)]
  pub workers: Option<usize>,

  #[arg(long, default_value = "text")]
  pub format: OutputFormat,

  /// Profile the search and write a flamegraph SVG here.
  #[arg(long)]
  pub flamegraph: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use clap::Parser;
  use googletest::prelude::*;

  use super::{Args, OutputFormat};

  #[gtest]
  fn test_parse_required() {
    let args = Args::try_parse_from([
      "xword-fill", "-i", "board.txt", "-d", "words.txt", "-o", "out.txt", "-p", "cat",
    ])
    .unwrap();
    expect_that!(args.puzzle, eq("cat"));
    expect_that!(args.format, eq(OutputFormat::Text));
    expect_true!(args.workers.is_none());
    expect_true!(args.flamegraph.is_none());
  }

  #[gtest]
  fn test_parse_options() {
    let args = Args::try_parse_from([
      "xword-fill",
      "--input",
      "board.txt",
      "--dictionary",
      "words.txt",
      "--output",
      "out.bin",
      "--puzzle",
      "happy birthday",
      "--workers",
      "3",
      "--format",
      "bitcode",
    ])
    .unwrap();
    expect_that!(args.workers, some(eq(3)));
    expect_that!(args.format, eq(OutputFormat::Bitcode));
    expect_that!(args.puzzle, eq("happy birthday"));
  }

  #[gtest]
  fn test_missing_puzzle() {
    let args = Args::try_parse_from(["xword-fill", "-i", "a", "-d", "b", "-o", "c"]);
    expect_that!(args, err(anything()));
  }
}
