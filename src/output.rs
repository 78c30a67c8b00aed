use std::{
  fs::File,
  io::{BufWriter, Write},
  path::Path,
};

use util::{
  bitcode,
  error::{XWordError, XWordResult},
};
use xword_gen::board::Board;

use crate::args::OutputFormat;

/// Writes the rendered grid, a blank line, then each slot's clue number,
/// start, direction and word in board-scan order.
pub fn write_text<W: Write>(board: &Board, writer: &mut W) -> XWordResult {
  write!(writer, "{board}")?;
  writeln!(writer)?;
  for (slot, word) in board.assignments() {
    writeln!(writer, "{}. {} {} {word}", slot.number, slot.pos, slot.direction())?;
  }
  Ok(())
}

pub fn write_bitcode<W: Write>(board: &Board, writer: &mut W) -> XWordResult {
  writer.write_all(&bitcode::encode(board.grid()))?;
  Ok(())
}

pub fn save_solution(board: &Board, path: &Path, format: OutputFormat) -> XWordResult {
  let write = || -> XWordResult {
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
      OutputFormat::Text => write_text(board, &mut writer)?,
      OutputFormat::Bitcode => write_bitcode(board, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
  };
  write().map_err(|err| XWordError::Output(format!("{}: {err}", path.display())).into())
}
