use std::{collections::HashMap, fmt::Display, fs, path::Path, sync::Arc};

use bitcode::{Decode, Encode};
use itertools::Itertools;
use util::{
  error::{XWordError, XWordResult},
  grid::{Grid, Gridlike, MutGridlike},
  pos::{Diff, Pos},
};
use xword_dict::Pattern;

/// Index of a slot in [`Board::slots`], assigned in board-scan order.
pub type SlotId = usize;

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum XWordTile {
  Letter(char),
  Empty,
  Wall,
}

impl XWordTile {
  pub fn empty(&self) -> bool {
    matches!(self, XWordTile::Empty)
  }

  pub fn available(&self) -> bool {
    matches!(self, XWordTile::Empty | XWordTile::Letter(_))
  }

  pub fn letter(&self) -> Option<char> {
    match self {
      XWordTile::Letter(c) => Some(*c),
      XWordTile::Empty | XWordTile::Wall => None,
    }
  }

  fn parse(c: char) -> XWordResult<Self> {
    match c {
      '_' | '.' => Ok(XWordTile::Empty),
      'X' | '#' => Ok(XWordTile::Wall),
      c if c.is_alphabetic() => Ok(XWordTile::Letter(c.to_uppercase().next().unwrap_or(c))),
      _ => Err(XWordError::Parse(format!("Unrecognized board character '{c}'")).into()),
    }
  }
}

impl Display for XWordTile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}",
      match self {
        XWordTile::Letter(c) => *c,
        XWordTile::Empty => '_',
        XWordTile::Wall => '#',
      }
    )
  }
}

/// A maximal run of at least two open tiles along a row or column.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Slot {
  pub id: SlotId,
  /// Clue number, shared by an across and a down slot starting on one tile.
  pub number: u32,
  pub pos: Pos,
  pub is_row: bool,
  pub length: u32,
}

impl Slot {
  pub fn positions(&self) -> impl Iterator<Item = Pos> {
    let Slot { pos, is_row, length, .. } = *self;
    (0..length as i32).map(move |idx| pos + Diff::step(is_row) * idx)
  }

  /// The position of the slot's last tile.
  pub fn end(&self) -> Pos {
    self.pos + Diff::step(self.is_row) * (self.length as i32 - 1)
  }

  pub fn direction(&self) -> &'static str {
    if self.is_row {
      "across"
    } else {
      "down"
    }
  }
}

/// The perpendicular slot sharing one of a slot's tiles.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Crossing {
  pub other: SlotId,
  pub other_index: u32,
}

/// Tile `index` of `slot` is tile `other_index` of `other`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Intersection {
  pub slot: SlotId,
  pub index: u32,
  pub other: SlotId,
  pub other_index: u32,
}

#[derive(Debug)]
struct Geometry {
  slots: Vec<Slot>,
  /// Per slot, per tile: the perpendicular slot through that tile.
  crossings: Vec<Vec<Option<Crossing>>>,
  slot_starts: HashMap<(Pos, bool), SlotId>,
  max_word_length: u32,
}

impl Geometry {
  /// (start x, length) of every run of available tiles in one line.
  fn iterate_open_runs<I>(tiles: I) -> impl Iterator<Item = (u32, u32)>
  where
    I: Iterator<Item = bool>,
  {
    struct OpenRuns<I> {
      x: u32,
      iter: Option<I>,
    }

    impl<I> Iterator for OpenRuns<I>
    where
      I: Iterator<Item = bool>,
    {
      type Item = (u32, u32);

      fn next(&mut self) -> Option<(u32, u32)> {
        let iter = self.iter.as_mut()?;

        loop {
          self.x += 1;
          match iter.next() {
            Some(true) => break,
            Some(false) => {}
            None => return None,
          }
        }
        let start = self.x - 1;
        let mut length = 1;

        loop {
          self.x += 1;
          match iter.next() {
            Some(true) => length += 1,
            Some(false) => break,
            None => {
              self.iter = None;
              break;
            }
          }
        }

        Some((start, length))
      }
    }

    OpenRuns { x: 0, iter: Some(tiles) }
  }

  fn iterate_board_row_runs<'a, G: Gridlike<XWordTile> + 'a>(
    board: G,
  ) -> impl Iterator<Item = (Pos, u32)> + 'a {
    (0..board.height()).flat_map(move |y| {
      Self::iterate_open_runs(board.iter_row(y).map(XWordTile::available))
        .map(|(x, length)| (Pos { x: x as i32, y: y as i32 }, length))
        .collect::<Vec<_>>()
    })
  }

  fn build(grid: &Grid<XWordTile>) -> XWordResult<Self> {
    if grid.width() == 0 || grid.height() == 0 {
      return Err(XWordError::InvalidLayout("Board has no tiles".to_owned()).into());
    }
    if !grid.iter().any(XWordTile::available) {
      return Err(XWordError::InvalidLayout("Board has no open tiles".to_owned()).into());
    }

    let runs = Self::iterate_board_row_runs(grid)
      .map(|(pos, length)| (pos, true, length))
      .chain(
        Self::iterate_board_row_runs(grid.transpose())
          .map(|(pos, length)| (pos.transpose(), false, length)),
      )
      .filter(|&(_, _, length)| length >= 2)
      .sorted_by_key(|&(pos, is_row, _)| (pos.y, pos.x, !is_row));

    let slots: Vec<_> = runs
      .scan((0, None), |(number, prev_pos), (pos, is_row, length)| {
        if *prev_pos != Some(pos) {
          *number += 1;
          *prev_pos = Some(pos);
        }
        Some((*number, pos, is_row, length))
      })
      .enumerate()
      .map(|(id, (number, pos, is_row, length))| Slot { id, number, pos, is_row, length })
      .collect();

    let tile_slots: HashMap<(Pos, bool), (SlotId, u32)> = slots
      .iter()
      .flat_map(|slot| {
        slot
          .positions()
          .enumerate()
          .map(move |(idx, pos)| ((pos, slot.is_row), (slot.id, idx as u32)))
      })
      .collect();

    let crossings = slots
      .iter()
      .map(|slot| {
        slot
          .positions()
          .map(|pos| {
            tile_slots
              .get(&(pos, !slot.is_row))
              .map(|&(other, other_index)| Crossing { other, other_index })
          })
          .collect()
      })
      .collect();

    let slot_starts = slots
      .iter()
      .map(|slot| ((slot.pos, slot.is_row), slot.id))
      .collect();
    let max_word_length = slots.iter().map(|slot| slot.length).max().unwrap_or(0);

    Ok(Self { slots, crossings, slot_starts, max_word_length })
  }
}

/// A crossword board: tile contents plus the slot geometry derived from them.
/// Clones copy the tiles and share the geometry.
#[derive(Clone)]
pub struct Board {
  grid: Grid<XWordTile>,
  geometry: Arc<Geometry>,
}

impl Board {
  /// Parses a layout with one board row per line. `_` or `.` is an open tile,
  /// `X` or `#` a wall, and any other letter a pre-filled open tile (so a
  /// pre-filled X must be written lowercase).
  pub fn from_layout(layout: &str) -> XWordResult<Self> {
    let (width, height, tiles) = layout
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .try_fold(
        (None, 0, vec![]),
        |(width, height, mut tiles), line| -> XWordResult<_> {
          let line_len = line.chars().count();
          if let Some(width) = width {
            if line_len != width {
              return Err(
                XWordError::Parse(format!("Board line lengths differ: {line_len} vs {width}"))
                  .into(),
              );
            }
          }
          tiles.extend(line.chars().map(XWordTile::parse).collect::<XWordResult<Vec<_>>>()?);

          Ok((Some(line_len), height + 1, tiles))
        },
      )?;

    let width =
      width.ok_or_else(|| XWordError::InvalidLayout("Empty board string".to_owned()))? as u32;
    Self::from_grid(Grid::from_vec(tiles, width, height)?)
  }

  pub fn open(path: impl AsRef<Path>) -> XWordResult<Self> {
    let path = path.as_ref();
    let layout = fs::read_to_string(path).map_err(|err| {
      XWordError::InvalidLayout(format!("Failed to read {}: {err}", path.display()))
    })?;
    Self::from_layout(&layout)
  }

  pub fn from_grid(grid: Grid<XWordTile>) -> XWordResult<Self> {
    let geometry = Arc::new(Geometry::build(&grid)?);
    Ok(Self { grid, geometry })
  }

  pub fn grid(&self) -> &Grid<XWordTile> {
    &self.grid
  }

  pub fn width(&self) -> u32 {
    self.grid.width()
  }

  pub fn height(&self) -> u32 {
    self.grid.height()
  }

  pub fn tile(&self, pos: Pos) -> Option<&XWordTile> {
    self.grid.get(pos)
  }

  pub fn slots(&self) -> &[Slot] {
    &self.geometry.slots
  }

  pub fn slot(&self, id: SlotId) -> Option<&Slot> {
    self.geometry.slots.get(id)
  }

  /// The slot starting at `pos` in the given direction, if any.
  pub fn slot_at(&self, pos: Pos, is_row: bool) -> Option<&Slot> {
    self
      .geometry
      .slot_starts
      .get(&(pos, is_row))
      .and_then(|&id| self.slot(id))
  }

  pub fn crossings(&self, id: SlotId) -> &[Option<Crossing>] {
    self
      .geometry
      .crossings
      .get(id)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Every across/down pair sharing a tile, reported once from the across side.
  pub fn intersections(&self) -> impl Iterator<Item = Intersection> + '_ {
    self
      .slots()
      .iter()
      .filter(|slot| slot.is_row)
      .flat_map(move |slot| {
        self
          .crossings(slot.id)
          .iter()
          .enumerate()
          .filter_map(move |(index, crossing)| {
            crossing.map(|Crossing { other, other_index }| Intersection {
              slot: slot.id,
              index: index as u32,
              other,
              other_index,
            })
          })
      })
  }

  pub fn max_word_length(&self) -> u32 {
    self.geometry.max_word_length
  }

  pub fn pattern(&self, id: SlotId) -> Pattern {
    self
      .slot(id)
      .into_iter()
      .flat_map(Slot::positions)
      .map(|pos| self.grid.get(pos).and_then(XWordTile::letter))
      .collect()
  }

  pub fn slot_word(&self, id: SlotId) -> Option<String> {
    self.pattern(id).to_word()
  }

  /// Writes `word` into the slot and returns the tiles that were empty before.
  /// Tiles already holding a letter are left alone.
  pub fn write_word(&mut self, id: SlotId, word: &str) -> Vec<Pos> {
    let Some(slot) = self.slot(id).copied() else {
      return vec![];
    };
    slot
      .positions()
      .zip(word.chars())
      .filter_map(|(pos, letter)| {
        let tile = self.grid.get_mut(pos)?;
        debug_assert!(tile.letter().is_none_or(|existing| existing == letter));
        tile.empty().then(|| {
          *tile = XWordTile::Letter(letter);
          pos
        })
      })
      .collect()
  }

  pub fn clear(&mut self, positions: &[Pos]) {
    for &pos in positions {
      if let Some(tile) = self.grid.get_mut(pos) {
        *tile = XWordTile::Empty;
      }
    }
  }

  /// Whether every slot is filled. Open tiles outside any slot don't count.
  pub fn is_complete(&self) -> bool {
    self
      .slots()
      .iter()
      .all(|slot| self.pattern(slot.id).is_complete())
  }

  /// Every slot whose tiles are all filled, with the word they spell.
  pub fn assignments(&self) -> impl Iterator<Item = (&Slot, String)> + '_ {
    self
      .slots()
      .iter()
      .filter_map(|slot| self.slot_word(slot.id).map(|word| (slot, word)))
  }
}

impl Display for Board {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.grid)
  }
}

impl std::fmt::Debug for Board {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self.grid)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use util::pos::Pos;

  use super::{Board, Intersection, XWordTile};

  #[gtest]
  fn test_empty() {
    expect_that!(Board::from_layout(""), err(anything()));
    expect_that!(Board::from_layout("\n   \n"), err(anything()));
  }

  #[gtest]
  fn test_no_open_tiles() {
    expect_that!(Board::from_layout("XX\n##"), err(anything()));
  }

  #[gtest]
  fn test_bad_layout() {
    expect_that!(Board::from_layout("__\n_"), err(anything()));
    expect_that!(Board::from_layout("_?"), err(anything()));
  }

  #[gtest]
  fn test_tiles() {
    let board = Board::from_layout(
      "_c
       X.",
    )
    .unwrap();
    expect_that!(board.tile(Pos { x: 0, y: 0 }).cloned(), some(eq(&XWordTile::Empty)));
    expect_that!(board.tile(Pos { x: 1, y: 0 }).cloned(), some(eq(&XWordTile::Letter('C'))));
    expect_that!(board.tile(Pos { x: 0, y: 1 }).cloned(), some(eq(&XWordTile::Wall)));
    expect_that!(board.tile(Pos { x: 1, y: 1 }).cloned(), some(eq(&XWordTile::Empty)));
    expect_that!(board.tile(Pos { x: 2, y: 1 }).cloned(), none());
  }

  #[gtest]
  fn test_slots() {
    let board = Board::from_layout(
      "__
       X_",
    )
    .unwrap();

    // The lone tile at (1, 1) across and the one at (0, 0) down are too short.
    expect_that!(board.slots().len(), eq(2));
    let slot = board.slots()[0];
    expect_that!(slot.pos, eq(Pos::zero()));
    expect_true!(slot.is_row);
    expect_that!(slot.length, eq(2));
    expect_that!(slot.number, eq(1));

    let slot = board.slots()[1];
    expect_that!(slot.pos, eq(Pos { x: 1, y: 0 }));
    expect_false!(slot.is_row);
    expect_that!(slot.length, eq(2));
    expect_that!(slot.number, eq(2));
  }

  #[gtest]
  fn test_slot_order_and_numbers() {
    let board = Board::from_layout(
      "___
       _X_
       ___",
    )
    .unwrap();

    expect_that!(
      board
        .slots()
        .iter()
        .map(|slot| (slot.number, slot.pos, slot.is_row))
        .collect::<Vec<_>>(),
      container_eq([
        (1, Pos { x: 0, y: 0 }, true),
        (1, Pos { x: 0, y: 0 }, false),
        (2, Pos { x: 2, y: 0 }, false),
        (3, Pos { x: 0, y: 2 }, true),
      ])
    );
  }

  #[gtest]
  fn test_max_word_length() {
    let board = Board::from_layout(
      "____X
       _X___
       _X_X_",
    )
    .unwrap();
    expect_that!(
      board.max_word_length(),
      eq(board.slots().iter().map(|slot| slot.length).max().unwrap())
    );
    expect_that!(board.max_word_length(), eq(4));
  }

  #[gtest]
  fn test_intersections() {
    let board = Board::from_layout(
      "___
       _X_
       ___",
    )
    .unwrap();

    expect_that!(
      board.intersections().collect::<Vec<_>>(),
      container_eq([
        Intersection { slot: 0, index: 0, other: 1, other_index: 0 },
        Intersection { slot: 0, index: 2, other: 2, other_index: 0 },
        Intersection { slot: 3, index: 0, other: 1, other_index: 2 },
        Intersection { slot: 3, index: 2, other: 2, other_index: 2 },
      ])
    );
    for Intersection { slot, index, other, other_index } in board.intersections() {
      let pos = board.slots()[slot].positions().nth(index as usize);
      let other_pos = board.slots()[other].positions().nth(other_index as usize);
      expect_that!(pos, eq(other_pos));
    }
  }

  #[gtest]
  fn test_write_and_clear() {
    let mut board = Board::from_layout(
      "_a_
       ___",
    )
    .unwrap();
    let across = board.slot_at(Pos::zero(), true).unwrap().id;
    expect_that!(board.pattern(across).to_string(), eq("_A_"));

    let written = board.write_word(across, "CAT");
    expect_that!(written, container_eq([Pos { x: 0, y: 0 }, Pos { x: 2, y: 0 }]));
    expect_that!(board.slot_word(across), some(eq("CAT")));

    board.clear(&written);
    expect_that!(board.pattern(across).to_string(), eq("_A_"));
  }

  #[gtest]
  fn test_clones_do_not_share_tiles() {
    let board = Board::from_layout("___").unwrap();
    let mut copy = board.clone();
    copy.write_word(0, "OWL");
    expect_that!(copy.slot_word(0), some(eq("OWL")));
    expect_that!(board.slot_word(0), none());
    expect_false!(board.is_complete());
    expect_true!(copy.is_complete());
  }

  #[gtest]
  fn test_display() {
    let board = Board::from_layout(
      "ab
       X_",
    )
    .unwrap();
    expect_that!(board.to_string(), eq("A B\n# _\n"));
  }
}
