use std::{
  fmt::Display,
  ops::{Add, Mul},
};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Pos {
  pub x: i32,
  pub y: i32,
}

impl Pos {
  pub const fn zero() -> Self {
    Self { x: 0, y: 0 }
  }

  pub const fn transpose(&self) -> Self {
    Self { x: self.y, y: self.x }
  }
}

impl Add<Diff> for Pos {
  type Output = Self;

  fn add(self, rhs: Diff) -> Self {
    Self { x: self.x + rhs.x, y: self.y + rhs.y }
  }
}

impl Display for Pos {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Diff {
  pub x: i32,
  pub y: i32,
}

impl Diff {
  pub const DX: Self = Self { x: 1, y: 0 };
  pub const DY: Self = Self { x: 0, y: 1 };

  /// Unit step along a row (`is_row`) or down a column.
  pub const fn step(is_row: bool) -> Self {
    if is_row {
      Self::DX
    } else {
      Self::DY
    }
  }
}

impl Mul<i32> for Diff {
  type Output = Diff;

  fn mul(self, rhs: i32) -> Self {
    Self { x: self.x * rhs, y: self.y * rhs }
  }
}

impl Display for Diff {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}
