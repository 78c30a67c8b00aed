#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod board;
pub mod phrase;
pub mod placement;
pub mod search;
pub mod solver;
