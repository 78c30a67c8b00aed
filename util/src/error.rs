use core::fmt;
use std::{
  error::Error,
  fmt::{Display, Formatter},
};

#[derive(Debug)]
pub enum XWordError {
  Internal(String),
  Parse(String),
  InvalidLayout(String),
  DictionaryLoad(String),
  NoSolution(String),
  Output(String),
}

impl Display for XWordError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      XWordError::Internal(msg) => write!(f, "Internal error: {msg}"),
      XWordError::Parse(msg) => write!(f, "Parse error: {msg}"),
      XWordError::InvalidLayout(msg) => write!(f, "Invalid layout: {msg}"),
      XWordError::DictionaryLoad(msg) => write!(f, "Dictionary load error: {msg}"),
      XWordError::NoSolution(msg) => write!(f, "No solution: {msg}"),
      XWordError::Output(msg) => write!(f, "Output error: {msg}"),
    }
  }
}

impl Error for XWordError {}

pub type XWordResult<T = ()> = Result<T, Box<dyn Error>>;
