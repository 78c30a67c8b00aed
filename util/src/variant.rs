/// One of two iterator types yielding the same item, chosen at runtime.
#[derive(Clone, Debug)]
pub enum Variant2<T, U> {
  Opt1(T),
  Opt2(U),
}

impl<T, U, R> Iterator for Variant2<T, U>
where
  T: Iterator<Item = R>,
  U: Iterator<Item = R>,
{
  type Item = R;

  fn next(&mut self) -> Option<R> {
    match self {
      Self::Opt1(t) => t.next(),
      Self::Opt2(u) => u.next(),
    }
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    match self {
      Self::Opt1(t) => t.size_hint(),
      Self::Opt2(u) => u.size_hint(),
    }
  }
}
