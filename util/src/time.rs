use std::{
  future::Future,
  time::{Duration, Instant},
};

pub fn time_fn<F: FnOnce() -> T, T>(f: F) -> (Duration, T) {
  let start = Instant::now();
  let result = f();
  (start.elapsed(), result)
}

pub async fn time_future<F: Future<Output = T>, T>(f: F) -> (Duration, T) {
  let start = Instant::now();
  let result = f.await;
  (start.elapsed(), result)
}
