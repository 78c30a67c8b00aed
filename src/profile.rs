use std::{fs::File, future::Future, path::Path};

use log::info;
use pprof::ProfilerGuardBuilder;
use util::error::XWordResult;

/// Runs `f` under the sampling profiler and writes a flamegraph of it to
/// `path`. The future's output is returned even if the report can't be written.
pub async fn with_flamegraph<F, T>(path: &Path, f: F) -> XWordResult<T>
where
  F: Future<Output = T>,
{
  let guard = ProfilerGuardBuilder::default()
    .frequency(1000)
    .blocklist(&["libc", "libgcc", "pthread", "vdso"])
    .build()?;

  let result = f.await;

  let report = guard.report().build()?;
  report.flamegraph(File::create(path)?)?;
  info!("Wrote flamegraph to {}", path.display());

  Ok(result)
}
