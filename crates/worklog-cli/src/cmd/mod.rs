pub mod add;
pub mod config;
pub mod key;
pub mod report;
pub mod serve;
pub mod show;
pub mod undo;

use anyhow::{bail, Context};
use std::future::Future;
use std::path::Path;
use worklog_core::Worklog;

/// Open the installation under `root`, refusing to run on a config with
/// error-level problems. Warnings are logged by the engine.
pub fn open(root: &Path) -> anyhow::Result<Worklog> {
    let worklog = Worklog::open(root)
        .with_context(|| format!("failed to open worklog at {}", root.display()))?;
    if worklog.config().has_errors() {
        bail!("config.yaml has errors; run 'worklog config show' for details");
    }
    Ok(worklog)
}

pub fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(fut))
}
