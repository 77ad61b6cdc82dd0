use std::path::{Path, PathBuf};
use worklog_core::paths;

/// Resolve the data root.
///
/// Priority:
/// 1. `--root` flag / `WORKLOG_ROOT` env var (passed in as `explicit`)
/// 2. `$HOME/.worklog`
/// 3. `./.worklog` when no home directory is known
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => paths::default_root(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn default_root_is_the_worklog_dir() {
        assert!(resolve_root(None).ends_with(paths::DEFAULT_ROOT_DIR));
    }
}
