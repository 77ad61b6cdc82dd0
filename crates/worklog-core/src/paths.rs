use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File layout under the data root
// ---------------------------------------------------------------------------

/// Directory name used under `$HOME` when no root is given.
pub const DEFAULT_ROOT_DIR: &str = ".worklog";

pub const WORKLOG_FILE: &str = "worklog.md";
pub const BACKUP_FILE: &str = "worklog.backup.md";
pub const CONFIG_FILE: &str = "config.yaml";
pub const CREDENTIALS_DIR: &str = "credentials";
pub const API_KEY_FILE: &str = "api_key";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn worklog_path(root: &Path) -> PathBuf {
    root.join(WORKLOG_FILE)
}

pub fn backup_path(root: &Path) -> PathBuf {
    root.join(BACKUP_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn credentials_dir(root: &Path) -> PathBuf {
    root.join(CREDENTIALS_DIR)
}

pub fn api_key_path(root: &Path) -> PathBuf {
    credentials_dir(root).join(API_KEY_FILE)
}

/// `$HOME/.worklog`, or `./.worklog` when no home directory is known.
pub fn default_root() -> PathBuf {
    home::home_dir()
        .map(|h| h.join(DEFAULT_ROOT_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
