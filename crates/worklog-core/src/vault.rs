//! Storage for the single language-model API key.
//!
//! The engine talks to the [`CredentialVault`] trait only. Backends:
//! [`KeyringVault`] (the platform secret store, used by default),
//! [`FileVault`] (owner-only file under the data root) and [`MemoryVault`]
//! (in-process).

use crate::error::{Result, WorklogError};
use crate::io;
use crate::paths;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Format rules
// ---------------------------------------------------------------------------

pub const KEY_PREFIX: &str = "sk-";
pub const MIN_KEY_LEN: usize = 40;

/// Check a candidate key against the accepted format: `sk-` prefix, at least
/// 40 characters in total, and only `[A-Za-z0-9_-]` after the prefix.
pub fn validate_credential(candidate: &str) -> Result<()> {
    let Some(rest) = candidate.strip_prefix(KEY_PREFIX) else {
        return Err(WorklogError::InvalidFormat(format!(
            "key must start with '{KEY_PREFIX}'"
        )));
    };
    if candidate.chars().count() < MIN_KEY_LEN {
        return Err(WorklogError::InvalidFormat(format!(
            "key must be at least {MIN_KEY_LEN} characters"
        )));
    }
    if rest.is_empty()
        || !rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(WorklogError::InvalidFormat(
            "key may only contain letters, digits, '-' and '_' after the prefix".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// The secret itself. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<redacted, {} chars>)", self.0.len())
    }
}

// ---------------------------------------------------------------------------
// CredentialVault
// ---------------------------------------------------------------------------

pub trait CredentialVault: Send + Sync {
    /// True iff a credential is stored. Backend errors count as absent.
    fn status(&self) -> bool {
        self.load().is_some()
    }

    /// Validate `candidate` and store it, replacing any previous value.
    fn save(&self, candidate: &str) -> Result<()>;

    /// Remove the stored credential. Succeeds when none is stored.
    fn delete(&self) -> Result<()>;

    /// Fetch the stored credential for one gateway call.
    fn load(&self) -> Option<Credential>;
}

// ---------------------------------------------------------------------------
// KeyringVault
// ---------------------------------------------------------------------------

pub const KEYRING_SERVICE: &str = "worklog-app";
pub const KEYRING_USER: &str = "openai_key";

/// The key held in the OS secret store (Keychain, Credential Manager, or the
/// Linux kernel keyring).
#[derive(Debug)]
pub struct KeyringVault {
    entry: keyring::Entry,
}

impl KeyringVault {
    pub fn new() -> Result<Self> {
        Self::with_entry(KEYRING_SERVICE, KEYRING_USER)
    }

    pub fn with_entry(service: &str, user: &str) -> Result<Self> {
        Ok(Self {
            entry: keyring::Entry::new(service, user)?,
        })
    }
}

/// `NoEntry` means nothing is stored; every other error is a real failure.
fn absent_on_no_entry<T>(result: keyring::Result<T>) -> keyring::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e),
    }
}

impl CredentialVault for KeyringVault {
    fn save(&self, candidate: &str) -> Result<()> {
        validate_credential(candidate)?;
        self.entry.set_password(candidate)?;
        info!("API key saved to the system keyring");
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if absent_on_no_entry(self.entry.delete_credential())?.is_some() {
            info!("API key deleted from the system keyring");
        }
        Ok(())
    }

    fn load(&self) -> Option<Credential> {
        match absent_on_no_entry(self.entry.get_password()) {
            Ok(Some(value)) => {
                let value = value.trim();
                (!value.is_empty()).then(|| Credential(value.to_string()))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read API key from keyring; treating as absent");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// FileVault
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FileVault {
    path: PathBuf,
}

impl FileVault {
    /// Vault at `<root>/credentials/api_key`.
    pub fn new(root: &Path) -> Self {
        Self {
            path: paths::api_key_path(root),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialVault for FileVault {
    fn save(&self, candidate: &str) -> Result<()> {
        validate_credential(candidate)?;
        io::atomic_write_private(&self.path, candidate.as_bytes())?;
        info!("API key saved");
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if io::remove_if_exists(&self.path)? {
            info!("API key deleted");
        }
        Ok(())
    }

    fn load(&self) -> Option<Credential> {
        match io::read_optional(&self.path) {
            Ok(Some(content)) => {
                let value = content.trim();
                (!value.is_empty()).then(|| Credential(value.to_string()))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read stored API key; treating as absent");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryVault
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryVault {
    value: Mutex<Option<String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// A vault already holding `key`. The key is validated like `save`.
    pub fn with_key(key: &str) -> Result<Self> {
        let vault = Self::new();
        vault.save(key)?;
        Ok(vault)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CredentialVault for MemoryVault {
    fn save(&self, candidate: &str) -> Result<()> {
        validate_credential(candidate)?;
        *self.slot() = Some(candidate.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        self.slot().take();
        Ok(())
    }

    fn load(&self) -> Option<Credential> {
        self.slot().clone().map(Credential)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
