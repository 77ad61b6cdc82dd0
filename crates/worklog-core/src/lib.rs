//! Worklog engine: a single markdown document of achievements, merged and
//! summarized through a language model.
//!
//! - [`store`]: the document and its one-step backup
//! - [`organizer`]: merges new entries into the document
//! - [`report`]: date-window reports in four styles
//! - [`vault`]: API key storage
//! - [`worklog`]: the [`Worklog`] handle surfaces hold

pub mod config;
pub mod entry;
pub mod error;
pub mod extract;
pub mod io;
pub mod model;
pub mod organizer;
pub mod paths;
pub mod report;
pub mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod vault;
pub mod worklog;

pub use error::{ErrorKind, Result, WorklogError};
pub use report::{ReportRequest, ReportStyle};
pub use store::WorklogStore;
pub use vault::{CredentialVault, FileVault, KeyringVault, MemoryVault};
pub use worklog::Worklog;
