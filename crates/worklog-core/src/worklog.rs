use crate::config::{Config, VaultBackend};
use crate::entry::EntryBatch;
use crate::error::Result;
use crate::model::{LanguageModel, VaultModel};
use crate::organizer::EntryOrganizer;
use crate::report::{ReportRequest, ReportSynthesizer};
use crate::store::WorklogStore;
use crate::vault::{CredentialVault, FileVault, KeyringVault};
use chrono::NaiveDate;
use llm_gateway::ChatClient;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// One installation: the store, its credential vault, the model, and the
/// effective config. Surfaces hold one of these behind an `Arc`.
pub struct Worklog {
    store: WorklogStore,
    vault: Arc<dyn CredentialVault>,
    model: Arc<dyn LanguageModel>,
    config: Config,
    today: Option<NaiveDate>,
}

impl Worklog {
    pub fn new(
        store: WorklogStore,
        vault: Arc<dyn CredentialVault>,
        model: Arc<dyn LanguageModel>,
        config: Config,
    ) -> Self {
        Self {
            store,
            vault,
            model,
            config,
            today: None,
        }
    }

    /// Wire up the installation under `root`: `config.yaml`, the vault it
    /// selects, and an HTTP chat client.
    pub fn open(root: &Path) -> Result<Self> {
        let config = Config::load(root)?;
        for w in config.validate() {
            warn!(level = ?w.level, "config: {}", w.message);
        }
        let store = WorklogStore::open(root)?;
        debug!(backend = ?config.worklog.vault, "opening credential vault");
        let vault: Arc<dyn CredentialVault> = match config.worklog.vault {
            VaultBackend::Keyring => Arc::new(KeyringVault::new()?),
            VaultBackend::File => Arc::new(FileVault::new(root)),
        };
        let client = ChatClient::new(config.client_config())?;
        let model = Arc::new(VaultModel::new(client, Arc::clone(&vault)));
        Ok(Self::new(store, vault, model, config))
    }

    /// Pin the date new entries are tagged with. Defaults to the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &WorklogStore {
        &self.store
    }

    // ---------------------------------------------------------------------------
    // Document
    // ---------------------------------------------------------------------------

    pub async fn organize<S: AsRef<str>>(&self, entries: &[S]) -> Result<()> {
        let batch = EntryBatch::new(entries, self.config.worklog.max_entries)?;
        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        EntryOrganizer::new(&self.store, self.vault.as_ref(), self.model.as_ref())
            .organize(&batch, today)
            .await
    }

    pub async fn read(&self) -> String {
        self.store.read().await
    }

    pub async fn has_backup(&self) -> bool {
        self.store.has_backup().await
    }

    pub async fn undo(&self) -> Result<String> {
        self.store.undo().await
    }

    pub async fn generate(&self, req: &ReportRequest) -> Result<String> {
        ReportSynthesizer::new(&self.store, self.vault.as_ref(), self.model.as_ref())
            .generate(req)
            .await
    }

    // ---------------------------------------------------------------------------
    // Credential
    // ---------------------------------------------------------------------------

    pub fn credential_status(&self) -> bool {
        self.vault.status()
    }

    pub fn save_credential(&self, candidate: &str) -> Result<()> {
        self.vault.save(candidate)
    }

    pub fn delete_credential(&self) -> Result<()> {
        self.vault.delete()
    }
}
