use crate::error::Result;
use crate::paths;
use llm_gateway::types::{
    DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use llm_gateway::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Language-model connection and sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_name")]
    pub name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Bound on each gateway call; an expired call surfaces as a network error.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model_name() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// WorklogConfig
// ---------------------------------------------------------------------------

/// Where the API key lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultBackend {
    #[default]
    Keyring,
    /// `<root>/credentials/api_key`, for hosts without a secret service.
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorklogConfig {
    /// Upper bound on entries accepted in one submission.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default)]
    pub vault: VaultBackend,
}

fn default_max_entries() -> usize {
    3
}

impl Default for WorklogConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            vault: VaultBackend::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub worklog: WorklogConfig,
}

impl Config {
    /// Load `<root>/config.yaml`. A missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        match crate::io::read_optional(&path)? {
            Some(data) if !data.trim().is_empty() => Ok(serde_yaml::from_str(&data)?),
            _ => Ok(Self::default()),
        }
    }

    /// Gateway client settings derived from `model`.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.model.base_url.clone(),
            model: self.model.name.clone(),
            max_tokens: self.model.max_tokens,
            temperature: self.model.temperature,
            timeout: Duration::from_secs(self.model.timeout_secs),
        }
    }

    /// Validate the config and return any warnings or errors found.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Model name must be present
        if self.model.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "model.name is empty".to_string(),
            });
        }

        // 2. A zero timeout would make every gateway call fail immediately
        if self.model.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "model.timeout_secs must be greater than 0".to_string(),
            });
        }

        // 3. Sampling temperature outside the range providers accept
        if !(0.0..=2.0).contains(&self.model.temperature) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "model.temperature {} is outside 0.0..=2.0",
                    self.model.temperature
                ),
            });
        }

        // 4. Base URL must be http(s)
        if !self.model.base_url.starts_with("http://") && !self.model.base_url.starts_with("https://")
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "model.base_url '{}' must start with http:// or https://",
                    self.model.base_url
                ),
            });
        }

        // 5. Entry batches must allow at least one entry
        if self.worklog.max_entries == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "worklog.max_entries must be at least 1".to_string(),
            });
        }

        warnings
    }

    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|w| w.level == WarnLevel::Error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
