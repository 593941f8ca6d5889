//! Configuration system for the RAI toolkit.
//!
//! Uses `figment` for layered configuration: defaults, then the user config file, the
//! workspace config file, environment variables and explicit overrides.

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name for workspace-local configuration.
pub const WORKSPACE_DIR: &str = ".rai";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaiConfig {
    pub advisory: AdvisoryConfig,
    pub assessment: AssessmentConfig,
    pub lifecycle: LifecycleConfig,
}

/// Which advisory text-generation backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryProviderKind {
    #[default]
    Mock,
    Openai,
}

impl std::fmt::Display for AdvisoryProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvisoryProviderKind::Mock => write!(f, "mock"),
            AdvisoryProviderKind::Openai => write!(f, "openai"),
        }
    }
}

/// Settings for the optional advisory LLM call made by each evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Whether evaluators request advisory commentary at all.
    pub enabled: bool,
    pub provider: AdvisoryProviderKind,
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Upper bound on a single advisory call.
    pub timeout_secs: u64,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: AdvisoryProviderKind::default(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// Settings for the assessment fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    /// Whether production monitoring has been confirmed for the system.
    pub monitoring_configured: bool,
    pub max_concurrent_evaluators: usize,
    pub evaluator_timeout_secs: u64,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            monitoring_configured: false,
            max_concurrent_evaluators: 6,
            evaluator_timeout_secs: 60,
        }
    }
}

/// Settings for lifecycle checkpoint verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Name recorded as the verifier on each checkpoint.
    pub verified_by: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            verified_by: "LifecycleTracker".to_string(),
        }
    }
}

/// Load configuration from all sources, merging in priority order:
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `RAI_`)
/// 3. Workspace-local config (`.rai/config.toml`)
/// 4. User config (`~/.config/rai/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&RaiConfig>,
) -> Result<RaiConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(RaiConfig::default()));

    if let Some(user_config) = user_config_path()
        && user_config.exists()
    {
        figment = figment.merge(Toml::file(&user_config));
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // RAI_ADVISORY__TIMEOUT_SECS, RAI_ASSESSMENT__MONITORING_CONFIGURED, etc.
    figment = figment.merge(Env::prefixed("RAI_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Path of the user-level config file, if a home directory can be resolved.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "rai", "rai")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(WORKSPACE_DIR).join("config.toml")
}
