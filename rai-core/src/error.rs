//! Error types for the RAI assessment core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering profile ingestion, advisory providers, configuration,
//! assessment routing, and lifecycle tracking.

use std::path::PathBuf;

/// Top-level error type for the RAI core library.
#[derive(Debug, thiserror::Error)]
pub enum RaiError {
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Assessment error: {0}")]
    Assessment(#[from] AssessmentError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while loading or validating a system profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Unsupported profile format (expected .json, .yaml or .yml): {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to parse profile {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid profile: {message}")]
    Invalid { message: String },
}

/// Errors from advisory text-generation providers.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Provider connection failed: {message}")]
    Connection { message: String },
}

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },

    #[error("Environment variable not set: {var}")]
    EnvVarMissing { var: String },
}

/// Errors from assessment routing and evaluator execution.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("Unknown principle: {name}. Available: {valid}")]
    UnknownPrinciple { name: String, valid: String },

    #[error("Unknown lifecycle phase: {name}. Available: {valid}")]
    UnknownPhase { name: String, valid: String },

    #[error("Evaluator for {principle} failed: {message}")]
    EvaluatorFailed { principle: String, message: String },
}

/// Errors from the lifecycle tracker.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Phase '{phase}' is terminal; no further transitions are possible")]
    TerminalPhase { phase: String },

    #[error("Evidence store error: {message}")]
    Evidence { message: String },
}

/// Convenience result type for RAI core operations.
pub type Result<T> = std::result::Result<T, RaiError>;
