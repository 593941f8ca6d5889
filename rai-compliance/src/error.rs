//! Error types for the compliance crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("Unknown regulation: {name}. Supported: {valid}")]
    UnknownRegulation { name: String, valid: String },
    #[error("Unknown report type: {name}. Supported: {valid}")]
    UnknownReportType { name: String, valid: String },
    #[error("Unknown output format: {name}. Supported: {valid}")]
    UnknownFormat { name: String, valid: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
