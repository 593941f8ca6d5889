//! # RAI Core
//!
//! Core library for the Responsible-AI assessment toolkit.
//! Provides the domain model, the six principle evaluators, lifecycle
//! checkpoint tracking, AIA compilation, advisory providers and configuration.

pub mod advisory;
pub mod assessment;
pub mod config;
pub mod error;
pub mod evaluators;
pub mod lifecycle;
pub mod model;
pub mod types;

// Re-export commonly used types at the crate root.
pub use advisory::{AdvisoryClient, AdvisoryProvider, MockAdvisoryProvider, OpenAiCompatibleProvider};
pub use assessment::{
    AiaCompiler, AssessmentCommand, AssessmentOrchestrator, AssessmentSession, AssessmentSummary,
    SessionOutcome,
};
pub use config::{RaiConfig, load_config};
pub use error::{AssessmentError, LifecycleError, ProfileError, RaiError, Result};
pub use evaluators::{EvaluationContext, Evaluator, default_evaluators, evaluator_for};
pub use lifecycle::{EvidenceStore, LifecycleRegistry, LifecycleTracker};
pub use model::{
    AiSystemType, AiaRecommendation, AiaReport, ComplianceStatus, Finding, LifecyclePhase,
    LifecycleStatus, Principle, PrincipleEvaluation, RiskAssessment, RiskLevel, Severity,
    SystemProfile,
};
pub use types::{Message, Role};
