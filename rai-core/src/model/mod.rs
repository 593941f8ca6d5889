//! Domain model: value types shared by evaluators, the lifecycle tracker and
//! the AIA compiler. Behavior is limited to small derived computations.

pub mod aia;
pub mod evaluation;
pub mod finding;
pub mod lifecycle;
pub mod profile;
pub mod risk;

pub use aia::{AiaRecommendation, AiaReport, AiaSections, mean_score};
pub use evaluation::{ComplianceStatus, Principle, PrincipleEvaluation};
pub use finding::{Finding, RemediationEffort, Severity};
pub use lifecycle::{
    LifecyclePhase, LifecycleStatus, PhaseCheckpoint, PhaseTransition, VerificationCriterion,
};
pub use profile::{AiSystemType, RiskLevel, SystemProfile};
pub use risk::{
    Impact, Likelihood, Mitigation, MitigationStrategy, Risk, RiskAssessment, RiskCategory,
};
