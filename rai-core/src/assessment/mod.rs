//! Assessment orchestration: concurrent principle evaluation, AIA
//! compilation, roll-up summaries and the interactive session state machine.

pub mod aia;
pub mod orchestrator;
pub mod session;
pub mod summary;

pub use aia::AiaCompiler;
pub use orchestrator::AssessmentOrchestrator;
pub use session::{AssessmentCommand, AssessmentSession, SessionOutcome};
pub use summary::{AssessmentSummary, PrincipleScore};
