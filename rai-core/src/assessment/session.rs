//! Interactive assessment session.
//!
//! Holds the state an assessment workflow accumulates across commands. A
//! command whose inputs are not yet available yields
//! `SessionOutcome::NotReady` instead of an error.

use super::orchestrator::AssessmentOrchestrator;
use super::summary::AssessmentSummary;
use crate::error::RaiError;
use crate::lifecycle::{EvidenceStore, LifecycleTracker};
use crate::model::{
    AiaReport, LifecyclePhase, LifecycleStatus, PhaseTransition, Principle, PrincipleEvaluation,
    RiskAssessment, SystemProfile,
};
use std::sync::Arc;
use tracing::{debug, info};

/// A request issued against a session.
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentCommand {
    FullAssessment,
    Principle(Principle),
    Aia,
    LifecycleStatus,
    VerifyCheckpoints,
    Transition {
        to: LifecyclePhase,
        authorized_by: String,
    },
    Summary,
}

impl AssessmentCommand {
    fn label(&self) -> &'static str {
        match self {
            AssessmentCommand::FullAssessment => "full assessment",
            AssessmentCommand::Principle(_) => "principle evaluation",
            AssessmentCommand::Aia => "AIA",
            AssessmentCommand::LifecycleStatus => "lifecycle status",
            AssessmentCommand::VerifyCheckpoints => "checkpoint verification",
            AssessmentCommand::Transition { .. } => "phase transition",
            AssessmentCommand::Summary => "summary",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Evaluated(Vec<PrincipleEvaluation>),
    Report(Box<AiaReport>),
    Lifecycle(Box<LifecycleStatus>),
    Transitioned(PhaseTransition),
    Summary(AssessmentSummary),
    /// A precondition is unmet; the message says what is missing.
    NotReady(String),
}

pub struct AssessmentSession {
    pub system_profile: Option<SystemProfile>,
    pub lifecycle_status: Option<LifecycleStatus>,
    pub principle_evaluations: Vec<PrincipleEvaluation>,
    pub aia_report: Option<AiaReport>,
    pub risk_assessment: Option<RiskAssessment>,
    pub evidence: EvidenceStore,
    /// Commands executed so far.
    pub turns: usize,
    orchestrator: Arc<AssessmentOrchestrator>,
    tracker: LifecycleTracker,
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new(Arc::new(AssessmentOrchestrator::default()))
    }
}

impl AssessmentSession {
    pub fn new(orchestrator: Arc<AssessmentOrchestrator>) -> Self {
        Self {
            system_profile: None,
            lifecycle_status: None,
            principle_evaluations: Vec::new(),
            aia_report: None,
            risk_assessment: None,
            evidence: EvidenceStore::default(),
            turns: 0,
            orchestrator,
            tracker: LifecycleTracker::default(),
        }
    }

    pub fn with_tracker(mut self, tracker: LifecycleTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_profile(mut self, profile: SystemProfile) -> Self {
        self.set_profile(profile);
        self
    }

    pub fn with_evidence(mut self, evidence: EvidenceStore) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn with_risk_assessment(mut self, risk: RiskAssessment) -> Self {
        self.risk_assessment = Some(risk);
        self
    }

    /// Replace the profile and discard results derived from the old one.
    pub fn set_profile(&mut self, profile: SystemProfile) {
        self.system_profile = Some(profile);
        self.lifecycle_status = None;
        self.principle_evaluations.clear();
        self.aia_report = None;
    }

    pub async fn execute(&mut self, command: AssessmentCommand) -> Result<SessionOutcome, RaiError> {
        self.turns += 1;
        debug!(turn = self.turns, command = command.label(), "Executing session command");

        let Some(profile) = self.system_profile.clone() else {
            if command == AssessmentCommand::Summary {
                return Ok(self.summary());
            }
            return Ok(SessionOutcome::NotReady(format!(
                "No system profile in session. Set a system profile before running {}.",
                command.label()
            )));
        };

        let outcome = match command {
            AssessmentCommand::FullAssessment => {
                let evaluations = self.orchestrator.run_assessment(&profile, &[]).await;
                self.principle_evaluations = evaluations.clone();
                self.compile_report(&profile)
            }
            AssessmentCommand::Principle(principle) => {
                let evaluation = self
                    .orchestrator
                    .evaluate_principle(&profile, principle)
                    .await?;
                self.principle_evaluations
                    .retain(|e| e.principle != principle);
                self.principle_evaluations.push(evaluation.clone());
                self.principle_evaluations.sort_by_key(|e| e.principle);
                SessionOutcome::Evaluated(vec![evaluation])
            }
            AssessmentCommand::Aia => self.compile_report(&profile),
            AssessmentCommand::LifecycleStatus => {
                let status = self.lifecycle_for(&profile).clone();
                SessionOutcome::Lifecycle(Box::new(status))
            }
            AssessmentCommand::VerifyCheckpoints => {
                let current = self.lifecycle_for(&profile).clone();
                let verified = self.tracker.verify_all(&current, &self.evidence);
                self.lifecycle_status = Some(verified.clone());
                SessionOutcome::Lifecycle(Box::new(verified))
            }
            AssessmentCommand::Transition { to, authorized_by } => {
                let tracker = self.tracker.clone();
                let status = self.lifecycle_for(&profile);
                let transition = tracker.transition(status, to, &authorized_by)?;
                if let Some(profile) = self.system_profile.as_mut() {
                    profile.current_phase = to;
                }
                SessionOutcome::Transitioned(transition)
            }
            AssessmentCommand::Summary => self.summary(),
        };

        info!(turn = self.turns, system_id = %profile.system_id, "Session command complete");
        Ok(outcome)
    }

    fn compile_report(&mut self, profile: &SystemProfile) -> SessionOutcome {
        let report = self.orchestrator.run_aia(
            profile,
            self.principle_evaluations.clone(),
            self.risk_assessment.clone(),
        );
        self.aia_report = Some(report.clone());
        SessionOutcome::Report(Box::new(report))
    }

    fn lifecycle_for(&mut self, profile: &SystemProfile) -> &mut LifecycleStatus {
        let tracker = &self.tracker;
        self.lifecycle_status
            .get_or_insert_with(|| tracker.initialize(profile))
    }

    fn summary(&self) -> SessionOutcome {
        match AssessmentSummary::from_evaluations(&self.principle_evaluations) {
            Some(summary) => match &self.aia_report {
                Some(report) => {
                    SessionOutcome::Summary(summary.with_aia_recommendation(report.overall_recommendation))
                }
                None => SessionOutcome::Summary(summary),
            },
            None => SessionOutcome::NotReady(
                "No evaluations completed. Run an assessment first.".to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LifecycleError;
    use crate::model::{AiSystemType, AiaRecommendation};

    fn profile() -> SystemProfile {
        let mut p = SystemProfile::new(
            "sys-7",
            "Demand Forecaster",
            "Forecasts weekly demand for inventory planning",
            AiSystemType::Regression,
            "Supply Chain",
        )
        .with_phase(LifecyclePhase::ValidationVerification);
        p.operators = vec!["Planners".into()];
        p
    }

    #[tokio::test]
    async fn test_commands_without_profile_are_not_ready() {
        let mut session = AssessmentSession::default();
        for command in [
            AssessmentCommand::FullAssessment,
            AssessmentCommand::Aia,
            AssessmentCommand::LifecycleStatus,
            AssessmentCommand::Summary,
        ] {
            let outcome = session.execute(command).await.unwrap();
            assert!(matches!(outcome, SessionOutcome::NotReady(_)));
        }
        assert_eq!(session.turns, 4);
    }

    #[tokio::test]
    async fn test_principle_then_aia_then_summary() {
        let mut session = AssessmentSession::default().with_profile(profile());

        let outcome = session
            .execute(AssessmentCommand::Principle(Principle::Security))
            .await
            .unwrap();
        assert!(matches!(outcome, SessionOutcome::Evaluated(ref v) if v.len() == 1));

        // re-running replaces rather than duplicates
        session
            .execute(AssessmentCommand::Principle(Principle::Security))
            .await
            .unwrap();
        assert_eq!(session.principle_evaluations.len(), 1);

        let SessionOutcome::Report(report) = session.execute(AssessmentCommand::Aia).await.unwrap()
        else {
            panic!("expected report");
        };
        assert_eq!(report.principle_evaluations.len(), 1);
        assert!(session.aia_report.is_some());

        let SessionOutcome::Summary(summary) =
            session.execute(AssessmentCommand::Summary).await.unwrap()
        else {
            panic!("expected summary");
        };
        assert_eq!(summary.principle_scores.len(), 1);
        assert_eq!(
            summary.aia_recommendation,
            Some(report.overall_recommendation)
        );
    }

    #[tokio::test]
    async fn test_full_assessment_stores_results() {
        let mut session = AssessmentSession::default().with_profile(profile());
        let outcome = session
            .execute(AssessmentCommand::FullAssessment)
            .await
            .unwrap();
        let SessionOutcome::Report(report) = outcome else {
            panic!("expected report");
        };
        assert_eq!(session.principle_evaluations.len(), 6);
        assert_ne!(
            report.overall_recommendation,
            AiaRecommendation::RequiresFurtherAssessment
        );
    }

    #[tokio::test]
    async fn test_lifecycle_flow_updates_profile_phase() {
        let evidence = EvidenceStore::new()
            .with("validation_report", "v.pdf")
            .with("fairness_metrics", "f.csv")
            .with("evidence_VV-001-C1", true)
            .with("evidence_VV-001-C2", true)
            .with("evidence_VV-001-C3", true);
        let mut session = AssessmentSession::default()
            .with_profile(profile())
            .with_evidence(evidence);

        let SessionOutcome::Lifecycle(status) = session
            .execute(AssessmentCommand::VerifyCheckpoints)
            .await
            .unwrap()
        else {
            panic!("expected lifecycle status");
        };
        assert!(status.ready_for_next_phase);

        let SessionOutcome::Transitioned(transition) = session
            .execute(AssessmentCommand::Transition {
                to: LifecyclePhase::Deployment,
                authorized_by: "Release Board".into(),
            })
            .await
            .unwrap()
        else {
            panic!("expected transition");
        };
        assert_eq!(transition.checkpoints_verified, vec!["VV-001".to_string()]);
        assert_eq!(
            session.system_profile.as_ref().map(|p| p.current_phase),
            Some(LifecyclePhase::Deployment)
        );
        assert_eq!(
            session.lifecycle_status.as_ref().map(|s| s.current_phase),
            Some(LifecyclePhase::Deployment)
        );
    }

    #[tokio::test]
    async fn test_transition_from_shutdown_is_error() {
        let mut session = AssessmentSession::default()
            .with_profile(profile().with_phase(LifecyclePhase::Shutdown));
        let err = session
            .execute(AssessmentCommand::Transition {
                to: LifecyclePhase::Deployment,
                authorized_by: "x".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RaiError::Lifecycle(LifecycleError::TerminalPhase { .. })
        ));
    }
}
