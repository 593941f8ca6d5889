//! Fan-out/fan-in runner for principle evaluators.

use super::aia::AiaCompiler;
use crate::advisory::AdvisoryClient;
use crate::config::RaiConfig;
use crate::error::AssessmentError;
use crate::evaluators::{EvaluationContext, Evaluator, default_evaluators};
use crate::model::{AiaReport, Principle, PrincipleEvaluation, RiskAssessment, SystemProfile};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

const DEFAULT_MAX_CONCURRENT: usize = 6;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Runs evaluators concurrently and compiles AIA reports.
pub struct AssessmentOrchestrator {
    evaluators: Vec<Arc<dyn Evaluator>>,
    context: EvaluationContext,
    compiler: AiaCompiler,
    max_concurrent: usize,
    evaluator_timeout: Duration,
}

impl Default for AssessmentOrchestrator {
    fn default() -> Self {
        Self::new(EvaluationContext::default())
    }
}

impl AssessmentOrchestrator {
    pub fn new(context: EvaluationContext) -> Self {
        Self {
            evaluators: default_evaluators(),
            context,
            compiler: AiaCompiler::new(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            evaluator_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &RaiConfig, advisory: Option<AdvisoryClient>) -> Self {
        Self::new(EvaluationContext::from_config(config, advisory))
            .with_max_concurrent(config.assessment.max_concurrent_evaluators)
            .with_timeout(Duration::from_secs(config.assessment.evaluator_timeout_secs))
    }

    /// Replace the registered evaluators.
    pub fn with_evaluators(mut self, evaluators: Vec<Arc<dyn Evaluator>>) -> Self {
        self.evaluators = evaluators;
        self
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.evaluator_timeout = timeout;
        self
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }

    /// Principles that have a registered evaluator.
    pub fn principles(&self) -> Vec<Principle> {
        self.evaluators.iter().map(|e| e.principle()).collect()
    }

    /// Evaluate the selected principles, or all of them when `principles` is empty.
    ///
    /// An evaluator that exceeds the timeout while waiting on advisory
    /// commentary is re-run without it. Evaluators that panic, or time out
    /// on their own, are logged and left out.
    /// Results come back in canonical principle order.
    pub async fn run_assessment(
        &self,
        profile: &SystemProfile,
        principles: &[Principle],
    ) -> Vec<PrincipleEvaluation> {
        let start = Instant::now();
        let profile = Arc::new(profile.clone());
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::new();

        for evaluator in &self.evaluators {
            let principle = evaluator.principle();
            if !principles.is_empty() && !principles.contains(&principle) {
                continue;
            }
            let evaluator = evaluator.clone();
            let profile = profile.clone();
            let ctx = self.context.clone();
            let sem = semaphore.clone();
            let timeout = self.evaluator_timeout;

            let handle = tokio::spawn(async move {
                let Ok(_permit) = sem.acquire().await else {
                    return None;
                };
                if let Ok(evaluation) =
                    tokio::time::timeout(timeout, evaluator.evaluate(&profile, &ctx)).await
                {
                    return Some(evaluation);
                }
                if ctx.advisory.is_none() {
                    warn!(
                        principle = %principle,
                        timeout_secs = timeout.as_secs_f64(),
                        "Evaluator timed out"
                    );
                    return None;
                }

                // Slow commentary must not cost the rule-based result.
                warn!(
                    principle = %principle,
                    timeout_secs = timeout.as_secs_f64(),
                    "Evaluator timed out; retrying without advisory commentary"
                );
                let rules_only = EvaluationContext {
                    advisory: None,
                    ..ctx
                };
                match tokio::time::timeout(timeout, evaluator.evaluate(&profile, &rules_only)).await
                {
                    Ok(evaluation) => Some(evaluation),
                    Err(_) => {
                        warn!(
                            principle = %principle,
                            timeout_secs = timeout.as_secs_f64(),
                            "Evaluator timed out"
                        );
                        None
                    }
                }
            });
            handles.push((principle, handle));
        }

        let mut evaluations = Vec::new();
        for (principle, handle) in handles {
            match handle.await {
                Ok(Some(evaluation)) => evaluations.push(evaluation),
                Ok(None) => {}
                Err(e) => warn!(principle = %principle, error = %e, "Evaluator task failed"),
            }
        }
        evaluations.sort_by_key(|e| e.principle);

        info!(
            system_id = %profile.system_id,
            evaluations = evaluations.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Assessment complete"
        );
        evaluations
    }

    /// Evaluate one principle.
    pub async fn evaluate_principle(
        &self,
        profile: &SystemProfile,
        principle: Principle,
    ) -> Result<PrincipleEvaluation, AssessmentError> {
        if !self.evaluators.iter().any(|e| e.principle() == principle) {
            return Err(AssessmentError::EvaluatorFailed {
                principle: principle.to_string(),
                message: "no evaluator registered".to_string(),
            });
        }
        self.run_assessment(profile, &[principle])
            .await
            .into_iter()
            .next()
            .ok_or_else(|| AssessmentError::EvaluatorFailed {
                principle: principle.to_string(),
                message: format!(
                    "evaluator did not complete within {}s",
                    self.evaluator_timeout.as_secs()
                ),
            })
    }

    /// Compile an AIA from evaluations already collected.
    pub fn run_aia(
        &self,
        profile: &SystemProfile,
        evaluations: Vec<PrincipleEvaluation>,
        risk: Option<RiskAssessment>,
    ) -> AiaReport {
        debug!(system_id = %profile.system_id, "Compiling AIA");
        self.compiler.compile(profile, evaluations, risk)
    }

    /// Evaluate every principle and compile the AIA.
    pub async fn run_full_assessment(&self, profile: &SystemProfile) -> AiaReport {
        let evaluations = self.run_assessment(profile, &[]).await;
        self.run_aia(profile, evaluations, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::{
        AccountabilityEvaluator, RecommendationBlocks, Rule, SecurityEvaluator,
    };
    use crate::advisory::MockAdvisoryProvider;
    use crate::model::{AiSystemType, AiaRecommendation};
    use async_trait::async_trait;

    fn profile() -> SystemProfile {
        SystemProfile::new(
            "sys-1",
            "Chat Assistant",
            "General purpose assistant",
            AiSystemType::Generative,
            "Platform",
        )
    }

    struct SlowEvaluator;

    #[async_trait]
    impl Evaluator for SlowEvaluator {
        fn principle(&self) -> Principle {
            Principle::Robustness
        }
        fn name(&self) -> &'static str {
            "SlowEvaluator"
        }
        fn rules(&self) -> &'static [Rule] {
            &[]
        }
        fn confidence(&self) -> f64 {
            0.5
        }
        fn methodology(&self) -> &'static str {
            "sleeps"
        }
        fn recommendation_blocks(&self) -> RecommendationBlocks {
            RecommendationBlocks {
                below_0_7: &[],
                below_0_5: &[],
            }
        }
        fn advisory_focus(&self) -> &'static [&'static str] {
            &[]
        }
        async fn evaluate(
            &self,
            _profile: &SystemProfile,
            _ctx: &EvaluationContext,
        ) -> PrincipleEvaluation {
            tokio::time::sleep(Duration::from_secs(5)).await;
            unreachable!("timed out before completion")
        }
    }

    struct PanickingEvaluator;

    #[async_trait]
    impl Evaluator for PanickingEvaluator {
        fn principle(&self) -> Principle {
            Principle::Fairness
        }
        fn name(&self) -> &'static str {
            "PanickingEvaluator"
        }
        fn rules(&self) -> &'static [Rule] {
            &[]
        }
        fn confidence(&self) -> f64 {
            0.5
        }
        fn methodology(&self) -> &'static str {
            "panics"
        }
        fn recommendation_blocks(&self) -> RecommendationBlocks {
            RecommendationBlocks {
                below_0_7: &[],
                below_0_5: &[],
            }
        }
        fn advisory_focus(&self) -> &'static [&'static str] {
            &[]
        }
        async fn evaluate(
            &self,
            _profile: &SystemProfile,
            _ctx: &EvaluationContext,
        ) -> PrincipleEvaluation {
            panic!("evaluator bug")
        }
    }

    #[tokio::test]
    async fn test_full_run_is_canonically_ordered() {
        let orchestrator = AssessmentOrchestrator::default().with_max_concurrent(2);
        let evaluations = orchestrator.run_assessment(&profile(), &[]).await;
        let principles: Vec<_> = evaluations.iter().map(|e| e.principle).collect();
        assert_eq!(principles, Principle::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_subset_selection() {
        let orchestrator = AssessmentOrchestrator::default();
        let evaluations = orchestrator
            .run_assessment(&profile(), &[Principle::Alignment, Principle::Security])
            .await;
        let principles: Vec<_> = evaluations.iter().map(|e| e.principle).collect();
        assert_eq!(principles, vec![Principle::Security, Principle::Alignment]);
    }

    #[tokio::test]
    async fn test_failed_evaluators_are_excluded() {
        let orchestrator = AssessmentOrchestrator::default()
            .with_evaluators(vec![
                Arc::new(AccountabilityEvaluator),
                Arc::new(SlowEvaluator),
                Arc::new(PanickingEvaluator),
                Arc::new(SecurityEvaluator),
            ])
            .with_timeout(Duration::from_millis(50));

        let evaluations = orchestrator.run_assessment(&profile(), &[]).await;
        let principles: Vec<_> = evaluations.iter().map(|e| e.principle).collect();
        assert_eq!(principles, vec![Principle::Accountability, Principle::Security]);

        let err = orchestrator
            .evaluate_principle(&profile(), Principle::Robustness)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("did not complete"));

        let err = orchestrator
            .evaluate_principle(&profile(), Principle::Alignment)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no evaluator registered"));
    }

    #[tokio::test]
    async fn test_slow_advisory_keeps_rule_based_evaluations() {
        let provider = MockAdvisoryProvider::new().with_delay(Duration::from_secs(3));
        let ctx = EvaluationContext::new()
            .with_advisory(AdvisoryClient::new(Arc::new(provider), Duration::from_secs(10)));
        let orchestrator =
            AssessmentOrchestrator::new(ctx).with_timeout(Duration::from_millis(100));

        let plain = AssessmentOrchestrator::default()
            .run_full_assessment(&profile())
            .await;
        let report = orchestrator.run_full_assessment(&profile()).await;

        assert_eq!(report.principle_evaluations.len(), 6);
        assert!(
            report
                .principle_evaluations
                .iter()
                .all(|e| e.advisory_commentary.is_none())
        );
        assert_eq!(report.overall_recommendation, plain.overall_recommendation);
        assert_ne!(
            report.overall_recommendation,
            AiaRecommendation::RequiresFurtherAssessment
        );
    }

    #[tokio::test]
    async fn test_full_assessment_report() {
        let report = AssessmentOrchestrator::default()
            .run_full_assessment(&profile())
            .await;
        assert_eq!(report.principle_evaluations.len(), 6);
        assert_eq!(report.system_profile.system_id, "sys-1");
        assert_ne!(
            report.overall_recommendation,
            AiaRecommendation::RequiresFurtherAssessment
        );
        assert!(report.executive_summary.contains("Chat Assistant"));
    }
}
