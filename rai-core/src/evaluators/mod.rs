//! Principle evaluators.
//!
//! Each evaluator is a pure function of a read-only `SystemProfile`: it runs
//! its rule table, derives a bounded score and compliance status, and may
//! attach advisory commentary when an `AdvisoryClient` is supplied. The
//! advisory call is the only suspension point and never affects the score.

pub mod accountability;
pub mod alignment;
pub mod fairness;
pub mod keywords;
pub mod robustness;
pub mod rules;
pub mod security;
pub mod transparency;

use crate::advisory::AdvisoryClient;
use crate::config::RaiConfig;
use crate::model::{ComplianceStatus, Finding, Principle, PrincipleEvaluation, SystemProfile};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

pub use accountability::AccountabilityEvaluator;
pub use alignment::AlignmentEvaluator;
pub use fairness::FairnessEvaluator;
pub use robustness::RobustnessEvaluator;
pub use rules::{Rule, RuleOutcome, apply_rules};
pub use security::SecurityEvaluator;
pub use transparency::TransparencyEvaluator;

/// Score below which the first block of generic recommendations is added.
pub const FIRST_BLOCK_THRESHOLD: f64 = 0.7;
/// Score below which the second block is added as well.
pub const SECOND_BLOCK_THRESHOLD: f64 = 0.5;

/// Inputs an evaluator may consult besides the profile.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    /// Whether production monitoring has been confirmed for the system.
    pub monitoring_configured: bool,
    pub advisory: Option<AdvisoryClient>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_monitoring(mut self, configured: bool) -> Self {
        self.monitoring_configured = configured;
        self
    }

    pub fn with_advisory(mut self, client: AdvisoryClient) -> Self {
        self.advisory = Some(client);
        self
    }

    /// Build a context from configuration, attaching the given client.
    pub fn from_config(config: &RaiConfig, advisory: Option<AdvisoryClient>) -> Self {
        Self {
            monitoring_configured: config.assessment.monitoring_configured,
            advisory,
        }
    }
}

/// The two severity-gated blocks of generic recommendations for a principle.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationBlocks {
    pub below_0_7: &'static [&'static str],
    pub below_0_5: &'static [&'static str],
}

impl RecommendationBlocks {
    /// Generic recommendations that apply at the given score.
    pub fn for_score(&self, score: f64) -> Vec<String> {
        let mut out = Vec::new();
        if score < FIRST_BLOCK_THRESHOLD {
            out.extend(self.below_0_7.iter().map(|s| s.to_string()));
        }
        if score < SECOND_BLOCK_THRESHOLD {
            out.extend(self.below_0_5.iter().map(|s| s.to_string()));
        }
        out
    }
}

/// A scoring procedure for one responsible-AI principle.
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn principle(&self) -> Principle;

    /// Name recorded as `evaluator_agent`.
    fn name(&self) -> &'static str;

    /// Ordered check table.
    fn rules(&self) -> &'static [Rule];

    fn confidence(&self) -> f64;

    fn methodology(&self) -> &'static str;

    fn limitations(&self) -> &'static [&'static str] {
        &[]
    }

    fn recommendation_blocks(&self) -> RecommendationBlocks;

    /// Gap areas listed in the advisory prompt.
    fn advisory_focus(&self) -> &'static [&'static str];

    fn system_prompt(&self) -> String {
        format!(
            "You are a responsible AI assessor specializing in {}. \
             Identify concrete gaps and remediation steps. Be concise.",
            self.principle().as_str()
        )
    }

    fn collect_metrics(&self, _profile: &SystemProfile) -> BTreeMap<String, Value> {
        BTreeMap::new()
    }

    /// Text recorded in `recommendations` for one finding.
    fn recommendation_for(&self, finding: &Finding) -> String {
        finding.recommendation.clone()
    }

    /// Finding recommendations in order, then the severity-gated blocks.
    fn generate_recommendations(&self, evaluation: &PrincipleEvaluation) -> Vec<String> {
        let mut recommendations: Vec<String> = evaluation
            .findings
            .iter()
            .map(|f| self.recommendation_for(f))
            .collect();
        recommendations.extend(self.recommendation_blocks().for_score(evaluation.score));
        recommendations
    }

    async fn evaluate(
        &self,
        profile: &SystemProfile,
        ctx: &EvaluationContext,
    ) -> PrincipleEvaluation {
        let principle = self.principle();
        let outcome = apply_rules(principle, self.rules(), profile, ctx);

        let advisory_commentary = match &ctx.advisory {
            Some(client) => {
                let prompt = advisory_prompt(principle, self.advisory_focus(), profile);
                client.advise(&self.system_prompt(), &prompt).await
            }
            None => None,
        };

        let score = outcome.score;
        let mut evaluation = PrincipleEvaluation {
            evaluation_id: evaluation_id(principle),
            principle,
            evaluation_date: Utc::now(),
            evaluator_agent: self.name().to_string(),
            compliance_status: ComplianceStatus::from_score(score),
            score,
            confidence: self.confidence(),
            findings: outcome.findings,
            strengths: outcome.strengths,
            weaknesses: outcome.weaknesses,
            recommendations: Vec::new(),
            immediate_actions: Vec::new(),
            long_term_improvements: Vec::new(),
            artifacts_reviewed: vec!["system_profile".to_string()],
            metrics_collected: self.collect_metrics(profile),
            methodology: self.methodology().to_string(),
            limitations: self.limitations().iter().map(|s| s.to_string()).collect(),
            advisory_commentary,
        };

        evaluation.recommendations = self.generate_recommendations(&evaluation);
        evaluation.immediate_actions = evaluation
            .findings
            .iter()
            .filter(|f| f.severity.is_urgent())
            .map(|f| f.recommendation.clone())
            .collect();
        evaluation.long_term_improvements = self.recommendation_blocks().for_score(score);

        info!(
            principle = %principle,
            system_id = %profile.system_id,
            score,
            status = %evaluation.compliance_status,
            findings = evaluation.findings.len(),
            "Principle evaluation complete"
        );

        evaluation
    }
}

/// `"{PREFIX}-{8 hex}"`.
pub fn evaluation_id(principle: Principle) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", principle.id_prefix(), &uuid[..8])
}

/// User turn sent to the advisory provider.
pub fn advisory_prompt(principle: Principle, focus: &[&str], profile: &SystemProfile) -> String {
    let limitations = if profile.known_limitations.is_empty() {
        "None documented".to_string()
    } else {
        profile.known_limitations.join(", ")
    };
    let focus = focus
        .iter()
        .enumerate()
        .map(|(i, area)| format!("{}. {}", i + 1, area))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze this AI system for {principle} gaps:\n\n\
         System: {name}\n\
         Description: {description}\n\
         Owner: {owner}\n\
         Risk Level: {risk}\n\
         System Type: {system_type}\n\
         Current Phase: {phase}\n\
         Is High-Risk (EU AI Act): {high_risk}\n\
         Applicable Regulations: {regulations}\n\
         Affected Populations: {populations}\n\
         Known Limitations: {limitations}\n\n\
         Identify specific gaps in:\n{focus}\n\n\
         For each gap, provide:\n\
         - Category\n\
         - Severity (low/medium/high/critical)\n\
         - Specific recommendation\n\n\
         Be concise and specific.",
        principle = principle.as_str(),
        name = profile.name,
        description = profile.description,
        owner = profile.owner,
        risk = profile.risk_level,
        system_type = profile.system_type,
        phase = profile.current_phase,
        high_risk = profile.is_high_risk_eu_ai_act,
        regulations = profile.applicable_regulations.join(", "),
        populations = profile.affected_populations.join(", "),
        limitations = limitations,
        focus = focus,
    )
}

/// One evaluator per principle, in canonical order.
pub fn default_evaluators() -> Vec<Arc<dyn Evaluator>> {
    vec![
        Arc::new(AccountabilityEvaluator),
        Arc::new(TransparencyEvaluator),
        Arc::new(FairnessEvaluator),
        Arc::new(SecurityEvaluator),
        Arc::new(RobustnessEvaluator),
        Arc::new(AlignmentEvaluator),
    ]
}

/// The evaluator for a single principle.
pub fn evaluator_for(principle: Principle) -> Arc<dyn Evaluator> {
    match principle {
        Principle::Accountability => Arc::new(AccountabilityEvaluator),
        Principle::Transparency => Arc::new(TransparencyEvaluator),
        Principle::Fairness => Arc::new(FairnessEvaluator),
        Principle::Security => Arc::new(SecurityEvaluator),
        Principle::Robustness => Arc::new(RobustnessEvaluator),
        Principle::Alignment => Arc::new(AlignmentEvaluator),
    }
}
