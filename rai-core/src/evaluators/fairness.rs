//! Fairness: stakeholder coverage, data representativeness and bias controls.

use super::keywords::{FAIRNESS_SENSITIVE_SECTORS, FAIRNESS_TERMS, any_contains, sector_in};
use super::rules::Rule;
use super::{EvaluationContext, Evaluator, RecommendationBlocks};
use crate::model::{AiSystemType, Principle, RemediationEffort, RiskLevel, Severity, SystemProfile};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct FairnessEvaluator;

fn no_affected_populations(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.affected_populations.is_empty()
}

fn no_training_data(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.training_data().is_none()
}

fn fairness_prone_type_rated_low(p: &SystemProfile, _: &EvaluationContext) -> bool {
    matches!(
        p.system_type,
        AiSystemType::Classification | AiSystemType::Recommendation | AiSystemType::Nlp
    ) && p.risk_level == RiskLevel::Low
}

fn limitations_ignore_fairness(p: &SystemProfile, _: &EvaluationContext) -> bool {
    !p.known_limitations.is_empty() && !any_contains(&p.known_limitations, FAIRNESS_TERMS)
}

fn high_risk(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.is_high_risk_eu_ai_act
}

fn sensitive_sector(p: &SystemProfile, _: &EvaluationContext) -> bool {
    sector_in(p, FAIRNESS_SENSITIVE_SECTORS)
}

static RULES: &[Rule] = &[
    Rule::new(
        "001",
        "equity",
        Severity::High,
        0.25,
        RemediationEffort::Medium,
        "Affected populations not identified - cannot assess fairness across groups",
        "Conduct stakeholder analysis to identify all affected groups including vulnerable populations",
        no_affected_populations,
    )
    .weakness("No affected populations identified for fairness analysis")
    .strength(|p| {
        Some(format!(
            "{} affected groups identified",
            p.affected_populations.len()
        ))
    }),
    Rule::new(
        "002",
        "data_quality",
        Severity::High,
        0.20,
        RemediationEffort::Medium,
        "Training data not documented - cannot assess data representativeness",
        "Document training data sources, demographics, and collection methodology",
        no_training_data,
    )
    .weakness("Cannot assess data representativeness without documentation")
    .strength(|_| Some("Training data sources documented".to_string())),
    Rule::new(
        "003",
        "risk_assessment",
        Severity::Medium,
        0.10,
        RemediationEffort::Low,
        "{system_type} systems often have fairness implications - verify risk assessment",
        "Review risk classification considering fairness implications for affected groups",
        fairness_prone_type_rated_low,
    ),
    Rule::new(
        "004",
        "documentation",
        Severity::Medium,
        0.10,
        RemediationEffort::Low,
        "Known limitations don't address fairness concerns",
        "Document any known fairness limitations or bias risks",
        limitations_ignore_fairness,
    )
    .strength(|p| {
        any_contains(&p.known_limitations, FAIRNESS_TERMS)
            .then(|| "Fairness considerations documented in limitations".to_string())
    }),
    Rule::new(
        "005",
        "compliance",
        Severity::Medium,
        0.10,
        RemediationEffort::High,
        "High-risk system requires formal bias testing and fairness metrics",
        "Implement systematic fairness testing with documented metrics and thresholds",
        high_risk,
    )
    .weakness("High-risk system needs enhanced fairness verification"),
    Rule::new(
        "006",
        "compliance",
        Severity::High,
        0.10,
        RemediationEffort::High,
        "{sector} sector has heightened fairness requirements",
        "Review sector-specific anti-discrimination regulations and implement appropriate controls",
        sensitive_sector,
    ),
];

const BLOCKS: RecommendationBlocks = RecommendationBlocks {
    below_0_7: &[
        "Implement fairness metrics monitoring (demographic parity, equalized odds)",
        "Conduct regular bias audits with diverse testing teams",
        "Review data collection processes for sampling bias",
        "Establish fairness thresholds and automated alerts",
    ],
    below_0_5: &[
        "Engage external fairness audit from qualified third party",
        "Implement bias mitigation techniques (re-sampling, re-weighting, adversarial debiasing)",
        "Create fairness review board with diverse representation",
        "Develop remediation process for identified bias issues",
    ],
};

impl Evaluator for FairnessEvaluator {
    fn principle(&self) -> Principle {
        Principle::Fairness
    }

    fn name(&self) -> &'static str {
        "FairnessEvaluator"
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }

    fn confidence(&self) -> f64 {
        0.75
    }

    fn methodology(&self) -> &'static str {
        "Profile analysis + bias detection tools (when available)"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &["Full bias analysis requires access to training data and model outputs"]
    }

    fn recommendation_blocks(&self) -> RecommendationBlocks {
        BLOCKS
    }

    fn advisory_focus(&self) -> &'static [&'static str] {
        &[
            "Potential sources of bias",
            "Affected demographic groups",
            "Data representativeness",
            "Fairness metrics and thresholds",
            "Disparate impact risks",
        ]
    }

    fn collect_metrics(&self, profile: &SystemProfile) -> BTreeMap<String, Value> {
        let mut metrics = BTreeMap::new();
        if !profile.affected_populations.is_empty() {
            metrics.insert(
                "affected_groups_count".to_string(),
                Value::from(profile.affected_populations.len()),
            );
        }
        metrics
    }
}
