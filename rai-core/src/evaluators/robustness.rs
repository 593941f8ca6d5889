//! Robustness: failure modes, monitoring and operational resilience.

use super::keywords::{HIGH_RELIABILITY_SECTORS, sector_in};
use super::rules::Rule;
use super::{EvaluationContext, Evaluator, RecommendationBlocks};
use crate::model::profile::DEFAULT_VERSION;
use crate::model::{
    AiSystemType, LifecyclePhase, Principle, RemediationEffort, Severity, SystemProfile,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct RobustnessEvaluator;

fn no_limitations(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.known_limitations.is_empty()
}

fn unmonitored_production(p: &SystemProfile, ctx: &EvaluationContext) -> bool {
    matches!(
        p.current_phase,
        LifecyclePhase::Deployment | LifecyclePhase::OperationMonitoring
    ) && !ctx.monitoring_configured
}

fn initial_version(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.version == DEFAULT_VERSION
}

fn demanding_type(p: &SystemProfile, _: &EvaluationContext) -> bool {
    matches!(
        p.system_type,
        AiSystemType::Autonomous | AiSystemType::Generative
    )
}

fn high_risk(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.is_high_risk_eu_ai_act
}

fn deployed_without_assessment(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.deployment_date.is_some() && p.last_assessment_date.is_none()
}

fn reliability_sector(p: &SystemProfile, _: &EvaluationContext) -> bool {
    sector_in(p, HIGH_RELIABILITY_SECTORS)
}

static RULES: &[Rule] = &[
    Rule::new(
        "001",
        "documentation",
        Severity::High,
        0.20,
        RemediationEffort::Medium,
        "No known limitations documented - critical for understanding failure modes",
        "Document known limitations, failure modes, and edge cases",
        no_limitations,
    )
    .weakness("Failure modes not documented")
    .strength(|p| {
        Some(format!(
            "{} limitations documented",
            p.known_limitations.len()
        ))
    }),
    Rule::new(
        "002",
        "operations",
        Severity::High,
        0.20,
        RemediationEffort::Medium,
        "System in production phase without confirmed monitoring",
        "Implement comprehensive monitoring for performance, drift, and errors",
        unmonitored_production,
    )
    .weakness("Monitoring status not confirmed for production system"),
    Rule::new(
        "003",
        "operations",
        Severity::Low,
        0.05,
        RemediationEffort::Low,
        "Version appears to be initial - verify version control and rollback capabilities",
        "Implement semantic versioning with documented change history and rollback procedures",
        initial_version,
    ),
    Rule::new(
        "004",
        "risk",
        Severity::Medium,
        0.10,
        RemediationEffort::High,
        "{system_type} systems require enhanced robustness measures",
        "Implement comprehensive testing including adversarial inputs and edge cases",
        demanding_type,
    ),
    Rule::new(
        "005",
        "compliance",
        Severity::Medium,
        0.10,
        RemediationEffort::High,
        "High-risk system must meet EU AI Act accuracy and robustness requirements",
        "Document performance metrics and implement continuous performance monitoring per Article 15",
        high_risk,
    ),
    Rule::new(
        "006",
        "operations",
        Severity::Medium,
        0.15,
        RemediationEffort::Medium,
        "Deployed system without recorded assessment - may indicate drift",
        "Establish regular assessment schedule to detect performance degradation",
        deployed_without_assessment,
    )
    .weakness("No recorded post-deployment assessment"),
    // Informational only.
    Rule::new(
        "007",
        "compliance",
        Severity::Low,
        0.0,
        RemediationEffort::Medium,
        "{sector} sector typically has strict availability requirements",
        "Review sector-specific reliability standards and SLA requirements",
        reliability_sector,
    )
    .noted("Operating in {sector} - high reliability expected"),
];

const BLOCKS: RecommendationBlocks = RecommendationBlocks {
    below_0_7: &[
        "Implement data and concept drift monitoring with automated alerts",
        "Establish performance baselines and degradation thresholds",
        "Create comprehensive test suite including edge cases and adversarial inputs",
        "Document and test fallback procedures for system failures",
    ],
    below_0_5: &[
        "Conduct chaos engineering exercises to test system resilience",
        "Implement automated performance regression testing in CI/CD",
        "Establish SLAs with clear availability and performance targets",
        "Create runbooks for common failure scenarios",
    ],
};

impl Evaluator for RobustnessEvaluator {
    fn principle(&self) -> Principle {
        Principle::Robustness
    }

    fn name(&self) -> &'static str {
        "RobustnessEvaluator"
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }

    fn confidence(&self) -> f64 {
        0.70
    }

    fn methodology(&self) -> &'static str {
        "Profile analysis + operational checklist"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &["Full robustness assessment requires performance testing data"]
    }

    fn recommendation_blocks(&self) -> RecommendationBlocks {
        BLOCKS
    }

    fn advisory_focus(&self) -> &'static [&'static str] {
        &[
            "Failure modes and edge cases",
            "Performance monitoring and drift detection",
            "Fallback and recovery procedures",
            "Testing coverage",
            "Operational resilience",
        ]
    }
}
