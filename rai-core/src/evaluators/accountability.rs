//! Accountability: ownership, governance and regulatory documentation.

use super::rules::Rule;
use super::{EvaluationContext, Evaluator, RecommendationBlocks};
use crate::model::{Finding, Principle, RemediationEffort, Severity, SystemProfile};

#[derive(Debug, Clone, Copy, Default)]
pub struct AccountabilityEvaluator;

fn owner_missing(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.owner.trim().is_empty()
}

fn no_operators(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.operators.is_empty()
}

fn high_risk_without_regulations(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.is_high_risk_eu_ai_act && p.applicable_regulations.is_empty()
}

fn no_affected_populations(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.affected_populations.is_empty()
}

fn no_limitations(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.known_limitations.is_empty()
}

fn no_developers(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.developers.is_empty()
}

static RULES: &[Rule] = &[
    Rule::new(
        "001",
        "governance",
        Severity::High,
        0.20,
        RemediationEffort::Low,
        "No system owner defined",
        "Assign a responsible owner for the AI system with clear accountability",
        owner_missing,
    )
    .weakness("Missing designated system owner")
    .objective("Clear ownership")
    .strength(|p| Some(format!("System owner clearly defined: {}", p.owner))),
    Rule::new(
        "002",
        "governance",
        Severity::Medium,
        0.10,
        RemediationEffort::Low,
        "No operators identified for the system",
        "Define operational responsibility and operator roles",
        no_operators,
    )
    .strength(|p| Some(format!("{} operators identified", p.operators.len()))),
    Rule::new(
        "003",
        "compliance",
        Severity::Critical,
        0.30,
        RemediationEffort::Medium,
        "High-risk system under EU AI Act without documented applicable regulations",
        "Document all applicable regulations and establish compliance monitoring",
        high_risk_without_regulations,
    )
    .weakness("Missing regulatory compliance documentation for high-risk system")
    .objective("Regulatory compliance")
    .strength(|p| {
        p.is_high_risk_eu_ai_act
            .then(|| "Applicable regulations documented for high-risk system".to_string())
    }),
    Rule::new(
        "004",
        "impact_assessment",
        Severity::Medium,
        0.15,
        RemediationEffort::Medium,
        "Affected populations not identified",
        "Conduct stakeholder analysis to identify all groups affected by AI decisions",
        no_affected_populations,
    )
    .weakness("No stakeholder impact analysis performed")
    .strength(|p| {
        Some(format!(
            "{} affected population groups identified",
            p.affected_populations.len()
        ))
    }),
    Rule::new(
        "005",
        "transparency",
        Severity::Medium,
        0.10,
        RemediationEffort::Medium,
        "System limitations not documented",
        "Document known limitations and failure modes for transparency",
        no_limitations,
    )
    .strength(|p| {
        Some(format!(
            "{} known limitations documented",
            p.known_limitations.len()
        ))
    }),
    Rule::new(
        "006",
        "governance",
        Severity::Low,
        0.05,
        RemediationEffort::Low,
        "Development team not documented",
        "Document development team for accountability and knowledge transfer",
        no_developers,
    ),
];

const BLOCKS: RecommendationBlocks = RecommendationBlocks {
    below_0_7: &[
        "Establish an AI Governance Board with clear charter and decision authority",
        "Implement comprehensive audit logging for all AI decisions",
        "Create RACI matrix defining responsibilities for AI system lifecycle",
        "Develop incident response plan specific to AI system failures",
    ],
    below_0_5: &[
        "Conduct urgent governance gap assessment with external review",
        "Appoint dedicated AI accountability officer or team",
        "Implement mandatory AIA process for all AI deployments",
    ],
};

impl Evaluator for AccountabilityEvaluator {
    fn principle(&self) -> Principle {
        Principle::Accountability
    }

    fn name(&self) -> &'static str {
        "AccountabilityEvaluator"
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }

    fn confidence(&self) -> f64 {
        0.85
    }

    fn methodology(&self) -> &'static str {
        "Rule-based checks + LLM analysis"
    }

    fn recommendation_blocks(&self) -> RecommendationBlocks {
        BLOCKS
    }

    fn advisory_focus(&self) -> &'static [&'static str] {
        &[
            "Governance structures",
            "Decision-making authority",
            "Audit trail mechanisms",
            "Regulatory compliance measures",
            "Human oversight provisions",
        ]
    }

    fn recommendation_for(&self, finding: &Finding) -> String {
        if finding.severity.is_urgent() {
            format!("[IMMEDIATE] {}", finding.recommendation)
        } else {
            finding.recommendation.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AiSystemType, ComplianceStatus};
    use pretty_assertions::assert_eq;

    fn complete_profile() -> SystemProfile {
        let mut p = SystemProfile::new(
            "sys-1",
            "Claims Triage",
            "Routes insurance claims",
            AiSystemType::Classification,
            "Claims Ops",
        )
        .with_high_risk(true);
        p.operators = vec!["Claims desk".into(), "On-call".into()];
        p.developers = vec!["ML team".into()];
        p.applicable_regulations = vec!["EU AI Act".into()];
        p.affected_populations = vec!["Policy holders".into()];
        p.known_limitations = vec!["Rare claim types".into()];
        p
    }

    #[tokio::test]
    async fn test_complete_profile_is_compliant() {
        let eval = AccountabilityEvaluator
            .evaluate(&complete_profile(), &EvaluationContext::new())
            .await;
        assert_eq!(eval.score, 1.0);
        assert_eq!(eval.compliance_status, ComplianceStatus::Compliant);
        assert!(eval.findings.is_empty());
        assert_eq!(
            eval.strengths,
            vec![
                "System owner clearly defined: Claims Ops".to_string(),
                "2 operators identified".to_string(),
                "Applicable regulations documented for high-risk system".to_string(),
                "1 affected population groups identified".to_string(),
                "1 known limitations documented".to_string(),
            ]
        );
        assert!(eval.recommendations.is_empty());
        assert_eq!(eval.confidence, 0.85);
    }

    #[tokio::test]
    async fn test_empty_high_risk_profile() {
        let p = SystemProfile::new("s", "n", "d", AiSystemType::Other, "").with_high_risk(true);
        let eval = AccountabilityEvaluator
            .evaluate(&p, &EvaluationContext::new())
            .await;

        let ids: Vec<_> = eval.findings.iter().map(|f| f.finding_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["ACC-001", "ACC-002", "ACC-003", "ACC-004", "ACC-005", "ACC-006"]
        );
        assert!((eval.score - 0.1).abs() < 1e-9);
        assert_eq!(eval.compliance_status, ComplianceStatus::NonCompliant);
        assert_eq!(eval.critical_findings().len(), 1);
        assert_eq!(
            eval.findings[2].affected_objective.as_deref(),
            Some("Regulatory compliance")
        );
    }

    #[tokio::test]
    async fn test_urgent_recommendations_are_prefixed() {
        let p = SystemProfile::new("s", "n", "d", AiSystemType::Other, " ");
        let eval = AccountabilityEvaluator
            .evaluate(&p, &EvaluationContext::new())
            .await;
        assert_eq!(
            eval.recommendations[0],
            "[IMMEDIATE] Assign a responsible owner for the AI system with clear accountability"
        );
        assert_eq!(
            eval.recommendations[1],
            "Define operational responsibility and operator roles"
        );
        assert_eq!(
            eval.immediate_actions,
            vec!["Assign a responsible owner for the AI system with clear accountability"]
        );
    }

    #[tokio::test]
    async fn test_generic_blocks_follow_score() {
        // 0.10 + 0.15 + 0.10 + 0.05 deducted
        let p = SystemProfile::new("s", "n", "d", AiSystemType::Other, "owner");
        let eval = AccountabilityEvaluator
            .evaluate(&p, &EvaluationContext::new())
            .await;
        assert!((eval.score - 0.6).abs() < 1e-9);
        assert_eq!(eval.long_term_improvements.len(), 4);
        assert_eq!(eval.recommendations.len(), 4 + 4);
    }
}
