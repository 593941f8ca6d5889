//! Security and privacy.

use super::keywords::{
    HIGH_SECURITY_SECTORS, PRIVACY_REGULATION_TERMS, SENSITIVE_DATA_TERMS, any_contains,
    contains_any, sector_in,
};
use super::rules::Rule;
use super::{EvaluationContext, Evaluator, RecommendationBlocks};
use crate::model::{AiSystemType, Principle, RemediationEffort, RiskLevel, Severity, SystemProfile};

#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityEvaluator;

fn has_privacy_regulation(p: &SystemProfile) -> bool {
    any_contains(&p.applicable_regulations, PRIVACY_REGULATION_TERMS)
}

fn processes_data_without_privacy_regulation(p: &SystemProfile, _: &EvaluationContext) -> bool {
    !has_privacy_regulation(p) && !p.input_data_types.is_empty()
}

fn sensitive_input_rated_low(p: &SystemProfile, _: &EvaluationContext) -> bool {
    any_contains(&p.input_data_types, SENSITIVE_DATA_TERMS) && p.risk_level == RiskLevel::Low
}

fn sensitive_training_data(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.training_data()
        .is_some_and(|d| contains_any(d, SENSITIVE_DATA_TERMS))
}

fn high_risk(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.is_high_risk_eu_ai_act
}

fn generative(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.system_type == AiSystemType::Generative
}

fn high_security_sector(p: &SystemProfile, _: &EvaluationContext) -> bool {
    sector_in(p, HIGH_SECURITY_SECTORS)
}

static RULES: &[Rule] = &[
    Rule::new(
        "001",
        "privacy",
        Severity::High,
        0.20,
        RemediationEffort::Medium,
        "No privacy regulations identified for data-processing system",
        "Identify and document applicable privacy regulations (GDPR, LGPD, CCPA, etc.)",
        processes_data_without_privacy_regulation,
    )
    .weakness("Privacy compliance not addressed")
    .strength(|p| {
        has_privacy_regulation(p)
            .then(|| "Privacy regulations identified and documented".to_string())
    }),
    Rule::new(
        "002",
        "risk",
        Severity::High,
        0.20,
        RemediationEffort::Low,
        "System processes sensitive data but classified as low risk",
        "Review risk classification - sensitive data processing typically requires elevated security",
        sensitive_input_rated_low,
    )
    .weakness("Risk classification may underestimate security requirements"),
    Rule::new(
        "003",
        "privacy",
        Severity::Medium,
        0.10,
        RemediationEffort::High,
        "Training data may contain sensitive information",
        "Verify appropriate consent, anonymization, and data protection measures for training data",
        sensitive_training_data,
    ),
    Rule::new(
        "004",
        "compliance",
        Severity::Medium,
        0.10,
        RemediationEffort::High,
        "High-risk system requires enhanced security measures under EU AI Act",
        "Implement cybersecurity measures per EU AI Act Article 15, including resilience to attacks",
        high_risk,
    ),
    Rule::new(
        "005",
        "security",
        Severity::Medium,
        0.10,
        RemediationEffort::High,
        "Generative AI systems have unique security risks (prompt injection, jailbreaking)",
        "Implement input validation, output filtering, and prompt injection defenses",
        generative,
    )
    .weakness("Generative AI security risks require special attention"),
    Rule::new(
        "006",
        "compliance",
        Severity::High,
        0.10,
        RemediationEffort::High,
        "{sector} sector has heightened security requirements",
        "Review and implement sector-specific security frameworks and certifications",
        high_security_sector,
    ),
];

const BLOCKS: RecommendationBlocks = RecommendationBlocks {
    below_0_7: &[
        "Conduct Data Protection Impact Assessment (DPIA)",
        "Implement comprehensive access control with audit logging",
        "Establish incident response plan for AI-specific incidents",
        "Review data retention policies and implement secure deletion",
    ],
    below_0_5: &[
        "Engage security firm for penetration testing of AI system",
        "Implement adversarial robustness testing (red-teaming)",
        "Deploy privacy-enhancing technologies (differential privacy, encryption)",
        "Create security operations playbook for AI system monitoring",
    ],
};

impl Evaluator for SecurityEvaluator {
    fn principle(&self) -> Principle {
        Principle::Security
    }

    fn name(&self) -> &'static str {
        "SecurityEvaluator"
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }

    fn confidence(&self) -> f64 {
        0.75
    }

    fn methodology(&self) -> &'static str {
        "Profile analysis + security checklist"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &["Full security assessment requires technical vulnerability testing"]
    }

    fn recommendation_blocks(&self) -> RecommendationBlocks {
        BLOCKS
    }

    fn advisory_focus(&self) -> &'static [&'static str] {
        &[
            "Data protection and privacy controls",
            "Access control and authentication",
            "Adversarial attack resilience",
            "Incident response readiness",
            "Regulatory privacy obligations",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComplianceStatus;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_no_inputs_means_no_privacy_finding() {
        let p = SystemProfile::new("s", "n", "d", AiSystemType::Regression, "o");
        let eval = SecurityEvaluator.evaluate(&p, &EvaluationContext::new()).await;
        assert!(eval.findings.is_empty());
        assert_eq!(eval.score, 1.0);
        assert_eq!(eval.compliance_status, ComplianceStatus::Compliant);
    }

    #[tokio::test]
    async fn test_sensitive_inputs_rated_low() {
        let mut p = SystemProfile::new("s", "n", "d", AiSystemType::Classification, "o")
            .with_risk_level(RiskLevel::Low);
        p.input_data_types = vec!["Personal Data".into(), "Transaction history".into()];
        p.training_data_description = Some("Customer health records".into());

        let eval = SecurityEvaluator.evaluate(&p, &EvaluationContext::new()).await;
        let ids: Vec<_> = eval.findings.iter().map(|f| f.finding_id.as_str()).collect();
        assert_eq!(ids, vec!["SEC-001", "SEC-002", "SEC-003"]);
        assert_eq!(
            eval.weaknesses,
            vec![
                "Privacy compliance not addressed".to_string(),
                "Risk classification may underestimate security requirements".to_string(),
            ]
        );
        assert!((eval.score - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_privacy_regulation_strength() {
        let mut p = SystemProfile::new("s", "n", "d", AiSystemType::Generative, "o")
            .with_industry_sector("government");
        p.input_data_types = vec!["text".into()];
        p.applicable_regulations = vec!["GDPR".into()];

        let eval = SecurityEvaluator.evaluate(&p, &EvaluationContext::new()).await;
        assert_eq!(
            eval.strengths,
            vec!["Privacy regulations identified and documented".to_string()]
        );
        let ids: Vec<_> = eval.findings.iter().map(|f| f.finding_id.as_str()).collect();
        assert_eq!(ids, vec!["SEC-005", "SEC-006"]);
    }
}
