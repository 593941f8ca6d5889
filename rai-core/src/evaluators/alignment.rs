//! Alignment: human oversight, use boundaries and ethical fit.

use super::keywords::{DECISION_TERMS, ETHICALLY_SENSITIVE_SECTORS, contains_any, sector_in};
use super::rules::Rule;
use super::{EvaluationContext, Evaluator, RecommendationBlocks};
use crate::model::{AiSystemType, Principle, RemediationEffort, Severity, SystemProfile};

#[derive(Debug, Clone, Copy, Default)]
pub struct AlignmentEvaluator;

fn no_prohibited_uses(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.prohibited_uses.is_empty()
}

fn no_affected_populations(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.affected_populations.is_empty()
}

fn autonomous(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.system_type == AiSystemType::Autonomous
}

fn generative(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.system_type == AiSystemType::Generative
}

fn high_risk(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.is_high_risk_eu_ai_act
}

fn decides_about_individuals(p: &SystemProfile, _: &EvaluationContext) -> bool {
    matches!(
        p.system_type,
        AiSystemType::Classification | AiSystemType::Recommendation
    ) && contains_any(&p.description, DECISION_TERMS)
}

fn ethically_sensitive_sector(p: &SystemProfile, _: &EvaluationContext) -> bool {
    sector_in(p, ETHICALLY_SENSITIVE_SECTORS)
}

fn no_use_cases(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.use_cases.is_empty()
}

static RULES: &[Rule] = &[
    Rule::new(
        "001",
        "governance",
        Severity::Medium,
        0.15,
        RemediationEffort::Low,
        "No prohibited uses defined for the system",
        "Define and document prohibited uses to prevent misuse and establish boundaries",
        no_prohibited_uses,
    )
    .weakness("No use restrictions documented")
    .strength(|p| Some(format!("{} prohibited uses defined", p.prohibited_uses.len()))),
    Rule::new(
        "002",
        "human_centered",
        Severity::High,
        0.20,
        RemediationEffort::Medium,
        "No affected populations identified - limits human-centered design",
        "Identify affected populations and consider their needs in design and operation",
        no_affected_populations,
    )
    .weakness("Human-centered design not evident without stakeholder identification")
    .strength(|_| Some("Affected populations identified for human-centered design".to_string())),
    Rule::new(
        "003",
        "oversight",
        Severity::Critical,
        0.25,
        RemediationEffort::High,
        "Autonomous system requires robust human oversight mechanisms",
        "Implement human-on-the-loop supervision with ability to intervene, stop, or override",
        autonomous,
    )
    .weakness("Autonomous operation increases alignment risk"),
    Rule::new(
        "004",
        "alignment",
        Severity::High,
        0.15,
        RemediationEffort::High,
        "Generative AI has unique alignment challenges (hallucination, harmful content)",
        "Implement content filtering, output validation, and user feedback mechanisms",
        generative,
    ),
    Rule::new(
        "005",
        "compliance",
        Severity::High,
        0.10,
        RemediationEffort::High,
        "EU AI Act requires human oversight for high-risk AI systems",
        "Implement human oversight measures per Article 14, including ability to override AI decisions",
        high_risk,
    ),
    Rule::new(
        "006",
        "ethics",
        Severity::Medium,
        0.10,
        RemediationEffort::Medium,
        "System appears to make decisions affecting individuals",
        "Ensure affected individuals have right to explanation, appeal, and human review",
        decides_about_individuals,
    ),
    Rule::new(
        "007",
        "ethics",
        Severity::High,
        0.10,
        RemediationEffort::High,
        "{sector} sector has heightened ethical implications",
        "Review sector-specific ethical guidelines and implement enhanced oversight",
        ethically_sensitive_sector,
    )
    .weakness("Sensitive sector ({sector}) requires careful ethical review"),
    Rule::new(
        "008",
        "alignment",
        Severity::Low,
        0.05,
        RemediationEffort::Low,
        "Intended use cases not documented",
        "Document intended use cases to ensure system use aligns with intended purpose",
        no_use_cases,
    )
    .strength(|p| {
        Some(format!(
            "{} intended use cases documented for alignment",
            p.use_cases.len()
        ))
    }),
];

const BLOCKS: RecommendationBlocks = RecommendationBlocks {
    below_0_7: &[
        "Implement human-in-the-loop for high-stakes decisions",
        "Establish ethics review board or committee for AI decisions",
        "Create user feedback mechanism for continuous alignment improvement",
        "Document and communicate AI limitations to all stakeholders",
    ],
    below_0_5: &[
        "Conduct comprehensive ethical impact assessment with diverse stakeholders",
        "Implement kill switch or pause mechanism for autonomous operations",
        "Engage ethics experts and affected community representatives",
        "Establish regular alignment audits with external review",
    ],
};

impl Evaluator for AlignmentEvaluator {
    fn principle(&self) -> Principle {
        Principle::Alignment
    }

    fn name(&self) -> &'static str {
        "AlignmentEvaluator"
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }

    fn confidence(&self) -> f64 {
        0.75
    }

    fn methodology(&self) -> &'static str {
        "Profile analysis + ethical considerations checklist"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &["Full alignment assessment requires stakeholder engagement and ethical review"]
    }

    fn recommendation_blocks(&self) -> RecommendationBlocks {
        BLOCKS
    }

    fn advisory_focus(&self) -> &'static [&'static str] {
        &[
            "Human oversight and control",
            "Value alignment with stakeholders",
            "Use boundaries and misuse prevention",
            "Ethical review processes",
            "Societal impact",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComplianceStatus, RiskLevel};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_empty_autonomous_high_risk_profile() {
        let p = SystemProfile::new("s", "Y", "Y", AiSystemType::Autonomous, "X")
            .with_high_risk(true)
            .with_risk_level(RiskLevel::Low);
        let eval = AlignmentEvaluator.evaluate(&p, &EvaluationContext::new()).await;

        let ids: Vec<_> = eval.findings.iter().map(|f| f.finding_id.as_str()).collect();
        for expected in ["ALI-001", "ALI-002", "ALI-003", "ALI-005"] {
            assert!(ids.contains(&expected), "missing {expected}");
        }
        // 0.15 + 0.20 + 0.25 + 0.10 + 0.05
        assert!((eval.score - 0.25).abs() < 1e-9);
        assert_eq!(eval.compliance_status, ComplianceStatus::NonCompliant);
        assert_eq!(eval.critical_findings().len(), 1);
        assert_eq!(eval.long_term_improvements.len(), 8);
    }

    #[tokio::test]
    async fn test_generative_then_autonomous_in_sensitive_sector() {
        let p = SystemProfile::new(
            "s",
            "n",
            "Generates a hiring decision score",
            AiSystemType::Generative,
            "o",
        )
        .with_high_risk(true)
        .with_industry_sector("employment");
        let eval = AlignmentEvaluator.evaluate(&p, &EvaluationContext::new()).await;
        // generative: decision rule and autonomy rule do not apply
        assert_eq!(eval.findings.len(), 6);
        assert!((eval.score - 0.25).abs() < 1e-9);

        let mut p = p;
        p.system_type = AiSystemType::Autonomous;
        let eval = AlignmentEvaluator.evaluate(&p, &EvaluationContext::new()).await;
        assert!((eval.score - 0.15).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_decision_language_on_classifier() {
        let mut p = SystemProfile::new(
            "s",
            "n",
            "Produces an eligibility Decision for each application",
            AiSystemType::Classification,
            "o",
        );
        p.prohibited_uses = vec!["Surveillance".into()];
        p.affected_populations = vec!["Applicants".into()];
        p.use_cases = vec!["Eligibility".into(), "Triage".into()];
        let eval = AlignmentEvaluator.evaluate(&p, &EvaluationContext::new()).await;
        assert_eq!(eval.findings.len(), 1);
        assert_eq!(eval.findings[0].finding_id, "ALI-006");
        assert_eq!(
            eval.strengths,
            vec![
                "1 prohibited uses defined".to_string(),
                "Affected populations identified for human-centered design".to_string(),
                "2 intended use cases documented for alignment".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_sector_weakness_rendered() {
        let mut p = SystemProfile::new("s", "n", "d", AiSystemType::Regression, "o")
            .with_industry_sector("healthcare");
        p.prohibited_uses = vec!["x".into()];
        p.affected_populations = vec!["y".into()];
        p.use_cases = vec!["z".into()];
        let eval = AlignmentEvaluator.evaluate(&p, &EvaluationContext::new()).await;
        assert_eq!(
            eval.weaknesses,
            vec!["Sensitive sector (healthcare) requires careful ethical review".to_string()]
        );
    }
}
