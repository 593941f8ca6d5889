//! AIA compiler: turns a profile and principle evaluations into an
//! `AiaReport` with six templated sections and an overall recommendation.

use crate::model::aia::{
    ContextSection, DataModelSection, DataSource, DecisionRight, GovernanceSection, ImpactItem,
    ImpactSection, MetricDefinition, MonitoringSection, RiskMitigationSection, StakeholderImpact,
};
use crate::model::{
    AiaRecommendation, AiaReport, AiaSections, PrincipleEvaluation, RiskAssessment, RiskLevel,
    Severity, SystemProfile, mean_score,
};
use chrono::Utc;
use tracing::info;

/// Average at or above which a system may proceed unconditionally.
pub const PROCEED_AVERAGE: f64 = 0.8;
/// Lowest principle score allowed for an unconditional proceed.
pub const PROCEED_MINIMUM: f64 = 0.6;
/// Average at or above which a system may proceed with conditions.
pub const CONDITIONAL_AVERAGE: f64 = 0.5;
/// Any principle below this blocks the system.
pub const BLOCKING_MINIMUM: f64 = 0.3;
/// Principles below this score get an explicit approval condition.
pub const CONDITION_SCORE: f64 = 0.7;
pub const MAX_CONDITIONS: usize = 5;
pub const MAX_KEY_FINDINGS: usize = 10;

/// Overall recommendation from a set of principle evaluations.
pub fn determine_recommendation(evaluations: &[PrincipleEvaluation]) -> AiaRecommendation {
    let Some(avg) = mean_score(evaluations) else {
        return AiaRecommendation::RequiresFurtherAssessment;
    };
    let min = evaluations
        .iter()
        .map(|e| e.score)
        .fold(f64::INFINITY, f64::min);
    let critical = evaluations
        .iter()
        .map(|e| e.count_severity(Severity::Critical))
        .sum::<usize>();

    if critical > 0 || min < BLOCKING_MINIMUM {
        AiaRecommendation::DoNotProceed
    } else if avg >= PROCEED_AVERAGE && min >= PROCEED_MINIMUM {
        AiaRecommendation::Proceed
    } else if avg >= CONDITIONAL_AVERAGE {
        AiaRecommendation::ProceedWithConditions
    } else {
        AiaRecommendation::RequiresFurtherAssessment
    }
}

/// Conditions attached to a conditional approval, at most five.
pub fn conditions_for_approval(evaluations: &[PrincipleEvaluation]) -> Vec<String> {
    let mut conditions = Vec::new();
    for evaluation in evaluations {
        if evaluation.score < CONDITION_SCORE {
            conditions.push(format!(
                "Address {} gaps before deployment",
                evaluation.principle
            ));
        }
        conditions.extend(
            evaluation
                .findings
                .iter()
                .filter(|f| f.severity.is_urgent())
                .map(|f| f.recommendation.clone()),
        );
    }
    conditions.truncate(MAX_CONDITIONS);
    conditions
}

/// Issues that justify a do-not-proceed outcome.
pub fn blocking_issues(evaluations: &[PrincipleEvaluation]) -> Vec<String> {
    let mut issues = Vec::new();
    for evaluation in evaluations {
        for finding in evaluation.critical_findings() {
            issues.push(format!(
                "[{}] {}",
                evaluation.principle.title(),
                finding.description
            ));
        }
        if evaluation.score < BLOCKING_MINIMUM {
            issues.push(format!(
                "{} score {:.2} is below the minimum of {:.2}",
                evaluation.principle.title(),
                evaluation.score,
                BLOCKING_MINIMUM
            ));
        }
    }
    issues
}

/// High and critical finding descriptions, prefixed with their principle.
pub fn key_findings(evaluations: &[PrincipleEvaluation]) -> Vec<String> {
    evaluations
        .iter()
        .flat_map(|e| {
            e.findings
                .iter()
                .filter(|f| f.severity.is_urgent())
                .map(move |f| format!("{}: {}", e.principle.title(), f.description))
        })
        .take(MAX_KEY_FINDINGS)
        .collect()
}

pub fn executive_summary(
    profile: &SystemProfile,
    evaluations: &[PrincipleEvaluation],
    recommendation: AiaRecommendation,
) -> String {
    let score_text = match mean_score(evaluations) {
        Some(avg) => format!("Overall RAI score: {avg:.2}/1.00"),
        None => "RAI evaluation pending".to_string(),
    };
    format!(
        "This Algorithmic Impact Assessment evaluates {}, a {} system classified as {} risk. \
         {}. Recommendation: {}.",
        profile.name,
        profile.system_type,
        profile.risk_level,
        score_text,
        recommendation.title()
    )
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn context_section(profile: &SystemProfile) -> ContextSection {
    let stakeholder_impacts = profile
        .affected_populations
        .iter()
        .map(|group| StakeholderImpact {
            stakeholder_group: group.clone(),
            relationship: "subject".to_string(),
            positive_impacts: strings(&["Potential benefit from AI-assisted decisions"]),
            negative_impacts: strings(&["Potential for biased or incorrect decisions"]),
            impact_magnitude: "moderate".to_string(),
        })
        .collect();

    ContextSection {
        business_problem: profile.description.clone(),
        business_justification: format!("AI solution for: {}", profile.description),
        intended_use_cases: if profile.use_cases.is_empty() {
            strings(&["Not specified"])
        } else {
            profile.use_cases.clone()
        },
        expected_benefits: strings(&[
            "Improved efficiency",
            "Consistent decision-making",
            "Scalability",
        ]),
        stakeholder_impacts,
        scope_boundaries: format!("System type: {}", profile.system_type),
        out_of_scope: profile.prohibited_uses.clone(),
        alternatives_considered: strings(&["Manual process", "Rule-based system"]),
        ai_necessity_justification: "AI enables automated processing at scale".to_string(),
    }
}

pub fn data_model_section(profile: &SystemProfile) -> DataModelSection {
    let data_sources = profile
        .training_data()
        .into_iter()
        .map(|description| DataSource {
            name: "Training Data".to_string(),
            source_type: "structured".to_string(),
            description: description.to_string(),
            collection_method: "Not specified".to_string(),
            contains_personal_data: false,
        })
        .collect();
    let architecture = profile.architecture().unwrap_or("Not specified").to_string();

    DataModelSection {
        data_sources,
        data_quality_assessment: "Requires detailed data profiling".to_string(),
        data_representativeness: "Requires population comparison".to_string(),
        model_selection_rationale: format!(
            "Selected {}",
            profile.architecture().unwrap_or("model type not specified")
        ),
        model_architecture: architecture,
        training_methodology: "To be documented".to_string(),
        validation_approach: "To be documented".to_string(),
        known_limitations: profile.known_limitations.clone(),
    }
}

pub fn impact_section(profile: &SystemProfile) -> ImpactSection {
    let populations = profile.affected_populations.clone();
    let error_magnitude = if profile.risk_level >= RiskLevel::High {
        "high"
    } else {
        "moderate"
    };

    let mut negative_impacts = vec![ImpactItem {
        description: "Potential for automated errors affecting individuals".to_string(),
        affected_groups: populations.clone(),
        magnitude: error_magnitude.to_string(),
    }];
    if profile.is_high_risk_eu_ai_act {
        negative_impacts.push(ImpactItem {
            description: "High-risk system may significantly impact fundamental rights"
                .to_string(),
            affected_groups: populations.clone(),
            magnitude: "high".to_string(),
        });
    }

    ImpactSection {
        positive_impacts: vec![
            ImpactItem {
                description: "Efficiency improvements in processing".to_string(),
                affected_groups: strings(&["operators", "organization"]),
                magnitude: "moderate".to_string(),
            },
            ImpactItem {
                description: "Consistency in decision-making".to_string(),
                affected_groups: populations,
                magnitude: "moderate".to_string(),
            },
        ],
        negative_impacts,
        unintended_consequences: strings(&[
            "Automation bias in operators",
            "Over-reliance on AI decisions",
        ]),
        disproportionate_impacts: strings(&["Requires fairness analysis"]),
        equity_analysis: "Requires detailed equity assessment".to_string(),
    }
}

pub fn risk_mitigation_section(risk: Option<RiskAssessment>) -> RiskMitigationSection {
    RiskMitigationSection {
        risk_assessment: risk,
        technical_safeguards: strings(&["Input validation", "Output monitoring", "Access controls"]),
        procedural_safeguards: strings(&["Regular audits", "Incident response procedures"]),
        human_oversight_mechanisms: strings(&[
            "Human review for high-stakes decisions",
            "Override capabilities",
        ]),
        intervention_points: strings(&["Pre-deployment approval", "Flagged decision review"]),
        fallback_procedures: strings(&["Manual processing fallback", "Graceful degradation"]),
    }
}

pub fn governance_section(profile: &SystemProfile) -> GovernanceSection {
    GovernanceSection {
        accountability_framework: format!("Owner: {}", profile.owner),
        decision_rights: vec![
            DecisionRight {
                role: "System Owner".to_string(),
                responsibilities: strings(&["Overall accountability", "Approval of changes"]),
                authority_level: "High".to_string(),
            },
            DecisionRight {
                role: "Operations Team".to_string(),
                responsibilities: strings(&["Day-to-day operation", "Incident response"]),
                authority_level: "Medium".to_string(),
            },
        ],
        escalation_procedures: "To be documented".to_string(),
        audit_mechanisms: strings(&["Decision logging", "Version control"]),
        incident_response_plan: "To be developed".to_string(),
        documentation_requirements: strings(&["Model documentation", "Change logs", "Audit records"]),
    }
}

fn metric(name: &str, target: &str, frequency: &str) -> MetricDefinition {
    MetricDefinition {
        name: name.to_string(),
        target: target.to_string(),
        frequency: frequency.to_string(),
    }
}

pub fn monitoring_section() -> MonitoringSection {
    MonitoringSection {
        performance_metrics: vec![
            metric("Accuracy", ">=90%", "Daily"),
            metric("Latency", "<500ms p95", "Real-time"),
        ],
        fairness_metrics: vec![metric("Demographic Parity", "Within 80% rule", "Weekly")],
        monitoring_frequency: "Continuous for critical metrics".to_string(),
        review_schedule: "Quarterly comprehensive review".to_string(),
        trigger_conditions: strings(&[
            "Performance degradation >10%",
            "Fairness metric violation",
            "Significant model update",
            "Regulatory change",
        ]),
        feedback_mechanisms: strings(&["User feedback form", "Operator reports"]),
        decommissioning_criteria: strings(&[
            "Performance below acceptable threshold",
            "Regulatory non-compliance",
            "Replacement by improved system",
        ]),
    }
}

/// Build all six sections. No scoring happens here.
pub fn build_sections(profile: &SystemProfile, risk: Option<RiskAssessment>) -> AiaSections {
    AiaSections {
        section1_context: context_section(profile),
        section2_data_model: data_model_section(profile),
        section3_impact: impact_section(profile),
        section4_risk_mitigation: risk_mitigation_section(risk),
        section5_governance: governance_section(profile),
        section6_monitoring: monitoring_section(),
    }
}

/// Assembles `AiaReport`s.
#[derive(Debug, Clone)]
pub struct AiaCompiler {
    name: String,
}

impl Default for AiaCompiler {
    fn default() -> Self {
        Self {
            name: "AiaCompiler".to_string(),
        }
    }
}

impl AiaCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(
        &self,
        profile: &SystemProfile,
        evaluations: Vec<PrincipleEvaluation>,
        risk: Option<RiskAssessment>,
    ) -> AiaReport {
        let recommendation = determine_recommendation(&evaluations);
        let conditions = if recommendation == AiaRecommendation::ProceedWithConditions {
            conditions_for_approval(&evaluations)
        } else {
            Vec::new()
        };
        let blocking = if recommendation == AiaRecommendation::DoNotProceed {
            blocking_issues(&evaluations)
        } else {
            Vec::new()
        };
        let now = Utc::now();

        let report = AiaReport {
            report_id: uuid::Uuid::new_v4().to_string(),
            version: "1.0".to_string(),
            created_date: now,
            last_updated: now,
            system_profile: profile.clone(),
            sections: build_sections(profile, risk),
            executive_summary: executive_summary(profile, &evaluations, recommendation),
            key_findings: key_findings(&evaluations),
            principle_evaluations: evaluations,
            overall_recommendation: recommendation,
            conditions_for_approval: conditions,
            blocking_issues: blocking,
            assessment_team: vec![self.name.clone()],
            approved_by: None,
            approval_date: None,
        };

        info!(
            system_id = %profile.system_id,
            report_id = %report.report_id,
            recommendation = %report.overall_recommendation,
            evaluations = report.principle_evaluations.len(),
            "AIA report compiled"
        );
        report
    }
}
