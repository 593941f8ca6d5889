//! Algorithmic Impact Assessment report structure.

use super::evaluation::PrincipleEvaluation;
use super::finding::Finding;
use super::profile::SystemProfile;
use super::risk::RiskAssessment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall go/no-go outcome of an AIA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiaRecommendation {
    Proceed,
    ProceedWithConditions,
    DoNotProceed,
    RequiresFurtherAssessment,
}

impl AiaRecommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiaRecommendation::Proceed => "proceed",
            AiaRecommendation::ProceedWithConditions => "proceed_with_conditions",
            AiaRecommendation::DoNotProceed => "do_not_proceed",
            AiaRecommendation::RequiresFurtherAssessment => "requires_further_assessment",
        }
    }

    /// Title-cased label, e.g. "Proceed With Conditions".
    pub fn title(&self) -> &'static str {
        match self {
            AiaRecommendation::Proceed => "Proceed",
            AiaRecommendation::ProceedWithConditions => "Proceed With Conditions",
            AiaRecommendation::DoNotProceed => "Do Not Proceed",
            AiaRecommendation::RequiresFurtherAssessment => "Requires Further Assessment",
        }
    }
}

impl std::fmt::Display for AiaRecommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeholderImpact {
    pub stakeholder_group: String,
    pub relationship: String,
    pub positive_impacts: Vec<String>,
    pub negative_impacts: Vec<String>,
    pub impact_magnitude: String,
}

/// Section 1: system context and purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSection {
    pub business_problem: String,
    pub business_justification: String,
    pub intended_use_cases: Vec<String>,
    pub expected_benefits: Vec<String>,
    pub stakeholder_impacts: Vec<StakeholderImpact>,
    pub scope_boundaries: String,
    pub out_of_scope: Vec<String>,
    pub alternatives_considered: Vec<String>,
    pub ai_necessity_justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub name: String,
    pub source_type: String,
    pub description: String,
    pub collection_method: String,
    pub contains_personal_data: bool,
}

/// Section 2: data and model assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataModelSection {
    pub data_sources: Vec<DataSource>,
    pub data_quality_assessment: String,
    pub data_representativeness: String,
    pub model_selection_rationale: String,
    pub model_architecture: String,
    pub training_methodology: String,
    pub validation_approach: String,
    pub known_limitations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactItem {
    pub description: String,
    pub affected_groups: Vec<String>,
    pub magnitude: String,
}

/// Section 3: impact analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSection {
    pub positive_impacts: Vec<ImpactItem>,
    pub negative_impacts: Vec<ImpactItem>,
    pub unintended_consequences: Vec<String>,
    pub disproportionate_impacts: Vec<String>,
    pub equity_analysis: String,
}

/// Section 4: risk mitigation measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMitigationSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,
    pub technical_safeguards: Vec<String>,
    pub procedural_safeguards: Vec<String>,
    pub human_oversight_mechanisms: Vec<String>,
    pub intervention_points: Vec<String>,
    pub fallback_procedures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRight {
    pub role: String,
    pub responsibilities: Vec<String>,
    pub authority_level: String,
}

/// Section 5: governance and accountability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceSection {
    pub accountability_framework: String,
    pub decision_rights: Vec<DecisionRight>,
    pub escalation_procedures: String,
    pub audit_mechanisms: Vec<String>,
    pub incident_response_plan: String,
    pub documentation_requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub name: String,
    pub target: String,
    pub frequency: String,
}

/// Section 6: ongoing monitoring and review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub performance_metrics: Vec<MetricDefinition>,
    pub fairness_metrics: Vec<MetricDefinition>,
    pub monitoring_frequency: String,
    pub review_schedule: String,
    pub trigger_conditions: Vec<String>,
    pub feedback_mechanisms: Vec<String>,
    pub decommissioning_criteria: Vec<String>,
}

/// The six AIA sections, built together from one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiaSections {
    pub section1_context: ContextSection,
    pub section2_data_model: DataModelSection,
    pub section3_impact: ImpactSection,
    pub section4_risk_mitigation: RiskMitigationSection,
    pub section5_governance: GovernanceSection,
    pub section6_monitoring: MonitoringSection,
}

fn default_report_version() -> String {
    "1.0".to_string()
}

/// Complete Algorithmic Impact Assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiaReport {
    pub report_id: String,
    #[serde(default = "default_report_version")]
    pub version: String,
    pub created_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub system_profile: SystemProfile,
    #[serde(flatten)]
    pub sections: AiaSections,
    #[serde(default)]
    pub principle_evaluations: Vec<PrincipleEvaluation>,
    pub overall_recommendation: AiaRecommendation,
    #[serde(default)]
    pub conditions_for_approval: Vec<String>,
    #[serde(default)]
    pub blocking_issues: Vec<String>,
    pub executive_summary: String,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub assessment_team: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<DateTime<Utc>>,
}

impl AiaReport {
    /// Mean principle score, `0.0` when no evaluations are attached.
    pub fn overall_score(&self) -> f64 {
        mean_score(&self.principle_evaluations).unwrap_or(0.0)
    }

    pub fn all_critical_findings(&self) -> Vec<&Finding> {
        self.principle_evaluations
            .iter()
            .flat_map(|e| e.critical_findings())
            .collect()
    }
}

/// Mean score of a set of evaluations, `None` when empty.
pub fn mean_score(evaluations: &[PrincipleEvaluation]) -> Option<f64> {
    if evaluations.is_empty() {
        return None;
    }
    Some(evaluations.iter().map(|e| e.score).sum::<f64>() / evaluations.len() as f64)
}
