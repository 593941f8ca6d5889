//! Findings raised by principle evaluators.

use serde::{Deserialize, Serialize};

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// High and critical findings demand action before deployment.
    pub fn is_urgent(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expected effort to remediate a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemediationEffort {
    Low,
    Medium,
    High,
}

impl RemediationEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemediationEffort::Low => "low",
            RemediationEffort::Medium => "medium",
            RemediationEffort::High => "high",
        }
    }
}

impl std::fmt::Display for RemediationEffort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single issue surfaced by a rule check. Always carries a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub finding_id: String,
    pub category: String,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    pub recommendation: String,
    pub remediation_effort: RemediationEffort,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_objective: Option<String>,
}

impl Finding {
    pub fn new(
        finding_id: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        recommendation: impl Into<String>,
        remediation_effort: RemediationEffort,
    ) -> Self {
        Self {
            finding_id: finding_id.into(),
            category: category.into(),
            severity,
            description: description.into(),
            evidence: None,
            recommendation: recommendation.into(),
            remediation_effort,
            affected_objective: None,
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    pub fn with_affected_objective(mut self, objective: impl Into<String>) -> Self {
        self.affected_objective = Some(objective.into());
        self
    }
}
