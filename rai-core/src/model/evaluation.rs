//! Principle evaluations: the scored output of one evaluator.

use super::finding::{Finding, Severity};
use crate::error::AssessmentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score at or above which a principle is compliant.
pub const COMPLIANT_THRESHOLD: f64 = 0.9;
/// Score at or above which a principle is partially compliant.
pub const PARTIAL_THRESHOLD: f64 = 0.6;

/// The six responsible-AI principles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Principle {
    Accountability,
    Transparency,
    Fairness,
    Security,
    Robustness,
    Alignment,
}

impl Principle {
    /// Canonical ordering used when presenting results.
    pub const ALL: [Principle; 6] = [
        Principle::Accountability,
        Principle::Transparency,
        Principle::Fairness,
        Principle::Security,
        Principle::Robustness,
        Principle::Alignment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Principle::Accountability => "accountability",
            Principle::Transparency => "transparency",
            Principle::Fairness => "fairness",
            Principle::Security => "security",
            Principle::Robustness => "robustness",
            Principle::Alignment => "alignment",
        }
    }

    /// Three-letter prefix used in evaluation and finding ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Principle::Accountability => "ACC",
            Principle::Transparency => "TRA",
            Principle::Fairness => "FAI",
            Principle::Security => "SEC",
            Principle::Robustness => "ROB",
            Principle::Alignment => "ALI",
        }
    }

    /// Capitalized name for display.
    pub fn title(&self) -> &'static str {
        match self {
            Principle::Accountability => "Accountability",
            Principle::Transparency => "Transparency",
            Principle::Fairness => "Fairness",
            Principle::Security => "Security",
            Principle::Robustness => "Robustness",
            Principle::Alignment => "Alignment",
        }
    }

    fn valid_names() -> String {
        Principle::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Principle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Principle {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Principle::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| AssessmentError::UnknownPrinciple {
                name: s.to_string(),
                valid: Principle::valid_names(),
            })
    }
}

/// Compliance tier derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    PartiallyCompliant,
    NonCompliant,
    NotAssessed,
}

impl ComplianceStatus {
    /// `≥ 0.9` compliant, `≥ 0.6` partially compliant, otherwise non-compliant.
    pub fn from_score(score: f64) -> Self {
        if score >= COMPLIANT_THRESHOLD {
            ComplianceStatus::Compliant
        } else if score >= PARTIAL_THRESHOLD {
            ComplianceStatus::PartiallyCompliant
        } else {
            ComplianceStatus::NonCompliant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::PartiallyCompliant => "partially_compliant",
            ComplianceStatus::NonCompliant => "non_compliant",
            ComplianceStatus::NotAssessed => "not_assessed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::PartiallyCompliant => "Partially Compliant",
            ComplianceStatus::NonCompliant => "Non-Compliant",
            ComplianceStatus::NotAssessed => "Not Assessed",
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_confidence() -> f64 {
    0.8
}

/// Output of one evaluator for one principle. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipleEvaluation {
    pub evaluation_id: String,
    pub principle: Principle,
    pub evaluation_date: DateTime<Utc>,
    pub evaluator_agent: String,
    pub compliance_status: ComplianceStatus,
    /// Always within `[0.0, 1.0]`.
    pub score: f64,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub immediate_actions: Vec<String>,
    #[serde(default)]
    pub long_term_improvements: Vec<String>,
    #[serde(default)]
    pub artifacts_reviewed: Vec<String>,
    #[serde(default)]
    pub metrics_collected: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub methodology: String,
    #[serde(default)]
    pub limitations: Vec<String>,
    /// Free-text reply from the advisory provider. Never affects the score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory_commentary: Option<String>,
}

impl PrincipleEvaluation {
    pub fn critical_findings(&self) -> Vec<&Finding> {
        self.findings_with(Severity::Critical)
    }

    pub fn findings_with(&self, severity: Severity) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .collect()
    }

    pub fn count_severity(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(ComplianceStatus::from_score(0.95), ComplianceStatus::Compliant);
        assert_eq!(ComplianceStatus::from_score(0.9), ComplianceStatus::Compliant);
        assert_eq!(
            ComplianceStatus::from_score(0.75),
            ComplianceStatus::PartiallyCompliant
        );
        assert_eq!(
            ComplianceStatus::from_score(0.6),
            ComplianceStatus::PartiallyCompliant
        );
        assert_eq!(ComplianceStatus::from_score(0.40), ComplianceStatus::NonCompliant);
        assert_eq!(ComplianceStatus::from_score(0.0), ComplianceStatus::NonCompliant);
    }

    #[test]
    fn test_principle_parse() {
        assert_eq!("Fairness".parse::<Principle>().unwrap(), Principle::Fairness);
        let err = "privacy".parse::<Principle>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unknown principle: privacy"));
        assert!(msg.contains("alignment"));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ComplianceStatus::PartiallyCompliant).unwrap();
        assert_eq!(json, "\"partially_compliant\"");
    }

    #[test]
    fn test_principle_prefixes_unique() {
        let mut prefixes: Vec<_> = Principle::ALL.iter().map(|p| p.id_prefix()).collect();
        prefixes.sort();
        prefixes.dedup();
        assert_eq!(prefixes.len(), 6);
    }
}
