//! Risk register: risks, mitigations and the aggregate risk assessment.
//!
//! Risk score and level are always derived from likelihood and impact;
//! neither is stored, so the two can never drift apart.

use super::evaluation::Principle;
use super::profile::RiskLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weight of the single worst risk in the overall level.
const MAX_WEIGHT: f64 = 0.6;
/// Weight of the mean risk score in the overall level.
const MEAN_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Technical,
    Ethical,
    Legal,
    Operational,
    Reputational,
    Safety,
    Privacy,
    Security,
}

/// Five-point likelihood scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Likelihood {
    Rare,
    Unlikely,
    Possible,
    Likely,
    AlmostCertain,
}

impl Likelihood {
    pub fn rank(&self) -> u8 {
        match self {
            Likelihood::Rare => 1,
            Likelihood::Unlikely => 2,
            Likelihood::Possible => 3,
            Likelihood::Likely => 4,
            Likelihood::AlmostCertain => 5,
        }
    }
}

/// Five-point impact scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Negligible,
    Minor,
    Moderate,
    Major,
    Catastrophic,
}

impl Impact {
    pub fn rank(&self) -> u8 {
        match self {
            Impact::Negligible => 1,
            Impact::Minor => 2,
            Impact::Moderate => 3,
            Impact::Major => 4,
            Impact::Catastrophic => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MitigationStrategy {
    Avoid,
    Reduce,
    Transfer,
    Accept,
}

/// An identified risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub risk_id: String,
    pub title: String,
    pub description: String,
    pub category: RiskCategory,
    pub likelihood: Likelihood,
    pub impact: Impact,
    #[serde(default)]
    pub affected_principles: Vec<Principle>,
    #[serde(default)]
    pub affected_stakeholders: Vec<String>,
    #[serde(default)]
    pub existing_controls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_effectiveness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_likelihood: Option<Likelihood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_impact: Option<Impact>,
}

impl Risk {
    pub fn new(
        risk_id: impl Into<String>,
        title: impl Into<String>,
        category: RiskCategory,
        likelihood: Likelihood,
        impact: Impact,
    ) -> Self {
        Self {
            risk_id: risk_id.into(),
            title: title.into(),
            description: String::new(),
            category,
            likelihood,
            impact,
            affected_principles: Vec::new(),
            affected_stakeholders: Vec::new(),
            existing_controls: Vec::new(),
            control_effectiveness: None,
            residual_likelihood: None,
            residual_impact: None,
        }
    }

    /// `likelihood × impact`, in 1..=25.
    pub fn risk_score(&self) -> u8 {
        self.likelihood.rank() * self.impact.rank()
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score() as f64)
    }

    /// Score after controls, when both residual ratings are known.
    pub fn residual_risk_score(&self) -> Option<u8> {
        match (self.residual_likelihood, self.residual_impact) {
            (Some(l), Some(i)) => Some(l.rank() * i.rank()),
            _ => None,
        }
    }
}

fn default_effectiveness() -> f64 {
    0.5
}

fn default_status() -> String {
    "planned".to_string()
}

/// A planned response to one or more risks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mitigation {
    pub mitigation_id: String,
    pub risk_ids: Vec<String>,
    pub strategy: MitigationStrategy,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub implementation_steps: Vec<String>,
    #[serde(default)]
    pub responsible_party: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default)]
    pub resources_required: Vec<String>,
    #[serde(default = "default_effectiveness")]
    pub effectiveness_estimate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
}

/// Aggregate risk register for one system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub assessment_id: String,
    pub system_id: String,
    #[serde(default = "Utc::now")]
    pub assessment_date: DateTime<Utc>,
    #[serde(default)]
    pub assessor: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub methodology: String,
    #[serde(default)]
    pub identified_risks: Vec<Risk>,
    #[serde(default)]
    pub mitigations: Vec<Mitigation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_appetite_alignment: Option<String>,
    #[serde(default)]
    pub priority_risks: Vec<String>,
    #[serde(default)]
    pub monitoring_recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<DateTime<Utc>>,
}

impl RiskAssessment {
    pub fn new(assessment_id: impl Into<String>, system_id: impl Into<String>) -> Self {
        Self {
            assessment_id: assessment_id.into(),
            system_id: system_id.into(),
            assessment_date: Utc::now(),
            assessor: String::new(),
            scope: String::new(),
            methodology: String::new(),
            identified_risks: Vec::new(),
            mitigations: Vec::new(),
            risk_appetite_alignment: None,
            priority_risks: Vec::new(),
            monitoring_recommendations: Vec::new(),
            approved_by: None,
            approval_date: None,
        }
    }

    pub fn with_risk(mut self, risk: Risk) -> Self {
        self.identified_risks.push(risk);
        self
    }

    pub fn with_mitigation(mut self, mitigation: Mitigation) -> Self {
        self.mitigations.push(mitigation);
        self
    }

    /// Risks whose level is high or critical.
    pub fn high_risks(&self) -> Vec<&Risk> {
        self.identified_risks
            .iter()
            .filter(|r| r.risk_level() >= RiskLevel::High)
            .collect()
    }

    /// Risks not referenced by any mitigation.
    pub fn unmitigated_risks(&self) -> Vec<&Risk> {
        self.identified_risks
            .iter()
            .filter(|r| {
                !self
                    .mitigations
                    .iter()
                    .any(|m| m.risk_ids.iter().any(|id| id == &r.risk_id))
            })
            .collect()
    }

    /// Combine the worst and the mean risk score (`0.6·max + 0.4·mean`)
    /// and band the result. An empty register is low risk.
    pub fn calculate_overall_risk_level(&self) -> RiskLevel {
        if self.identified_risks.is_empty() {
            return RiskLevel::Low;
        }
        let scores: Vec<f64> = self
            .identified_risks
            .iter()
            .map(|r| r.risk_score() as f64)
            .collect();
        let max = scores.iter().cloned().fold(f64::MIN, f64::max);
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        RiskLevel::from_score(MAX_WEIGHT * max + MEAN_WEIGHT * mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(id: &str, l: Likelihood, i: Impact) -> Risk {
        Risk::new(id, format!("Risk {id}"), RiskCategory::Technical, l, i)
    }

    #[test]
    fn test_risk_score_banding() {
        let r = risk("R1", Likelihood::Possible, Impact::Major);
        assert_eq!(r.risk_score(), 12);
        assert_eq!(r.risk_level(), RiskLevel::High);

        let r = risk("R2", Likelihood::Rare, Impact::Negligible);
        assert_eq!(r.risk_score(), 1);
        assert_eq!(r.risk_level(), RiskLevel::Low);

        let r = risk("R3", Likelihood::AlmostCertain, Impact::Catastrophic);
        assert_eq!(r.risk_score(), 25);
        assert_eq!(r.risk_level(), RiskLevel::Critical);
    }

    #[test]
    fn test_residual_score_requires_both_ratings() {
        let mut r = risk("R1", Likelihood::Likely, Impact::Major);
        assert_eq!(r.residual_risk_score(), None);
        r.residual_likelihood = Some(Likelihood::Unlikely);
        assert_eq!(r.residual_risk_score(), None);
        r.residual_impact = Some(Impact::Minor);
        assert_eq!(r.residual_risk_score(), Some(4));
    }

    #[test]
    fn test_overall_level_empty_is_low() {
        let assessment = RiskAssessment::new("RA-1", "sys");
        assert_eq!(assessment.calculate_overall_risk_level(), RiskLevel::Low);
    }

    #[test]
    fn test_overall_level_weighted() {
        // max 20, mean (20 + 2) / 2 = 11 -> 0.6*20 + 0.4*11 = 16.4 -> critical
        let assessment = RiskAssessment::new("RA-1", "sys")
            .with_risk(risk("R1", Likelihood::Likely, Impact::Catastrophic))
            .with_risk(risk("R2", Likelihood::Rare, Impact::Minor));
        assert_eq!(assessment.calculate_overall_risk_level(), RiskLevel::Critical);

        // max 6, mean 4 -> 3.6 + 1.6 = 5.2 -> medium
        let assessment = RiskAssessment::new("RA-2", "sys")
            .with_risk(risk("R1", Likelihood::Unlikely, Impact::Moderate))
            .with_risk(risk("R2", Likelihood::Unlikely, Impact::Negligible));
        assert_eq!(assessment.calculate_overall_risk_level(), RiskLevel::Medium);
    }

    #[test]
    fn test_high_and_unmitigated() {
        let assessment = RiskAssessment::new("RA-1", "sys")
            .with_risk(risk("R1", Likelihood::Likely, Impact::Major))
            .with_risk(risk("R2", Likelihood::Rare, Impact::Minor))
            .with_mitigation(Mitigation {
                mitigation_id: "M1".into(),
                risk_ids: vec!["R1".into()],
                strategy: MitigationStrategy::Reduce,
                title: "Add review".into(),
                description: String::new(),
                implementation_steps: Vec::new(),
                responsible_party: "Ops".into(),
                timeline: None,
                resources_required: Vec::new(),
                effectiveness_estimate: 0.5,
                verification_method: None,
                status: "planned".into(),
                completion_date: None,
            });

        let high: Vec<_> = assessment.high_risks().iter().map(|r| r.risk_id.as_str()).collect();
        assert_eq!(high, vec!["R1"]);
        let open: Vec<_> = assessment
            .unmitigated_risks()
            .iter()
            .map(|r| r.risk_id.as_str())
            .collect();
        assert_eq!(open, vec!["R2"]);
    }

    #[test]
    fn test_mitigation_defaults_from_json() {
        let m: Mitigation = serde_json::from_value(serde_json::json!({
            "mitigation_id": "M9",
            "risk_ids": ["R1"],
            "strategy": "transfer",
            "title": "Insurance"
        }))
        .unwrap();
        assert_eq!(m.status, "planned");
        assert!((m.effectiveness_estimate - 0.5).abs() < f64::EPSILON);
    }
}
