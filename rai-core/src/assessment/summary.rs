//! Roll-up summary of a set of principle evaluations.

use crate::model::{
    AiaRecommendation, ComplianceStatus, Principle, PrincipleEvaluation, Severity, mean_score,
};
use serde::{Deserialize, Serialize};

/// Maximum number of priority recommendations listed.
pub const MAX_PRIORITY_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipleScore {
    pub principle: Principle,
    pub score: f64,
    pub status: ComplianceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub overall_score: f64,
    pub status: ComplianceStatus,
    pub lowest_principle: Principle,
    pub lowest_score: f64,
    pub critical_findings: usize,
    pub high_findings: usize,
    pub principle_scores: Vec<PrincipleScore>,
    /// `"[SEVERITY] <recommendation>"` for urgent findings.
    pub priority_recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aia_recommendation: Option<AiaRecommendation>,
}

impl AssessmentSummary {
    /// `None` when there is nothing to summarize.
    pub fn from_evaluations(evaluations: &[PrincipleEvaluation]) -> Option<Self> {
        let overall_score = mean_score(evaluations)?;
        let lowest = evaluations
            .iter()
            .min_by(|a, b| a.score.total_cmp(&b.score))?;

        let count = |severity| {
            evaluations
                .iter()
                .map(|e| e.count_severity(severity))
                .sum::<usize>()
        };

        let priority_recommendations = evaluations
            .iter()
            .flat_map(|e| e.findings.iter())
            .filter(|f| f.severity.is_urgent())
            .take(MAX_PRIORITY_RECOMMENDATIONS)
            .map(|f| {
                format!(
                    "[{}] {}",
                    f.severity.as_str().to_uppercase(),
                    f.recommendation
                )
            })
            .collect();

        Some(Self {
            overall_score,
            status: ComplianceStatus::from_score(overall_score),
            lowest_principle: lowest.principle,
            lowest_score: lowest.score,
            critical_findings: count(Severity::Critical),
            high_findings: count(Severity::High),
            principle_scores: evaluations
                .iter()
                .map(|e| PrincipleScore {
                    principle: e.principle,
                    score: e.score,
                    status: e.compliance_status,
                })
                .collect(),
            priority_recommendations,
            aia_recommendation: None,
        })
    }

    pub fn with_aia_recommendation(mut self, recommendation: AiaRecommendation) -> Self {
        self.aia_recommendation = Some(recommendation);
        self
    }

    /// Markdown block suitable for terminal output.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("## Summary\n\n");
        out.push_str(&format!("**Overall Score:** {:.2}/1.00\n", self.overall_score));
        out.push_str(&format!("**Status:** {}\n", self.status.label()));
        out.push_str(&format!(
            "**Lowest Principle:** {} ({:.2})\n\n",
            self.lowest_principle.title(),
            self.lowest_score
        ));
        out.push_str("**Findings:**\n");
        out.push_str(&format!("- Critical: {}\n", self.critical_findings));
        out.push_str(&format!("- High: {}\n", self.high_findings));

        if !self.priority_recommendations.is_empty() {
            out.push_str("\n### Priority Recommendations\n");
            for rec in &self.priority_recommendations {
                out.push_str(&format!("- {rec}\n"));
            }
        }
        if let Some(rec) = self.aia_recommendation {
            out.push_str(&format!("\n**AIA Recommendation:** {}\n", rec.title()));
        }
        out
    }
}
