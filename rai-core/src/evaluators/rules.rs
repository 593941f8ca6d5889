//! Data-driven rule tables and the engine that applies them.
//!
//! Each principle declares an ordered table of `Rule`s. A rule that fires
//! adds one finding and subtracts its deduction; a rule that does not fire
//! may contribute a strength. Deductions are summed and the score is
//! clamped to `[0.0, 1.0]` once, at the end.

use super::EvaluationContext;
use crate::model::{Finding, Principle, RemediationEffort, Severity, SystemProfile};
use tracing::debug;

/// Predicate deciding whether a rule fires.
pub type Condition = fn(&SystemProfile, &EvaluationContext) -> bool;

/// Strength text produced when a rule does not fire.
pub type StrengthFn = fn(&SystemProfile) -> Option<String>;

/// One row of a principle's check table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Three-digit check code, unique within the principle.
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub deduction: f64,
    pub effort: RemediationEffort,
    /// May contain `{system_type}` and `{sector}` placeholders.
    pub description: &'static str,
    pub recommendation: &'static str,
    pub weakness: Option<&'static str>,
    pub affected_objective: Option<&'static str>,
    pub applies: Condition,
    pub strength: Option<StrengthFn>,
    /// Strength recorded alongside the finding when the rule fires.
    pub noted_strength: Option<&'static str>,
}

impl Rule {
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        deduction: f64,
        effort: RemediationEffort,
        description: &'static str,
        recommendation: &'static str,
        applies: Condition,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            deduction,
            effort,
            description,
            recommendation,
            weakness: None,
            affected_objective: None,
            applies,
            strength: None,
            noted_strength: None,
        }
    }

    pub const fn weakness(mut self, text: &'static str) -> Self {
        self.weakness = Some(text);
        self
    }

    pub const fn objective(mut self, text: &'static str) -> Self {
        self.affected_objective = Some(text);
        self
    }

    pub const fn strength(mut self, f: StrengthFn) -> Self {
        self.strength = Some(f);
        self
    }

    pub const fn noted(mut self, text: &'static str) -> Self {
        self.noted_strength = Some(text);
        self
    }

    fn to_finding(&self, principle: Principle, profile: &SystemProfile) -> Finding {
        let mut finding = Finding::new(
            format!("{}-{}", principle.id_prefix(), self.code),
            self.category,
            self.severity,
            render(self.description, profile),
            self.recommendation,
            self.effort,
        );
        if let Some(objective) = self.affected_objective {
            finding = finding.with_affected_objective(objective);
        }
        finding
    }
}

/// Result of applying a rule table to a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub findings: Vec<Finding>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Sum of deductions before clamping.
    pub total_deduction: f64,
    /// `1.0 - total_deduction`, clamped to `[0.0, 1.0]`.
    pub score: f64,
}

/// Apply every rule in order.
pub fn apply_rules(
    principle: Principle,
    rules: &[Rule],
    profile: &SystemProfile,
    ctx: &EvaluationContext,
) -> RuleOutcome {
    let mut findings = Vec::new();
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut total_deduction = 0.0;

    for rule in rules {
        if (rule.applies)(profile, ctx) {
            debug!(
                principle = %principle,
                check = rule.code,
                severity = %rule.severity,
                deduction = rule.deduction,
                "Rule fired"
            );
            findings.push(rule.to_finding(principle, profile));
            total_deduction += rule.deduction;
            if let Some(weakness) = rule.weakness {
                weaknesses.push(render(weakness, profile));
            }
            if let Some(noted) = rule.noted_strength {
                strengths.push(render(noted, profile));
            }
        } else if let Some(strength) = rule.strength.and_then(|f| f(profile)) {
            strengths.push(strength);
        }
    }

    RuleOutcome {
        findings,
        strengths,
        weaknesses,
        total_deduction,
        score: clamp_score(1.0 - total_deduction),
    }
}

/// Clamp a score into `[0.0, 1.0]`.
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

/// Substitute profile values into a rule template.
pub fn render(template: &str, profile: &SystemProfile) -> String {
    if !template.contains('{') {
        return template.to_string();
    }
    template
        .replace("{system_type}", profile.system_type.as_str())
        .replace("{sector}", profile.sector().unwrap_or("unspecified"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AiSystemType;
    use pretty_assertions::assert_eq;

    fn always(_: &SystemProfile, _: &EvaluationContext) -> bool {
        true
    }

    fn never(_: &SystemProfile, _: &EvaluationContext) -> bool {
        false
    }

    fn named(p: &SystemProfile) -> Option<String> {
        Some(format!("Named: {}", p.name))
    }

    static TABLE: &[Rule] = &[
        Rule::new(
            "001",
            "governance",
            Severity::High,
            0.6,
            RemediationEffort::Low,
            "{system_type} in {sector}",
            "Fix it",
            always,
        )
        .weakness("Weak {sector}")
        .objective("Objective"),
        Rule::new(
            "002",
            "governance",
            Severity::Medium,
            0.7,
            RemediationEffort::Medium,
            "Second",
            "Fix again",
            always,
        )
        .noted("Noted"),
        Rule::new(
            "003",
            "docs",
            Severity::Low,
            0.1,
            RemediationEffort::Low,
            "Third",
            "Never",
            never,
        )
        .strength(named),
    ];

    fn profile() -> SystemProfile {
        SystemProfile::new("s", "Demo", "d", AiSystemType::Nlp, "o").with_industry_sector("energy")
    }

    #[test]
    fn test_deductions_accumulate_then_clamp() {
        let outcome = apply_rules(
            Principle::Accountability,
            TABLE,
            &profile(),
            &EvaluationContext::default(),
        );
        assert!((outcome.total_deduction - 1.3).abs() < 1e-9);
        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn test_findings_strengths_weaknesses() {
        let outcome = apply_rules(
            Principle::Fairness,
            TABLE,
            &profile(),
            &EvaluationContext::default(),
        );
        let ids: Vec<_> = outcome.findings.iter().map(|f| f.finding_id.as_str()).collect();
        assert_eq!(ids, vec!["FAI-001", "FAI-002"]);
        assert_eq!(outcome.findings[0].description, "nlp in energy");
        assert_eq!(
            outcome.findings[0].affected_objective.as_deref(),
            Some("Objective")
        );
        assert_eq!(outcome.weaknesses, vec!["Weak energy".to_string()]);
        assert_eq!(
            outcome.strengths,
            vec!["Noted".to_string(), "Named: Demo".to_string()]
        );
    }

    #[test]
    fn test_render_without_sector() {
        let p = SystemProfile::new("s", "n", "d", AiSystemType::Generative, "o");
        assert_eq!(render("{sector} / {system_type}", &p), "unspecified / generative");
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_score(-0.4), 0.0);
        assert_eq!(clamp_score(1.2), 1.0);
        assert_eq!(clamp_score(0.55), 0.55);
    }
}
