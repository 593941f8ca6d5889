//! Markdown report generator: human-readable AIA, audit, summary and
//! compliance reports.

use crate::regulations::RegulationCheck;
use chrono::Utc;
use rai_core::model::aia::{
    ContextSection, DataModelSection, GovernanceSection, ImpactItem, ImpactSection,
    MetricDefinition, MonitoringSection, RiskMitigationSection,
};
use rai_core::model::{AiaReport, ComplianceStatus, PrincipleEvaluation, Severity};

/// Key findings shown in the executive summary.
const SUMMARY_KEY_FINDINGS: usize = 5;

/// Full Algorithmic Impact Assessment.
pub fn aia_markdown(report: &AiaReport) -> String {
    let profile = &report.system_profile;
    let sections = &report.sections;
    let mut md = String::new();

    md.push_str("# Algorithmic Impact Assessment Report\n\n");
    md.push_str(&format!("**Report ID:** {}\n", report.report_id));
    md.push_str(&format!(
        "**Generated:** {}\n",
        report.last_updated.format("%Y-%m-%d %H:%M UTC")
    ));
    md.push_str(&format!("**Version:** {}\n\n---\n\n", report.version));

    md.push_str("## System Information\n\n");
    md.push_str("| Field | Value |\n|-------|-------|\n");
    md.push_str(&format!("| **System Name** | {} |\n", cell(&profile.name)));
    md.push_str(&format!("| **System ID** | {} |\n", cell(&profile.system_id)));
    md.push_str(&format!("| **Owner** | {} |\n", cell(or_na(&profile.owner))));
    md.push_str(&format!("| **Risk Level** | {} |\n", profile.risk_level.as_str()));
    md.push_str(&format!(
        "| **Current Phase** | {} |\n\n---\n\n",
        profile.current_phase.title()
    ));

    md.push_str("## Executive Summary\n\n");
    md.push_str(&report.executive_summary);
    md.push_str("\n\n---\n\n");

    md.push_str("## Section 1: System Context and Purpose\n\n");
    md.push_str(&context_md(&sections.section1_context));
    md.push_str("\n---\n\n## Section 2: Data and Model Assessment\n\n");
    md.push_str(&data_model_md(&sections.section2_data_model));
    md.push_str("\n---\n\n## Section 3: Impact Analysis\n\n");
    md.push_str(&impact_md(&sections.section3_impact));
    md.push_str("\n---\n\n## Section 4: Risk Mitigation Measures\n\n");
    md.push_str(&risk_md(&sections.section4_risk_mitigation));
    md.push_str("\n---\n\n## Section 5: Governance and Accountability\n\n");
    md.push_str(&governance_md(&sections.section5_governance));
    md.push_str("\n---\n\n## Section 6: Ongoing Monitoring and Review\n\n");
    md.push_str(&monitoring_md(&sections.section6_monitoring));

    md.push_str("\n---\n\n## Principle Evaluations\n\n");
    md.push_str(&evaluation_table(&report.principle_evaluations));
    for evaluation in &report.principle_evaluations {
        if let Some(commentary) = &evaluation.advisory_commentary {
            md.push_str(&format!(
                "\n### {} Advisory Commentary\n\n{}\n",
                evaluation.principle.title(),
                commentary
            ));
        }
    }

    if !report.key_findings.is_empty() {
        md.push_str("\n### Key Findings\n\n");
        md.push_str(&bullets(&report.key_findings));
    }

    md.push_str("\n---\n\n## Overall Recommendation\n\n");
    md.push_str(&format!(
        "**Recommendation:** {}\n\n",
        report.overall_recommendation.title()
    ));
    if !report.conditions_for_approval.is_empty() {
        md.push_str("### Conditions for Approval\n\n");
        md.push_str(&bullets(&report.conditions_for_approval));
        md.push('\n');
    }
    if !report.blocking_issues.is_empty() {
        md.push_str("### Blocking Issues\n\n");
        md.push_str(&bullets(&report.blocking_issues));
        md.push('\n');
    }

    md.push_str("---\n\n## Approvals\n\n");
    md.push_str("| Role | Name | Date |\n|------|------|------|\n");
    if let Some(approver) = &report.approved_by {
        let date = report
            .approval_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        md.push_str(&format!("| Approver | {} | {} |\n", cell(approver), date));
    }
    for member in &report.assessment_team {
        md.push_str(&format!("| Assessor | {} | N/A |\n", cell(member)));
    }
    md
}

/// Audit report: findings per principle and a numbered recommendation list.
pub fn audit_markdown(report: &AiaReport) -> String {
    let mut md = String::new();
    md.push_str("# RAI Audit Report\n\n");
    md.push_str(&format!(
        "**Audit Date:** {}\n",
        report.last_updated.format("%Y-%m-%d")
    ));
    md.push_str(&format!("**System:** {}\n", report.system_profile.name));
    let auditor = if report.assessment_team.is_empty() {
        "RAI Audit System".to_string()
    } else {
        report.assessment_team.join(", ")
    };
    md.push_str(&format!("**Auditor:** {auditor}\n\n---\n\n"));

    md.push_str("## Executive Summary\n\n");
    md.push_str(&report.executive_summary);
    md.push_str("\n\n---\n\n## Audit Scope\n\n");
    let principles: Vec<&str> = report
        .principle_evaluations
        .iter()
        .map(|e| e.principle.title())
        .collect();
    if principles.len() == 6 {
        md.push_str("Full RAI assessment across all six principles.\n");
    } else if principles.is_empty() {
        md.push_str("No principles were evaluated.\n");
    } else {
        md.push_str(&format!("Partial assessment: {}.\n", principles.join(", ")));
    }

    md.push_str("\n---\n\n## Findings Summary\n\n");
    md.push_str("| Principle | Score | Status | Critical Findings |\n");
    md.push_str("|-----------|-------|--------|-------------------|\n");
    for e in &report.principle_evaluations {
        md.push_str(&format!(
            "| {} | {:.2} | {} | {} |\n",
            e.principle.title(),
            e.score,
            e.compliance_status.label(),
            e.count_severity(Severity::Critical)
        ));
    }

    md.push_str("\n---\n\n## Detailed Findings\n\n");
    for e in &report.principle_evaluations {
        md.push_str(&format!("### {}\n\n", e.principle.title()));
        if e.findings.is_empty() {
            md.push_str("No findings.\n");
        }
        for f in &e.findings {
            md.push_str(&format!(
                "- **[{}]** {} ({})\n",
                f.severity.as_str().to_uppercase(),
                f.description,
                f.finding_id
            ));
        }
        md.push('\n');
    }

    md.push_str("---\n\n## Recommendations\n\n");
    let mut seen = Vec::new();
    for rec in report
        .principle_evaluations
        .iter()
        .flat_map(|e| e.recommendations.iter())
    {
        if !seen.contains(&rec) {
            seen.push(rec);
        }
    }
    if seen.is_empty() {
        md.push_str("No recommendations.\n");
    }
    for (i, rec) in seen.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    md
}

/// One-page executive summary.
pub fn summary_markdown(report: &AiaReport) -> String {
    let overall = report.overall_score();
    let status = if report.principle_evaluations.is_empty() {
        ComplianceStatus::NotAssessed
    } else {
        ComplianceStatus::from_score(overall)
    };

    let mut md = String::new();
    md.push_str("# RAI Assessment Executive Summary\n\n");
    md.push_str(&format!("**System:** {}\n", report.system_profile.name));
    md.push_str(&format!("**Date:** {}\n", report.last_updated.format("%Y-%m-%d")));
    md.push_str(&format!("**Overall Score:** {overall:.2}/1.00\n"));
    md.push_str(&format!("**Status:** {}\n\n---\n\n", status.label()));

    md.push_str("## Key Findings\n\n");
    if report.key_findings.is_empty() {
        md.push_str("No high or critical findings.\n");
    }
    for finding in report.key_findings.iter().take(SUMMARY_KEY_FINDINGS) {
        md.push_str(&format!("- {finding}\n"));
    }

    md.push_str("\n---\n\n## Principle Scores\n\n");
    md.push_str("| Principle | Score | Status |\n|-----------|-------|--------|\n");
    for e in &report.principle_evaluations {
        md.push_str(&format!(
            "| {} | {:.2} | {} |\n",
            e.principle.title(),
            e.score,
            e.compliance_status.label()
        ));
    }

    md.push_str("\n---\n\n## Recommendation\n\n");
    md.push_str(&format!("**{}**\n\n", report.overall_recommendation.title()));
    md.push_str(&bullets(&report.conditions_for_approval));
    md
}

/// Compliance status across one or more regulations.
pub fn compliance_markdown(system_name: &str, checks: &[RegulationCheck]) -> String {
    let mut md = String::new();
    md.push_str("# Compliance Status Report\n\n");
    md.push_str(&format!(
        "**Generated:** {}\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));
    md.push_str(&format!("**System:** {system_name}\n\n---\n\n"));
    md.push_str("## Applicable Regulations\n\n");

    if checks.is_empty() {
        md.push_str("No regulations checked.\n");
    }
    for check in checks {
        md.push_str(&format!("### {}\n\n", check.regulation_name));
        md.push_str(&format!("**Status:** {}\n", check.overall_status));
        if let Some(class) = &check.risk_classification {
            md.push_str(&format!("**Risk Classification:** {class}\n"));
        }
        md.push('\n');

        md.push_str("| Requirement | Status | Evidence |\n");
        md.push_str("|-------------|--------|----------|\n");
        for article in &check.articles {
            if article.requirements.is_empty() {
                md.push_str(&format!(
                    "| {} ({}) | {} | {} |\n",
                    cell(&article.title),
                    article.article,
                    article.status,
                    cell(article.evidence.as_deref().unwrap_or("None"))
                ));
            }
            for req in &article.requirements {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    humanize(&req.requirement),
                    req.status,
                    cell(req.evidence.as_deref().unwrap_or("None"))
                ));
            }
        }

        if let Some(prohibited) = &check.prohibited_practices {
            md.push_str(&format!(
                "\n**Prohibited practices checked:** {}\n",
                prohibited.practices_checked.len()
            ));
            md.push_str(&format!(
                "**Violations detected:** {}\n",
                prohibited.violations_detected.len()
            ));
        }
        md.push('\n');
    }
    md
}

fn context_md(s: &ContextSection) -> String {
    let mut md = String::new();
    field(&mut md, "Business Problem", &s.business_problem);
    field(&mut md, "Business Justification", &s.business_justification);
    list(&mut md, "Intended Use Cases", &s.intended_use_cases);
    list(&mut md, "Expected Benefits", &s.expected_benefits);
    if !s.stakeholder_impacts.is_empty() {
        md.push_str("**Stakeholder Impacts:**\n\n");
        md.push_str("| Stakeholder | Relationship | Magnitude |\n|---|---|---|\n");
        for impact in &s.stakeholder_impacts {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                cell(&impact.stakeholder_group),
                cell(&impact.relationship),
                impact.impact_magnitude
            ));
        }
        md.push('\n');
    }
    field(&mut md, "Scope Boundaries", &s.scope_boundaries);
    list(&mut md, "Out Of Scope", &s.out_of_scope);
    list(&mut md, "Alternatives Considered", &s.alternatives_considered);
    field(&mut md, "AI Necessity Justification", &s.ai_necessity_justification);
    md
}

fn data_model_md(s: &DataModelSection) -> String {
    let mut md = String::new();
    if !s.data_sources.is_empty() {
        md.push_str("**Data Sources:**\n\n");
        for source in &s.data_sources {
            md.push_str(&format!(
                "- {} ({}): {}{}\n",
                source.name,
                source.source_type,
                source.description,
                if source.contains_personal_data {
                    " [personal data]"
                } else {
                    ""
                }
            ));
        }
        md.push('\n');
    }
    field(&mut md, "Data Quality Assessment", &s.data_quality_assessment);
    field(&mut md, "Data Representativeness", &s.data_representativeness);
    field(&mut md, "Model Selection Rationale", &s.model_selection_rationale);
    field(&mut md, "Model Architecture", &s.model_architecture);
    field(&mut md, "Training Methodology", &s.training_methodology);
    field(&mut md, "Validation Approach", &s.validation_approach);
    list(&mut md, "Known Limitations", &s.known_limitations);
    md
}

fn impact_md(s: &ImpactSection) -> String {
    let mut md = String::new();
    impact_items(&mut md, "Positive Impacts", &s.positive_impacts);
    impact_items(&mut md, "Negative Impacts", &s.negative_impacts);
    list(&mut md, "Unintended Consequences", &s.unintended_consequences);
    list(&mut md, "Disproportionate Impacts", &s.disproportionate_impacts);
    field(&mut md, "Equity Analysis", &s.equity_analysis);
    md
}

fn impact_items(md: &mut String, label: &str, items: &[ImpactItem]) {
    if items.is_empty() {
        return;
    }
    md.push_str(&format!("**{label}:**\n\n"));
    for item in items {
        md.push_str(&format!("- {} (magnitude: {})", item.description, item.magnitude));
        if !item.affected_groups.is_empty() {
            md.push_str(&format!("; affects {}", item.affected_groups.join(", ")));
        }
        md.push('\n');
    }
    md.push('\n');
}

fn risk_md(s: &RiskMitigationSection) -> String {
    let mut md = String::new();
    match &s.risk_assessment {
        Some(risk) => {
            md.push_str(&format!(
                "**Risk Assessment:** {} ({} risks, {} mitigations)\n\n",
                risk.assessment_id,
                risk.identified_risks.len(),
                risk.mitigations.len()
            ));
            if !risk.identified_risks.is_empty() {
                md.push_str("| Risk | Title | Score | Level |\n|---|---|---|---|\n");
                for r in &risk.identified_risks {
                    md.push_str(&format!(
                        "| {} | {} | {} | {} |\n",
                        r.risk_id,
                        cell(&r.title),
                        r.risk_score(),
                        r.risk_level().as_str()
                    ));
                }
                md.push('\n');
            }
            let unmitigated = risk.unmitigated_risks();
            if !unmitigated.is_empty() {
                let ids: Vec<String> = unmitigated.iter().map(|r| r.risk_id.clone()).collect();
                list(&mut md, "Unmitigated Risks", &ids);
            }
        }
        None => md.push_str("**Risk Assessment:** Not provided\n\n"),
    }
    list(&mut md, "Technical Safeguards", &s.technical_safeguards);
    list(&mut md, "Procedural Safeguards", &s.procedural_safeguards);
    list(&mut md, "Human Oversight Mechanisms", &s.human_oversight_mechanisms);
    list(&mut md, "Intervention Points", &s.intervention_points);
    list(&mut md, "Fallback Procedures", &s.fallback_procedures);
    md
}

fn governance_md(s: &GovernanceSection) -> String {
    let mut md = String::new();
    field(&mut md, "Accountability Framework", &s.accountability_framework);
    if !s.decision_rights.is_empty() {
        md.push_str("**Decision Rights:**\n\n");
        md.push_str("| Role | Authority | Responsibilities |\n|---|---|---|\n");
        for right in &s.decision_rights {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                cell(&right.role),
                right.authority_level,
                cell(&right.responsibilities.join("; "))
            ));
        }
        md.push('\n');
    }
    field(&mut md, "Escalation Procedures", &s.escalation_procedures);
    list(&mut md, "Audit Mechanisms", &s.audit_mechanisms);
    field(&mut md, "Incident Response Plan", &s.incident_response_plan);
    list(&mut md, "Documentation Requirements", &s.documentation_requirements);
    md
}

fn monitoring_md(s: &MonitoringSection) -> String {
    let mut md = String::new();
    metric_table(&mut md, "Performance Metrics", &s.performance_metrics);
    metric_table(&mut md, "Fairness Metrics", &s.fairness_metrics);
    field(&mut md, "Monitoring Frequency", &s.monitoring_frequency);
    field(&mut md, "Review Schedule", &s.review_schedule);
    list(&mut md, "Trigger Conditions", &s.trigger_conditions);
    list(&mut md, "Feedback Mechanisms", &s.feedback_mechanisms);
    list(&mut md, "Decommissioning Criteria", &s.decommissioning_criteria);
    md
}

fn metric_table(md: &mut String, label: &str, metrics: &[MetricDefinition]) {
    if metrics.is_empty() {
        return;
    }
    md.push_str(&format!("**{label}:**\n\n"));
    md.push_str("| Metric | Target | Frequency |\n|---|---|---|\n");
    for m in metrics {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            cell(&m.name),
            cell(&m.target),
            m.frequency
        ));
    }
    md.push('\n');
}

fn evaluation_table(evaluations: &[PrincipleEvaluation]) -> String {
    if evaluations.is_empty() {
        return "No evaluations available.\n".to_string();
    }
    let mut md = String::from("| Principle | Score | Status | Findings |\n");
    md.push_str("|-----------|-------|--------|----------|\n");
    for e in evaluations {
        md.push_str(&format!(
            "| {} | {:.2} | {} | {} |\n",
            e.principle.title(),
            e.score,
            e.compliance_status.label(),
            e.findings.len()
        ));
    }
    md
}

fn field(md: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        md.push_str(&format!("**{label}:** {value}\n\n"));
    }
}

fn list(md: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    md.push_str(&format!("**{label}:**\n\n"));
    md.push_str(&bullets(items));
    md.push('\n');
}

fn bullets(items: &[String]) -> String {
    items.iter().map(|i| format!("- {i}\n")).collect()
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() { "N/A" } else { s }
}

/// Keep table cells on one row.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// `right_to_request_review` -> `Right To Request Review`.
fn humanize(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
