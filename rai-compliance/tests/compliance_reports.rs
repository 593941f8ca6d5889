//! Compliance checks and report rendering over a real assessment run.

use pretty_assertions::assert_eq;
use rai_compliance::{
    Regulation, ReportFormat, ReportType, RequirementStatus, check_regulations, render_report,
};
use rai_core::assessment::AssessmentOrchestrator;
use rai_core::lifecycle::EvidenceStore;
use rai_core::model::{AiSystemType, AiaRecommendation, AiaReport, SystemProfile};

fn loan_profile() -> SystemProfile {
    let mut p = SystemProfile::new(
        "loan-3",
        "Credit Line Scorer",
        "Scores applications for consumer credit line increases",
        AiSystemType::Classification,
        "Retail Credit Risk",
    )
    .with_high_risk(true)
    .with_industry_sector("finance");
    p.applicable_regulations = vec!["GDPR".into(), "EU AI Act".into()];
    p
}

async fn assess(profile: &SystemProfile) -> AiaReport {
    AssessmentOrchestrator::default()
        .run_full_assessment(profile)
        .await
}

#[tokio::test]
async fn test_compliance_report_across_all_regulations() {
    let profile = loan_profile();
    let evidence = EvidenceStore::from_json(
        r#"{
            "9": "risk-register.xlsx",
            "article_10": "data-governance.md",
            "11": "tech-file.pdf",
            "12": "audit-log-design.md",
            "13": "deployer-guide.pdf",
            "14": "oversight-runbook.md",
            "15": "robustness-report.pdf",
            "right_to_human_intervention": "Manual review queue",
            "suitable_safeguards": "Threshold review",
            "right_to_request_review": "Appeals form",
            "clear_adequate_information": "Decision letter template"
        }"#,
    )
    .unwrap();

    let checks = check_regulations(&Regulation::ALL, &profile, &evidence);
    assert_eq!(checks.len(), 3);

    let statuses: Vec<_> = checks
        .iter()
        .map(|c| (c.regulation, c.overall_status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (Regulation::Gdpr, RequirementStatus::NonCompliant),
            (Regulation::EuAiAct, RequirementStatus::Compliant),
            (Regulation::Lgpd, RequirementStatus::Compliant),
        ]
    );
    assert_eq!(checks[0].gaps().len(), 1);
    assert_eq!(
        checks[0].articles[0].status,
        RequirementStatus::PartiallyCompliant
    );
    assert_eq!(checks[0].articles[0].gaps.len(), 4);

    let report = assess(&profile).await;
    let md = render_report(&report, ReportType::Compliance, ReportFormat::Markdown, &checks)
        .unwrap();
    assert!(md.contains("**System:** Credit Line Scorer"));
    assert!(md.contains("### GDPR"));
    assert!(md.contains("**Status:** Non-Compliant"));
    assert!(md.contains("| Right To Human Intervention | Compliant | Manual review queue |"));
    assert!(md.contains("| Data and data governance (article_10) | Compliant | data-governance.md |"));

    let json = render_report(&report, ReportType::Compliance, ReportFormat::Json, &checks).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().map(|a| a.len()), Some(3));
    assert_eq!(value[1]["regulation"], "eu_ai_act");
    assert_eq!(value[1]["risk_classification"], "high");
}

#[tokio::test]
async fn test_every_report_type_renders_in_every_format() {
    let profile = loan_profile();
    let report = assess(&profile).await;
    let checks = check_regulations(&[Regulation::EuAiAct], &profile, &EvidenceStore::new());

    for report_type in ReportType::ALL {
        for format in ReportFormat::ALL {
            let out = render_report(&report, report_type, format, &checks).unwrap();
            assert!(!out.is_empty(), "{report_type}/{format} is empty");
            match format {
                ReportFormat::Html => {
                    assert!(out.starts_with("<!DOCTYPE html>"));
                    assert!(out.contains(&format!("<title>{}</title>", report_type.title())));
                }
                ReportFormat::Json => {
                    serde_json::from_str::<serde_json::Value>(&out).unwrap();
                }
                ReportFormat::Markdown => {
                    assert!(out.starts_with(&format!("# {}", report_type.title())));
                }
            }
        }
    }
}

#[tokio::test]
async fn test_summary_json_carries_recommendation() {
    let report = assess(&loan_profile()).await;
    let json = render_report(&report, ReportType::Summary, ReportFormat::Json, &[]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value["aia_recommendation"],
        serde_json::to_value(report.overall_recommendation).unwrap()
    );
    assert_eq!(value["principle_scores"].as_array().map(|a| a.len()), Some(6));
}

#[tokio::test]
async fn test_html_escapes_profile_text() {
    let mut profile = loan_profile();
    profile.name = "<img src=x onerror=alert(1)>".into();
    let report = assess(&profile).await;
    let html = render_report(&report, ReportType::Aia, ReportFormat::Html, &[]).unwrap();
    assert!(!html.contains("<img"));
    assert!(html.contains("&lt;img"));
}

#[tokio::test]
async fn test_blocking_section_follows_recommendation() {
    let report = assess(&loan_profile()).await;
    let md = render_report(&report, ReportType::Aia, ReportFormat::Markdown, &[]).unwrap();
    if report.overall_recommendation == AiaRecommendation::DoNotProceed {
        assert!(md.contains("### Blocking Issues"));
    } else {
        assert!(!md.contains("### Blocking Issues"));
    }
}
