//! CLI subcommand handlers.

use crate::{Commands, ConfigAction, ReportAction};
use anyhow::Context;
use rai_compliance::report::markdown::compliance_markdown;
use rai_compliance::{
    Regulation, RegulationCheck, ReportFormat, ReportType, RequirementStatus, check_regulations,
    render_report,
};
use rai_core::advisory::{AdvisoryClient, MockAdvisoryProvider, create_client};
use rai_core::assessment::AssessmentOrchestrator;
use rai_core::config::{RaiConfig, WORKSPACE_DIR, load_config};
use rai_core::lifecycle::{EvidenceStore, LifecycleTracker};
use rai_core::model::{AiaReport, LifecyclePhase, Principle, RiskAssessment, SystemProfile};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Assess {
            system_profile,
            output,
            format,
            principles,
        } => handle_assess(workspace, &system_profile, &output, format, &principles).await,
        Commands::Aia {
            system_profile,
            output,
            risk_assessment,
        } => handle_aia(workspace, &system_profile, &output, risk_assessment.as_deref()).await,
        Commands::Lifecycle {
            system_profile,
            phase,
            evidence,
            transition_to,
            authorized_by,
        } => handle_lifecycle(
            workspace,
            &system_profile,
            phase,
            evidence.as_deref(),
            transition_to.zip(authorized_by),
        ),
        Commands::Compliance {
            regulation,
            system_profile,
            evidence,
            output,
        } => handle_compliance(
            workspace,
            &regulation,
            &system_profile,
            evidence.as_deref(),
            output.as_deref(),
        ),
        Commands::Report { action } => handle_report(action, workspace),
        Commands::Init { output } => handle_init(workspace, &output),
        Commands::Config { action } => handle_config(action, workspace),
    }
}

async fn handle_assess(
    workspace: &Path,
    profile_path: &Path,
    output: &Path,
    format: ReportFormat,
    principles: &[Principle],
) -> anyhow::Result<()> {
    let profile = load_profile(workspace, profile_path)?;
    println!("System: {}", profile.name);
    println!("Risk Level: {}", profile.risk_level);
    println!("\nRunning RAI assessment...");

    let orchestrator = orchestrator(workspace)?;
    let evaluations = orchestrator.run_assessment(&profile, principles).await;
    let report = orchestrator.run_aia(&profile, evaluations, None);

    let content = match format {
        ReportFormat::Json => render_report(&report, ReportType::Aia, format, &[])?,
        _ => render_report(&report, ReportType::Summary, format, &[])?,
    };
    let output = resolve(workspace, output);
    write_output(&output, &content)?;

    println!("\nAssessment complete. Results saved to: {}", output.display());
    println!("Overall Score: {:.2}", report.overall_score());
    println!("Recommendation: {}", report.overall_recommendation);
    Ok(())
}

async fn handle_aia(
    workspace: &Path,
    profile_path: &Path,
    output: &Path,
    risk_path: Option<&Path>,
) -> anyhow::Result<()> {
    let profile = load_profile(workspace, profile_path)?;
    println!("System: {}", profile.name);

    let risk = match risk_path {
        Some(path) => {
            let path = resolve(workspace, path);
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read risk assessment {}", path.display()))?;
            let risk: RiskAssessment = serde_json::from_str(&content)
                .with_context(|| format!("Invalid risk assessment {}", path.display()))?;
            Some(risk)
        }
        None => None,
    };

    println!("\nGenerating AIA report...");
    let orchestrator = orchestrator(workspace)?;
    let evaluations = orchestrator.run_assessment(&profile, &[]).await;
    let report = orchestrator.run_aia(&profile, evaluations, risk);

    let output = resolve(workspace, output);
    let format = format_for(&output);
    let content = render_report(&report, ReportType::Aia, format, &[])?;
    write_output(&output, &content)?;

    println!("\nAIA report generated: {}", output.display());
    println!("Overall Score: {:.2}", report.overall_score());
    println!("Recommendation: {}", report.overall_recommendation);
    Ok(())
}

fn handle_lifecycle(
    workspace: &Path,
    profile_path: &Path,
    phase: Option<LifecyclePhase>,
    evidence_path: Option<&Path>,
    transition: Option<(LifecyclePhase, String)>,
) -> anyhow::Result<()> {
    let mut profile = load_profile(workspace, profile_path)?;
    if let Some(phase) = phase {
        profile.current_phase = phase;
    }
    println!("System: {}", profile.name);

    let config = load_workspace_config(workspace)?;
    let tracker = LifecycleTracker::from_config(&config.lifecycle);
    let evidence = load_evidence(workspace, evidence_path)?;

    let mut status = tracker.verify_all(&tracker.initialize(&profile), &evidence);

    println!("\nCurrent Phase: {}", status.current_phase.title());
    println!("Completion: {:.0}%", status.phase_completion() * 100.0);
    println!(
        "Ready for Next Phase: {}",
        if status.ready_for_next_phase { "Yes" } else { "No" }
    );
    if let Some(next) = status.next_phase {
        println!("Next Phase: {}", next.title());
    }

    let incomplete = status.incomplete_checkpoints();
    if !incomplete.is_empty() {
        println!("\nIncomplete Checkpoints ({}):", incomplete.len());
        for cp in incomplete {
            println!("  - {}: {}", cp.checkpoint_id, cp.name);
        }
    }

    let actions = tracker.recommended_actions(&status, &evidence);
    if !actions.is_empty() {
        println!("\nRecommended Actions:");
        for action in actions {
            println!("  {action}");
        }
    }

    if let Some((to, authorized_by)) = transition {
        let record = tracker.transition(&mut status, to, &authorized_by)?;
        println!(
            "\nTransitioned: {} -> {} (authorized by {})",
            record.from_phase.title(),
            record.to_phase.title(),
            record.authorized_by
        );
        if !record.conditions.is_empty() {
            println!("Conditions:");
            for condition in &record.conditions {
                println!("  - {condition}");
            }
        }
    }
    Ok(())
}

fn handle_compliance(
    workspace: &Path,
    regulation: &str,
    profile_path: &Path,
    evidence_path: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let regulations = Regulation::parse_selection(regulation)?;
    println!("Checking {} compliance...", regulation.to_uppercase());

    let profile = load_profile(workspace, profile_path)?;
    let evidence = load_evidence(workspace, evidence_path)?;
    let checks = check_regulations(&regulations, &profile, &evidence);

    for check in &checks {
        print_check(check);
    }

    if let Some(output) = output {
        let output = resolve(workspace, output);
        write_output(&output, &compliance_markdown(&profile.name, &checks))?;
        println!("\nCompliance report saved to: {}", output.display());
    }
    Ok(())
}

fn print_check(check: &RegulationCheck) {
    println!("\nRegulation: {}", check.regulation_name);
    println!("Overall Status: {}", check.overall_status);
    if let Some(class) = &check.risk_classification {
        println!("Risk Classification: {class}");
    }

    let lines: Vec<(bool, &str)> = check
        .articles
        .iter()
        .flat_map(|article| {
            if article.requirements.is_empty() {
                vec![(
                    article.status == RequirementStatus::Compliant,
                    article.title.as_str(),
                )]
            } else {
                article
                    .requirements
                    .iter()
                    .map(|r| {
                        (
                            r.status == RequirementStatus::Compliant,
                            r.requirement.as_str(),
                        )
                    })
                    .collect()
            }
        })
        .collect();

    println!("\nRequirements Checked: {}", lines.len());
    for (_, label) in lines.iter().filter(|(met, _)| *met) {
        println!("  [OK] {label}");
    }
    for (_, label) in lines.iter().filter(|(met, _)| !*met) {
        println!("  [!!] {label}");
    }
}

fn handle_report(action: ReportAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ReportAction::Generate {
            assessment,
            output,
            format,
            report_type,
            evidence,
        } => {
            println!("Generating {report_type} report...");
            let path = resolve(workspace, &assessment);
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read assessment {}", path.display()))?;
            let report: AiaReport = serde_json::from_str(&content).with_context(|| {
                format!("{} is not an assessment report", path.display())
            })?;

            let checks = if report_type == ReportType::Compliance {
                let evidence = load_evidence(workspace, evidence.as_deref())?;
                check_regulations(&Regulation::ALL, &report.system_profile, &evidence)
            } else {
                Vec::new()
            };

            let rendered = render_report(&report, report_type, format, &checks)?;
            let output = resolve(workspace, &output);
            write_output(&output, &rendered)?;
            println!("Report generated: {}", output.display());
            Ok(())
        }
    }
}

fn handle_init(workspace: &Path, output: &Path) -> anyhow::Result<()> {
    let template = serde_json::json!({
        "system_id": "my-ai-system-001",
        "name": "My AI System",
        "description": "Description of what the AI system does",
        "version": "1.0.0",
        "system_type": "classification",
        "risk_level": "medium",
        "is_high_risk_eu_ai_act": false,
        "model_architecture": "e.g., RandomForest, Transformer, CNN",
        "training_data_description": "Description of training data sources",
        "input_data_types": ["text", "numeric"],
        "output_data_types": ["classification"],
        "owner": "Team or Person Name",
        "developers": ["Developer 1", "Developer 2"],
        "operators": ["Operations Team"],
        "affected_populations": ["Users", "Customers"],
        "current_phase": "design_data_models",
        "applicable_regulations": ["GDPR"],
        "industry_sector": "e.g., finance, healthcare",
        "use_cases": ["Use case 1", "Use case 2"],
        "known_limitations": ["Limitation 1"],
        "prohibited_uses": ["Do not use for X"]
    });

    let output = resolve(workspace, output);
    write_output(&output, &serde_json::to_string_pretty(&template)?)?;
    println!("System profile template created: {}", output.display());
    println!("Edit this file with your system's details, then run:");
    println!("  rai assess -s {}", output.display());
    Ok(())
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_dir = workspace.join(WORKSPACE_DIR);
            std::fs::create_dir_all(&config_dir)?;

            let config_path = config_dir.join("config.toml");
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            let toml_str = toml::to_string_pretty(&RaiConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_workspace_config(workspace)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_workspace_config(workspace: &Path) -> anyhow::Result<RaiConfig> {
    load_config(Some(workspace), None).map_err(|e| anyhow::anyhow!("Configuration error: {}", e))
}

/// Orchestrator built from the workspace configuration. When the configured
/// advisory provider cannot be created the mock provider is used instead.
fn orchestrator(workspace: &Path) -> anyhow::Result<AssessmentOrchestrator> {
    let config = load_workspace_config(workspace)?;
    let advisory = match create_client(&config.advisory) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Advisory provider unavailable; using mock provider");
            eprintln!("Warning: {e}. Using mock advisory provider.");
            Some(AdvisoryClient::new(
                Arc::new(MockAdvisoryProvider::new()),
                Duration::from_secs(config.advisory.timeout_secs),
            ))
        }
    };
    Ok(AssessmentOrchestrator::from_config(&config, advisory))
}

fn load_profile(workspace: &Path, path: &Path) -> anyhow::Result<SystemProfile> {
    let path = resolve(workspace, path);
    println!("Loading system profile from {}...", path.display());
    let profile = SystemProfile::from_path(&path).context("Failed to load profile")?;
    info!(system_id = %profile.system_id, path = %path.display(), "Loaded system profile");
    Ok(profile)
}

fn load_evidence(workspace: &Path, path: Option<&Path>) -> anyhow::Result<EvidenceStore> {
    match path {
        Some(path) => {
            let path = resolve(workspace, path);
            EvidenceStore::from_path(&path)
                .with_context(|| format!("Failed to load evidence {}", path.display()))
        }
        None => Ok(EvidenceStore::new()),
    }
}

fn resolve(workspace: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}

/// Output format implied by a file extension; Markdown when unrecognised.
fn format_for(path: &Path) -> ReportFormat {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
        .unwrap_or_default()
}

fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rai_core::model::AiaRecommendation;
    use tempfile::TempDir;

    async fn init_profile(workspace: &Path) -> PathBuf {
        handle_command(
            Commands::Init {
                output: PathBuf::from("system_profile.json"),
            },
            workspace,
        )
        .await
        .unwrap();
        workspace.join("system_profile.json")
    }

    #[tokio::test]
    async fn test_init_writes_loadable_profile() {
        let dir = TempDir::new().unwrap();
        let path = init_profile(dir.path()).await;

        let profile = SystemProfile::from_path(&path).unwrap();
        assert_eq!(profile.system_id, "my-ai-system-001");
        assert_eq!(profile.current_phase, LifecyclePhase::DesignDataModels);
        assert_eq!(profile.applicable_regulations, vec!["GDPR".to_string()]);
    }

    #[tokio::test]
    async fn test_assess_writes_json_report() {
        let dir = TempDir::new().unwrap();
        init_profile(dir.path()).await;

        handle_command(
            Commands::Assess {
                system_profile: PathBuf::from("system_profile.json"),
                output: PathBuf::from("out/assessment.json"),
                format: ReportFormat::Json,
                principles: vec![Principle::Fairness, Principle::Security],
            },
            dir.path(),
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(dir.path().join("out/assessment.json")).unwrap();
        let report: AiaReport = serde_json::from_str(&content).unwrap();
        let principles: Vec<_> = report
            .principle_evaluations
            .iter()
            .map(|e| e.principle)
            .collect();
        assert_eq!(principles, vec![Principle::Fairness, Principle::Security]);
        assert_ne!(
            report.overall_recommendation,
            AiaRecommendation::RequiresFurtherAssessment
        );
    }

    #[tokio::test]
    async fn test_report_generate_from_saved_assessment() {
        let dir = TempDir::new().unwrap();
        init_profile(dir.path()).await;
        handle_command(
            Commands::Aia {
                system_profile: PathBuf::from("system_profile.json"),
                output: PathBuf::from("aia.json"),
                risk_assessment: None,
            },
            dir.path(),
        )
        .await
        .unwrap();

        handle_command(
            Commands::Report {
                action: ReportAction::Generate {
                    assessment: PathBuf::from("aia.json"),
                    output: PathBuf::from("audit.html"),
                    format: ReportFormat::Html,
                    report_type: ReportType::Audit,
                    evidence: None,
                },
            },
            dir.path(),
        )
        .await
        .unwrap();

        let html = std::fs::read_to_string(dir.path().join("audit.html")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>RAI Audit Report</h1>"));
    }

    #[tokio::test]
    async fn test_report_generate_rejects_non_report_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), r#"{"hello": "world"}"#).unwrap();
        let err = handle_command(
            Commands::Report {
                action: ReportAction::Generate {
                    assessment: PathBuf::from("bad.json"),
                    output: PathBuf::from("report.md"),
                    format: ReportFormat::Markdown,
                    report_type: ReportType::Summary,
                    evidence: None,
                },
            },
            dir.path(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("is not an assessment report"));
        assert!(!dir.path().join("report.md").exists());
    }

    #[tokio::test]
    async fn test_aia_markdown_by_extension_with_risk_assessment() {
        let dir = TempDir::new().unwrap();
        init_profile(dir.path()).await;
        std::fs::write(
            dir.path().join("risk.json"),
            r#"{
                "assessment_id": "RA-1",
                "system_id": "my-ai-system-001",
                "identified_risks": [{
                    "risk_id": "R-1",
                    "title": "Proxy discrimination",
                    "description": "Zip code correlates with protected attributes",
                    "category": "ethical",
                    "likelihood": "likely",
                    "impact": "major"
                }]
            }"#,
        )
        .unwrap();

        handle_command(
            Commands::Aia {
                system_profile: PathBuf::from("system_profile.json"),
                output: PathBuf::from("aia.md"),
                risk_assessment: Some(PathBuf::from("risk.json")),
            },
            dir.path(),
        )
        .await
        .unwrap();

        let md = std::fs::read_to_string(dir.path().join("aia.md")).unwrap();
        assert!(md.starts_with("# Algorithmic Impact Assessment Report"));
        assert!(md.contains("| R-1 | Proxy discrimination |"));
    }

    #[tokio::test]
    async fn test_compliance_writes_report() {
        let dir = TempDir::new().unwrap();
        init_profile(dir.path()).await;
        std::fs::write(
            dir.path().join("evidence.json"),
            r#"{"right_to_request_review": "Appeals form"}"#,
        )
        .unwrap();

        handle_command(
            Commands::Compliance {
                regulation: "lgpd".into(),
                system_profile: PathBuf::from("system_profile.json"),
                evidence: Some(PathBuf::from("evidence.json")),
                output: Some(PathBuf::from("compliance.md")),
            },
            dir.path(),
        )
        .await
        .unwrap();

        let md = std::fs::read_to_string(dir.path().join("compliance.md")).unwrap();
        assert!(md.contains("**Status:** Non-Compliant"));
    }

    #[tokio::test]
    async fn test_compliance_unknown_regulation() {
        let dir = TempDir::new().unwrap();
        init_profile(dir.path()).await;
        let err = handle_command(
            Commands::Compliance {
                regulation: "hipaa".into(),
                system_profile: PathBuf::from("system_profile.json"),
                evidence: None,
                output: None,
            },
            dir.path(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("gdpr, eu_ai_act, lgpd"));
    }

    #[tokio::test]
    async fn test_lifecycle_transition_out_of_shutdown_fails() {
        let dir = TempDir::new().unwrap();
        init_profile(dir.path()).await;

        handle_command(
            Commands::Lifecycle {
                system_profile: PathBuf::from("system_profile.json"),
                phase: None,
                evidence: None,
                transition_to: Some(LifecyclePhase::ValidationVerification),
                authorized_by: Some("Review Board".into()),
            },
            dir.path(),
        )
        .await
        .unwrap();

        let err = handle_command(
            Commands::Lifecycle {
                system_profile: PathBuf::from("system_profile.json"),
                phase: Some(LifecyclePhase::Shutdown),
                evidence: None,
                transition_to: Some(LifecyclePhase::Deployment),
                authorized_by: Some("Review Board".into()),
            },
            dir.path(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("shutdown"));
    }

    #[tokio::test]
    async fn test_missing_profile_is_error() {
        let dir = TempDir::new().unwrap();
        let err = handle_command(
            Commands::Assess {
                system_profile: PathBuf::from("missing.json"),
                output: PathBuf::from("out.json"),
                format: ReportFormat::Json,
                principles: Vec::new(),
            },
            dir.path(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Failed to load profile"));
    }

    #[tokio::test]
    async fn test_config_init_idempotent() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        handle_command(
            Commands::Config {
                action: ConfigAction::Init,
            },
            workspace,
        )
        .await
        .unwrap();

        let config_path = workspace.join(".rai").join("config.toml");
        let first = std::fs::read_to_string(&config_path).unwrap();
        let parsed: RaiConfig = toml::from_str(&first).unwrap();
        assert_eq!(parsed, RaiConfig::default());

        std::fs::write(&config_path, "[assessment]\nmonitoring_configured = true\n").unwrap();
        handle_command(
            Commands::Config {
                action: ConfigAction::Init,
            },
            workspace,
        )
        .await
        .unwrap();
        let second = std::fs::read_to_string(&config_path).unwrap();
        assert!(second.contains("monitoring_configured = true"));
    }

    #[test]
    fn test_format_for_extension() {
        assert_eq!(format_for(Path::new("a.json")), ReportFormat::Json);
        assert_eq!(format_for(Path::new("a.html")), ReportFormat::Html);
        assert_eq!(format_for(Path::new("a.md")), ReportFormat::Markdown);
        assert_eq!(format_for(Path::new("a.txt")), ReportFormat::Markdown);
    }
}
