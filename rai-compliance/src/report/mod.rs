//! Report generation: Markdown, HTML and JSON renderings of AIA reports and
//! compliance checks.

pub mod html;
pub mod markdown;

use crate::error::ComplianceError;
use crate::regulations::RegulationCheck;
use rai_core::assessment::AssessmentSummary;
use rai_core::model::AiaReport;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Aia,
    Audit,
    Summary,
    Compliance,
}

impl ReportType {
    pub const ALL: [ReportType; 4] = [
        ReportType::Aia,
        ReportType::Audit,
        ReportType::Summary,
        ReportType::Compliance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Aia => "aia",
            ReportType::Audit => "audit",
            ReportType::Summary => "summary",
            ReportType::Compliance => "compliance",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportType::Aia => "Algorithmic Impact Assessment Report",
            ReportType::Audit => "RAI Audit Report",
            ReportType::Summary => "RAI Assessment Executive Summary",
            ReportType::Compliance => "Compliance Status Report",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportType {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ReportType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ComplianceError::UnknownReportType {
                name: s.to_string(),
                valid: join(ReportType::ALL.iter().map(|t| t.as_str())),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Html,
    Json,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Markdown, ReportFormat::Html, ReportFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }

    /// File extension conventionally used for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = if normalized == "md" {
            "markdown".to_string()
        } else {
            normalized
        };
        ReportFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| ComplianceError::UnknownFormat {
                name: s.to_string(),
                valid: join(ReportFormat::ALL.iter().map(|f| f.as_str())),
            })
    }
}

fn join<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// Render `report` as the requested report type and format.
///
/// `compliance` is only consulted for [`ReportType::Compliance`].
pub fn render_report(
    report: &AiaReport,
    report_type: ReportType,
    format: ReportFormat,
    compliance: &[RegulationCheck],
) -> Result<String, ComplianceError> {
    debug!(
        report_id = %report.report_id,
        report_type = report_type.as_str(),
        format = format.as_str(),
        "Rendering report"
    );

    if format == ReportFormat::Json {
        let json = match report_type {
            ReportType::Aia | ReportType::Audit => serde_json::to_string_pretty(report)?,
            ReportType::Summary => {
                let summary = AssessmentSummary::from_evaluations(&report.principle_evaluations)
                    .map(|s| s.with_aia_recommendation(report.overall_recommendation));
                serde_json::to_string_pretty(&summary)?
            }
            ReportType::Compliance => serde_json::to_string_pretty(compliance)?,
        };
        return Ok(json);
    }

    let md = match report_type {
        ReportType::Aia => markdown::aia_markdown(report),
        ReportType::Audit => markdown::audit_markdown(report),
        ReportType::Summary => markdown::summary_markdown(report),
        ReportType::Compliance => {
            markdown::compliance_markdown(&report.system_profile.name, compliance)
        }
    };

    Ok(match format {
        ReportFormat::Html => html::markdown_to_document(report_type.title(), &md),
        _ => md,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_type_and_format() {
        assert_eq!("AIA".parse::<ReportType>().unwrap(), ReportType::Aia);
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!(ReportFormat::Html.extension(), "html");

        let err = "pdf".parse::<ReportFormat>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown output format: pdf. Supported: markdown, html, json"
        );
        let err = "memo".parse::<ReportType>().unwrap_err();
        assert!(err.to_string().contains("aia, audit, summary, compliance"));
    }
}
