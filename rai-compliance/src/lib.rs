//! # RAI Compliance
//!
//! Regulatory compliance checks (GDPR, EU AI Act, LGPD) and rendering of
//! assessment results as Markdown, HTML or JSON reports.

pub mod error;
pub mod regulations;
pub mod report;

pub use error::ComplianceError;
pub use regulations::{
    ArticleCheck, ProhibitedPracticesCheck, Regulation, RegulationCheck, RequirementCheck,
    RequirementStatus, check_regulation, check_regulations,
};
pub use report::{ReportFormat, ReportType, render_report};
