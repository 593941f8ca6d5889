//! System profile: the description of the AI system under assessment.

use super::lifecycle::LifecyclePhase;
use crate::error::ProfileError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Version string assumed when a profile omits one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Classification of the AI system by what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiSystemType {
    Classification,
    Regression,
    Generative,
    Recommendation,
    Nlp,
    ComputerVision,
    Autonomous,
    Multimodal,
    Other,
}

impl AiSystemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiSystemType::Classification => "classification",
            AiSystemType::Regression => "regression",
            AiSystemType::Generative => "generative",
            AiSystemType::Recommendation => "recommendation",
            AiSystemType::Nlp => "nlp",
            AiSystemType::ComputerVision => "computer_vision",
            AiSystemType::Autonomous => "autonomous",
            AiSystemType::Multimodal => "multimodal",
            AiSystemType::Other => "other",
        }
    }
}

impl std::fmt::Display for AiSystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Four-tier risk classification, shared by profiles and risk assessments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Band a 1–25 risk score: ≤4 low, ≤9 medium, ≤16 high, otherwise critical.
    pub fn from_score(score: f64) -> Self {
        if score <= 4.0 {
            RiskLevel::Low
        } else if score <= 9.0 {
            RiskLevel::Medium
        } else if score <= 16.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// Metadata describing an AI system.
///
/// Every list field defaults to empty. Emptiness is meaningful: many
/// evaluator rules fire precisely because a list was left blank.
/// Fields this struct does not know about are kept in `extra` and written
/// back out on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemProfile {
    pub system_id: String,
    pub name: String,
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,

    pub system_type: AiSystemType,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub is_high_risk_eu_ai_act: bool,

    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_architecture: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub training_data_description: Option<String>,
    #[serde(default)]
    pub input_data_types: Vec<String>,
    #[serde(default)]
    pub output_data_types: Vec<String>,

    pub owner: String,
    #[serde(default)]
    pub developers: Vec<String>,
    #[serde(default)]
    pub operators: Vec<String>,
    #[serde(default)]
    pub affected_populations: Vec<String>,

    #[serde(default)]
    pub current_phase: LifecyclePhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_assessment_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub applicable_regulations: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub industry_sector: Option<String>,

    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub known_limitations: Vec<String>,
    #[serde(default)]
    pub prohibited_uses: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SystemProfile {
    /// Create a profile with the mandatory identity fields and defaults elsewhere.
    pub fn new(
        system_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        system_type: AiSystemType,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            system_id: system_id.into(),
            name: name.into(),
            description: description.into(),
            version: default_version(),
            system_type,
            risk_level: RiskLevel::default(),
            is_high_risk_eu_ai_act: false,
            model_architecture: None,
            training_data_description: None,
            input_data_types: Vec::new(),
            output_data_types: Vec::new(),
            owner: owner.into(),
            developers: Vec::new(),
            operators: Vec::new(),
            affected_populations: Vec::new(),
            current_phase: LifecyclePhase::default(),
            deployment_date: None,
            last_assessment_date: None,
            applicable_regulations: Vec::new(),
            certifications: Vec::new(),
            industry_sector: None,
            use_cases: Vec::new(),
            known_limitations: Vec::new(),
            prohibited_uses: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_level = level;
        self
    }

    pub fn with_high_risk(mut self, high_risk: bool) -> Self {
        self.is_high_risk_eu_ai_act = high_risk;
        self
    }

    pub fn with_phase(mut self, phase: LifecyclePhase) -> Self {
        self.current_phase = phase;
        self
    }

    pub fn with_industry_sector(mut self, sector: impl Into<String>) -> Self {
        self.industry_sector = Some(sector.into());
        self
    }

    /// Parse a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(json).map_err(|e| parse_error("<json>", e))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Parse a profile from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_yaml::from_str(yaml).map_err(|e| parse_error("<yaml>", e))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load a profile from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        if !path.exists() {
            return Err(ProfileError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ProfileError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let profile: Self = match extension.as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(path, e))?,
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| parse_error(path, e))?
            }
            _ => {
                return Err(ProfileError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Reject profiles whose identity fields are blank.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.system_id.trim().is_empty() {
            return Err(ProfileError::Invalid {
                message: "system_id must not be empty".into(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(ProfileError::Invalid {
                message: "name must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Documented model architecture, if it says anything.
    pub fn architecture(&self) -> Option<&str> {
        non_blank(&self.model_architecture)
    }

    /// Training data description, if it says anything.
    pub fn training_data(&self) -> Option<&str> {
        non_blank(&self.training_data_description)
    }

    /// Industry sector, if it says anything.
    pub fn sector(&self) -> Option<&str> {
        non_blank(&self.industry_sector)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Deserialize an optional string, treating blank text as absent.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Map a deserializer failure onto a profile error, surfacing missing
/// required fields by name.
fn parse_error(path: impl AsRef<Path>, err: impl std::fmt::Display) -> ProfileError {
    let message = err.to_string();
    if let Some(field) = missing_field_name(&message) {
        return ProfileError::MissingField { field };
    }
    ProfileError::Parse {
        path: path.as_ref().to_path_buf(),
        message,
    }
}

fn missing_field_name(message: &str) -> Option<String> {
    let rest = message.split("missing field `").nth(1)?;
    let field = rest.split('`').next()?;
    Some(field.to_string())
}
