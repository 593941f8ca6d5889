//! Regulatory checks: EU AI Act high-risk obligations, GDPR Article 22 and
//! LGPD Article 20.
//!
//! Each check is a pure function of the system profile and an evidence store.
//! A requirement counts as met when the store holds a truthy value under its
//! key; the value itself is carried through as the evidence text.

use crate::error::ComplianceError;
use rai_core::lifecycle::EvidenceStore;
use rai_core::model::SystemProfile;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Regulations with built-in checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regulation {
    Gdpr,
    EuAiAct,
    Lgpd,
}

impl Regulation {
    pub const ALL: [Regulation; 3] = [Regulation::Gdpr, Regulation::EuAiAct, Regulation::Lgpd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Regulation::Gdpr => "gdpr",
            Regulation::EuAiAct => "eu_ai_act",
            Regulation::Lgpd => "lgpd",
        }
    }

    /// Full legal name.
    pub fn name(&self) -> &'static str {
        match self {
            Regulation::Gdpr => "General Data Protection Regulation (EU)",
            Regulation::EuAiAct => "EU AI Act",
            Regulation::Lgpd => "Lei Geral de Proteção de Dados (Brazil)",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Regulation::Gdpr => "GDPR",
            Regulation::EuAiAct => "EU AI Act",
            Regulation::Lgpd => "LGPD (Brazil)",
        }
    }

    fn valid_names() -> String {
        Regulation::ALL
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse a regulation name, where `all` selects every regulation.
    pub fn parse_selection(s: &str) -> Result<Vec<Regulation>, ComplianceError> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Regulation::ALL.to_vec());
        }
        Ok(vec![s.parse()?])
    }
}

impl std::fmt::Display for Regulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Regulation {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Regulation::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| ComplianceError::UnknownRegulation {
                name: s.to_string(),
                valid: Regulation::valid_names(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Compliant,
    PartiallyCompliant,
    NonCompliant,
    NotAssessed,
}

impl RequirementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementStatus::Compliant => "compliant",
            RequirementStatus::PartiallyCompliant => "partially_compliant",
            RequirementStatus::NonCompliant => "non_compliant",
            RequirementStatus::NotAssessed => "not_assessed",
        }
    }

    /// Roll up `met` of `total` requirements.
    fn from_counts(met: usize, total: usize) -> Self {
        if total > 0 && met == total {
            RequirementStatus::Compliant
        } else if met > 0 {
            RequirementStatus::PartiallyCompliant
        } else {
            RequirementStatus::NonCompliant
        }
    }
}

impl std::fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementStatus::Compliant => write!(f, "Compliant"),
            RequirementStatus::PartiallyCompliant => write!(f, "Partially Compliant"),
            RequirementStatus::NonCompliant => write!(f, "Non-Compliant"),
            RequirementStatus::NotAssessed => write!(f, "Not Assessed"),
        }
    }
}

/// One evidence key within an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementCheck {
    pub requirement: String,
    pub status: RequirementStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

/// Result for one article. Articles checked as a whole carry their evidence
/// directly; articles with itemised requirements carry them in `requirements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleCheck {
    pub article: String,
    pub title: String,
    pub status: RequirementStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<RequirementCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProhibitedPracticesCheck {
    pub practices_checked: Vec<String>,
    pub violations_detected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationCheck {
    pub regulation: Regulation,
    pub regulation_name: String,
    pub system_id: String,
    /// EU AI Act only: `high` or `minimal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_classification: Option<String>,
    pub articles: Vec<ArticleCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prohibited_practices: Option<ProhibitedPracticesCheck>,
    pub overall_status: RequirementStatus,
}

impl RegulationCheck {
    pub fn compliant_articles(&self) -> Vec<&ArticleCheck> {
        self.articles
            .iter()
            .filter(|a| a.status == RequirementStatus::Compliant)
            .collect()
    }

    /// Articles not fully met, including partially compliant ones.
    pub fn gaps(&self) -> Vec<&ArticleCheck> {
        self.articles
            .iter()
            .filter(|a| {
                matches!(
                    a.status,
                    RequirementStatus::NonCompliant | RequirementStatus::PartiallyCompliant
                )
            })
            .collect()
    }
}

struct ArticleTemplate {
    article: &'static str,
    title: &'static str,
    requirements: &'static [&'static str],
}

/// EU AI Act obligations for high-risk systems, by article number.
static EU_AI_ACT_HIGH_RISK: &[(u8, &str)] = &[
    (9, "Risk management system"),
    (10, "Data and data governance"),
    (11, "Technical documentation"),
    (12, "Record-keeping"),
    (13, "Transparency and provision of information to deployers"),
    (14, "Human oversight"),
    (15, "Accuracy, robustness and cybersecurity"),
];

pub static PROHIBITED_PRACTICES: &[&str] = &[
    "subliminal_manipulation",
    "exploitation_of_vulnerabilities",
    "social_scoring_by_governments",
    "real_time_biometric_identification_public",
];

static GDPR_ARTICLE_22: ArticleTemplate = ArticleTemplate {
    article: "article_22",
    title: "Automated decision-making",
    requirements: &[
        "right_not_to_be_subject_to_automated_decision",
        "explicit_consent_or_contract",
        "suitable_safeguards",
        "right_to_human_intervention",
        "right_to_express_point_of_view",
        "right_to_contest_decision",
    ],
};

static LGPD_ARTICLE_20: ArticleTemplate = ArticleTemplate {
    article: "article_20",
    title: "Right to review automated decisions",
    requirements: &["right_to_request_review", "clear_adequate_information"],
};

/// Run the checks for one regulation.
pub fn check_regulation(
    regulation: Regulation,
    profile: &SystemProfile,
    evidence: &EvidenceStore,
) -> RegulationCheck {
    let check = match regulation {
        Regulation::EuAiAct => check_eu_ai_act(profile, evidence),
        Regulation::Gdpr => check_itemised(regulation, &GDPR_ARTICLE_22, profile, evidence),
        Regulation::Lgpd => check_itemised(regulation, &LGPD_ARTICLE_20, profile, evidence),
    };
    info!(
        regulation = %regulation,
        system_id = %profile.system_id,
        status = check.overall_status.as_str(),
        "Compliance check complete"
    );
    check
}

pub fn check_regulations(
    regulations: &[Regulation],
    profile: &SystemProfile,
    evidence: &EvidenceStore,
) -> Vec<RegulationCheck> {
    regulations
        .iter()
        .map(|r| check_regulation(*r, profile, evidence))
        .collect()
}

fn check_eu_ai_act(profile: &SystemProfile, evidence: &EvidenceStore) -> RegulationCheck {
    let high_risk = profile.is_high_risk_eu_ai_act;
    let mut articles = Vec::new();

    if high_risk {
        for (number, title) in EU_AI_ACT_HIGH_RISK {
            let article = format!("article_{number}");
            let found = evidence
                .text(&number.to_string())
                .or_else(|| evidence.text(&article));
            let (status, gaps) = match found {
                Some(_) => (RequirementStatus::Compliant, Vec::new()),
                None => (
                    RequirementStatus::NonCompliant,
                    vec![format!("No evidence for {title}")],
                ),
            };
            articles.push(ArticleCheck {
                article,
                title: title.to_string(),
                status,
                evidence: found,
                gaps,
                requirements: Vec::new(),
            });
        }
    }

    let overall_status = if articles
        .iter()
        .any(|a| a.status == RequirementStatus::NonCompliant)
    {
        RequirementStatus::NonCompliant
    } else if articles
        .iter()
        .any(|a| a.status == RequirementStatus::Compliant)
    {
        RequirementStatus::Compliant
    } else {
        RequirementStatus::NotAssessed
    };

    RegulationCheck {
        regulation: Regulation::EuAiAct,
        regulation_name: Regulation::EuAiAct.short_name().to_string(),
        system_id: profile.system_id.clone(),
        risk_classification: Some(if high_risk { "high" } else { "minimal" }.to_string()),
        articles,
        prohibited_practices: Some(ProhibitedPracticesCheck {
            practices_checked: PROHIBITED_PRACTICES.iter().map(|p| p.to_string()).collect(),
            violations_detected: Vec::new(),
        }),
        overall_status,
    }
}

fn check_itemised(
    regulation: Regulation,
    template: &ArticleTemplate,
    profile: &SystemProfile,
    evidence: &EvidenceStore,
) -> RegulationCheck {
    let requirements: Vec<RequirementCheck> = template
        .requirements
        .iter()
        .map(|key| {
            let found = evidence.text(key);
            RequirementCheck {
                requirement: key.to_string(),
                status: if found.is_some() {
                    RequirementStatus::Compliant
                } else {
                    RequirementStatus::NonCompliant
                },
                evidence: found,
            }
        })
        .collect();

    let met = requirements
        .iter()
        .filter(|r| r.status == RequirementStatus::Compliant)
        .count();
    let status = RequirementStatus::from_counts(met, requirements.len());
    let gaps = requirements
        .iter()
        .filter(|r| r.status != RequirementStatus::Compliant)
        .map(|r| format!("No evidence for {}", r.requirement))
        .collect();

    RegulationCheck {
        regulation,
        regulation_name: regulation.short_name().to_string(),
        system_id: profile.system_id.clone(),
        risk_classification: None,
        articles: vec![ArticleCheck {
            article: template.article.to_string(),
            title: template.title.to_string(),
            status,
            evidence: None,
            gaps,
            requirements,
        }],
        prohibited_practices: None,
        // A partially met article still fails the regulation.
        overall_status: if status == RequirementStatus::Compliant {
            RequirementStatus::Compliant
        } else {
            RequirementStatus::NonCompliant
        },
    }
}
