//! Lifecycle phases, checkpoints and the static per-phase checkpoint templates.

use crate::error::AssessmentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six ordered lifecycle phases. `Shutdown` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    #[default]
    BusinessUnderstanding,
    DesignDataModels,
    ValidationVerification,
    Deployment,
    OperationMonitoring,
    Shutdown,
}

impl LifecyclePhase {
    pub const ORDER: [LifecyclePhase; 6] = [
        LifecyclePhase::BusinessUnderstanding,
        LifecyclePhase::DesignDataModels,
        LifecyclePhase::ValidationVerification,
        LifecyclePhase::Deployment,
        LifecyclePhase::OperationMonitoring,
        LifecyclePhase::Shutdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::BusinessUnderstanding => "business_understanding",
            LifecyclePhase::DesignDataModels => "design_data_models",
            LifecyclePhase::ValidationVerification => "validation_verification",
            LifecyclePhase::Deployment => "deployment",
            LifecyclePhase::OperationMonitoring => "operation_monitoring",
            LifecyclePhase::Shutdown => "shutdown",
        }
    }

    /// Human-readable name, e.g. "Validation Verification".
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
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

    /// Successor in the fixed ordering, `None` for the terminal phase.
    pub fn next(&self) -> Option<LifecyclePhase> {
        let idx = Self::ORDER.iter().position(|p| p == self)?;
        Self::ORDER.get(idx + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Checkpoint templates that gate this phase.
    pub fn checkpoint_templates(&self) -> &'static [CheckpointTemplate] {
        match self {
            LifecyclePhase::BusinessUnderstanding => BUSINESS_UNDERSTANDING_CHECKPOINTS,
            LifecyclePhase::DesignDataModels => DESIGN_DATA_MODELS_CHECKPOINTS,
            LifecyclePhase::ValidationVerification => VALIDATION_VERIFICATION_CHECKPOINTS,
            LifecyclePhase::Deployment => DEPLOYMENT_CHECKPOINTS,
            LifecyclePhase::OperationMonitoring => OPERATION_MONITORING_CHECKPOINTS,
            LifecyclePhase::Shutdown => SHUTDOWN_CHECKPOINTS,
        }
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LifecyclePhase {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ORDER
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| AssessmentError::UnknownPhase {
                name: s.to_string(),
                valid: Self::ORDER
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// A single check inside a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationCriterion {
    pub criterion_id: String,
    pub description: String,
    pub verification_method: String,
    #[serde(default)]
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A named gate within a lifecycle phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseCheckpoint {
    pub checkpoint_id: String,
    pub phase: LifecyclePhase,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required_artifacts: Vec<String>,
    #[serde(default)]
    pub required_approvals: Vec<String>,
    #[serde(default)]
    pub verification_criteria: Vec<VerificationCriterion>,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub blocking_reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
}

/// A record of a phase change. Transitions are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub transition_id: String,
    pub from_phase: LifecyclePhase,
    pub to_phase: LifecyclePhase,
    pub transition_date: DateTime<Utc>,
    pub authorized_by: String,
    #[serde(default)]
    pub checkpoints_verified: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub conditions: Vec<String>,
}

/// Per-system lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleStatus {
    pub system_id: String,
    pub current_phase: LifecyclePhase,
    pub phase_entry_date: DateTime<Utc>,
    #[serde(default)]
    pub current_phase_checkpoints: Vec<PhaseCheckpoint>,
    #[serde(default)]
    pub phase_transitions: Vec<PhaseTransition>,
    #[serde(default)]
    pub ready_for_next_phase: bool,
    #[serde(default)]
    pub blocking_issues: Vec<String>,
    #[serde(default)]
    pub pending_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_phase: Option<LifecyclePhase>,
}

impl LifecycleStatus {
    pub fn incomplete_checkpoints(&self) -> Vec<&PhaseCheckpoint> {
        self.current_phase_checkpoints
            .iter()
            .filter(|cp| !cp.passed)
            .collect()
    }

    /// Fraction of checkpoints passed. A phase with no checkpoints is complete.
    pub fn phase_completion(&self) -> f64 {
        if self.current_phase_checkpoints.is_empty() {
            return 1.0;
        }
        let passed = self
            .current_phase_checkpoints
            .iter()
            .filter(|cp| cp.passed)
            .count();
        passed as f64 / self.current_phase_checkpoints.len() as f64
    }
}

/// Static description of a verification criterion.
#[derive(Debug, Clone, Copy)]
pub struct CriterionTemplate {
    pub id: &'static str,
    pub description: &'static str,
    pub method: &'static str,
}

/// Static description of a checkpoint, instantiated per system.
#[derive(Debug, Clone, Copy)]
pub struct CheckpointTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub required_artifacts: &'static [&'static str],
    pub criteria: &'static [CriterionTemplate],
}

impl CheckpointTemplate {
    pub fn instantiate(&self, phase: LifecyclePhase) -> PhaseCheckpoint {
        PhaseCheckpoint {
            checkpoint_id: self.id.to_string(),
            phase,
            name: self.name.to_string(),
            description: self.description.to_string(),
            required_artifacts: self.required_artifacts.iter().map(|a| a.to_string()).collect(),
            required_approvals: Vec::new(),
            verification_criteria: self
                .criteria
                .iter()
                .map(|c| VerificationCriterion {
                    criterion_id: c.id.to_string(),
                    description: c.description.to_string(),
                    verification_method: c.method.to_string(),
                    passed: false,
                    evidence: None,
                    notes: None,
                })
                .collect(),
            passed: false,
            blocked: false,
            blocking_reasons: Vec::new(),
            verification_date: None,
            verified_by: None,
        }
    }
}

pub static BUSINESS_UNDERSTANDING_CHECKPOINTS: &[CheckpointTemplate] = &[
    CheckpointTemplate {
        id: "BU-001",
        name: "Problem Definition",
        description: "Clear articulation of the business problem and AI suitability",
        required_artifacts: &["problem_statement", "success_criteria"],
        criteria: &[
            CriterionTemplate {
                id: "BU-001-C1",
                description: "Problem is clearly defined with measurable objectives",
                method: "Document review",
            },
            CriterionTemplate {
                id: "BU-001-C2",
                description: "AI is appropriate solution for this problem",
                method: "Feasibility analysis",
            },
            CriterionTemplate {
                id: "BU-001-C3",
                description: "Stakeholders are identified and consulted",
                method: "Stakeholder register review",
            },
        ],
    },
    CheckpointTemplate {
        id: "BU-002",
        name: "Initial Risk Screening",
        description: "Preliminary risk and impact assessment",
        required_artifacts: &["risk_screening_form"],
        criteria: &[
            CriterionTemplate {
                id: "BU-002-C1",
                description: "Risk level is determined (low/medium/high)",
                method: "Risk assessment review",
            },
            CriterionTemplate {
                id: "BU-002-C2",
                description: "EU AI Act classification completed if applicable",
                method: "Classification checklist",
            },
        ],
    },
];

pub static DESIGN_DATA_MODELS_CHECKPOINTS: &[CheckpointTemplate] = &[
    CheckpointTemplate {
        id: "DDM-001",
        name: "Data Quality Gate",
        description: "Data quality and representativeness verification",
        required_artifacts: &["data_profile_report", "bias_assessment"],
        criteria: &[
            CriterionTemplate {
                id: "DDM-001-C1",
                description: "Data quality meets defined standards",
                method: "Data profiling",
            },
            CriterionTemplate {
                id: "DDM-001-C2",
                description: "Data is representative of target population",
                method: "Representation analysis",
            },
            CriterionTemplate {
                id: "DDM-001-C3",
                description: "No prohibited data usage",
                method: "Data governance review",
            },
        ],
    },
    CheckpointTemplate {
        id: "DDM-002",
        name: "Privacy Compliance",
        description: "Data privacy and protection requirements met",
        required_artifacts: &["dpia", "consent_records"],
        criteria: &[
            CriterionTemplate {
                id: "DDM-002-C1",
                description: "DPIA completed for personal data processing",
                method: "DPIA review",
            },
            CriterionTemplate {
                id: "DDM-002-C2",
                description: "Legal basis for data processing established",
                method: "Legal review",
            },
        ],
    },
];

pub static VALIDATION_VERIFICATION_CHECKPOINTS: &[CheckpointTemplate] = &[CheckpointTemplate {
    id: "VV-001",
    name: "Model Validation",
    description: "Model performance and fairness validation",
    required_artifacts: &["validation_report", "fairness_metrics"],
    criteria: &[
        CriterionTemplate {
            id: "VV-001-C1",
            description: "Model meets performance thresholds",
            method: "Performance testing",
        },
        CriterionTemplate {
            id: "VV-001-C2",
            description: "Fairness metrics within acceptable bounds",
            method: "Fairness analysis",
        },
        CriterionTemplate {
            id: "VV-001-C3",
            description: "Edge cases and failure modes documented",
            method: "Edge case testing",
        },
    ],
}];

pub static DEPLOYMENT_CHECKPOINTS: &[CheckpointTemplate] = &[
    CheckpointTemplate {
        id: "DEP-001",
        name: "Deployment Readiness",
        description: "System ready for production deployment",
        required_artifacts: &["deployment_plan", "rollback_procedures"],
        criteria: &[
            CriterionTemplate {
                id: "DEP-001-C1",
                description: "Infrastructure and security requirements met",
                method: "Infrastructure review",
            },
            CriterionTemplate {
                id: "DEP-001-C2",
                description: "Monitoring and alerting configured",
                method: "Monitoring verification",
            },
            CriterionTemplate {
                id: "DEP-001-C3",
                description: "User documentation and training complete",
                method: "Documentation review",
            },
        ],
    },
    CheckpointTemplate {
        id: "DEP-002",
        name: "AIA Approval",
        description: "Algorithmic Impact Assessment approved",
        required_artifacts: &["aia_report", "approval_record"],
        criteria: &[
            CriterionTemplate {
                id: "DEP-002-C1",
                description: "AIA completed and reviewed",
                method: "AIA review",
            },
            CriterionTemplate {
                id: "DEP-002-C2",
                description: "Governance board approval obtained",
                method: "Approval record",
            },
        ],
    },
];

pub static OPERATION_MONITORING_CHECKPOINTS: &[CheckpointTemplate] = &[CheckpointTemplate {
    id: "OM-001",
    name: "Ongoing Monitoring Review",
    description: "Regular monitoring and performance review",
    required_artifacts: &["monitoring_report"],
    criteria: &[
        CriterionTemplate {
            id: "OM-001-C1",
            description: "Performance within acceptable bounds",
            method: "Performance metrics review",
        },
        CriterionTemplate {
            id: "OM-001-C2",
            description: "No significant drift detected",
            method: "Drift analysis",
        },
        CriterionTemplate {
            id: "OM-001-C3",
            description: "User feedback addressed",
            method: "Feedback review",
        },
    ],
}];

pub static SHUTDOWN_CHECKPOINTS: &[CheckpointTemplate] = &[CheckpointTemplate {
    id: "SD-001",
    name: "Decommissioning Verification",
    description: "System properly decommissioned",
    required_artifacts: &["decommission_record", "data_disposal_record"],
    criteria: &[
        CriterionTemplate {
            id: "SD-001-C1",
            description: "Data properly disposed or archived",
            method: "Data disposal verification",
        },
        CriterionTemplate {
            id: "SD-001-C2",
            description: "Lessons learned documented",
            method: "Post-mortem review",
        },
    ],
}];
