//! Transparency: documentation completeness.

use super::keywords::MIN_DESCRIPTION_CHARS;
use super::rules::Rule;
use super::{EvaluationContext, Evaluator, RecommendationBlocks};
use crate::model::profile::DEFAULT_VERSION;
use crate::model::{Principle, RemediationEffort, Severity, SystemProfile};

#[derive(Debug, Clone, Copy, Default)]
pub struct TransparencyEvaluator;

fn brief_description(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.description.chars().count() < MIN_DESCRIPTION_CHARS
}

fn no_architecture(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.architecture().is_none()
}

fn no_training_data(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.training_data().is_none()
}

fn data_types_incomplete(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.input_data_types.is_empty() || p.output_data_types.is_empty()
}

fn no_use_cases(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.use_cases.is_empty()
}

fn no_prohibited_uses(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.prohibited_uses.is_empty()
}

fn default_version(p: &SystemProfile, _: &EvaluationContext) -> bool {
    p.version == DEFAULT_VERSION
}

static RULES: &[Rule] = &[
    Rule::new(
        "001",
        "documentation",
        Severity::Medium,
        0.10,
        RemediationEffort::Low,
        "System description is too brief for adequate understanding",
        "Provide detailed system description including purpose, functionality, and scope",
        brief_description,
    )
    .weakness("Insufficient system documentation")
    .strength(|_| Some("Adequate system description provided".to_string())),
    Rule::new(
        "002",
        "documentation",
        Severity::Medium,
        0.15,
        RemediationEffort::Medium,
        "Model architecture not documented",
        "Document model architecture for technical transparency and auditability",
        no_architecture,
    )
    .weakness("Missing model architecture documentation")
    .strength(|p| {
        p.architecture()
            .map(|arch| format!("Model architecture documented: {arch}"))
    }),
    Rule::new(
        "003",
        "documentation",
        Severity::High,
        0.20,
        RemediationEffort::Medium,
        "Training data sources not documented",
        "Create data sheet documenting training data sources, collection methods, and limitations",
        no_training_data,
    )
    .weakness("No training data documentation")
    .strength(|_| Some("Training data sources documented".to_string())),
    Rule::new(
        "004",
        "documentation",
        Severity::Medium,
        0.10,
        RemediationEffort::Low,
        "Input and/or output data types not specified",
        "Document all input and output data types for operational transparency",
        data_types_incomplete,
    )
    .strength(|p| {
        Some(format!(
            "Data types documented: {} inputs, {} outputs",
            p.input_data_types.len(),
            p.output_data_types.len()
        ))
    }),
    Rule::new(
        "005",
        "documentation",
        Severity::Low,
        0.05,
        RemediationEffort::Low,
        "Specific use cases not documented",
        "Document intended use cases to clarify system purpose and appropriate use",
        no_use_cases,
    )
    .strength(|p| Some(format!("{} use cases documented", p.use_cases.len()))),
    Rule::new(
        "006",
        "documentation",
        Severity::Medium,
        0.10,
        RemediationEffort::Low,
        "Prohibited uses not specified",
        "Define and document prohibited uses to prevent misuse",
        no_prohibited_uses,
    )
    .weakness("No prohibited uses documented")
    .strength(|p| {
        Some(format!(
            "{} prohibited uses documented",
            p.prohibited_uses.len()
        ))
    }),
    Rule::new(
        "007",
        "auditability",
        Severity::Low,
        0.05,
        RemediationEffort::Low,
        "Version appears to be default - verify version tracking is in place",
        "Implement semantic versioning with change documentation",
        default_version,
    ),
];

const BLOCKS: RecommendationBlocks = RecommendationBlocks {
    below_0_7: &[
        "Create comprehensive Model Card following Google/Hugging Face template",
        "Implement user-facing explanation interface for AI decisions",
        "Develop Data Sheet for training datasets",
        "Establish clear AI disclosure policy for affected stakeholders",
    ],
    below_0_5: &[
        "Conduct transparency gap assessment with stakeholder input",
        "Implement explainability tools (SHAP, LIME) for model interpretation",
        "Create tiered explanation system for different audience levels",
    ],
};

impl Evaluator for TransparencyEvaluator {
    fn principle(&self) -> Principle {
        Principle::Transparency
    }

    fn name(&self) -> &'static str {
        "TransparencyEvaluator"
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }

    fn confidence(&self) -> f64 {
        0.80
    }

    fn methodology(&self) -> &'static str {
        "Documentation analysis + completeness checks"
    }

    fn recommendation_blocks(&self) -> RecommendationBlocks {
        BLOCKS
    }

    fn advisory_focus(&self) -> &'static [&'static str] {
        &[
            "Model documentation (model cards)",
            "Data documentation (data sheets)",
            "Decision explainability",
            "User-facing disclosures",
            "Audit trail completeness",
        ]
    }
}
