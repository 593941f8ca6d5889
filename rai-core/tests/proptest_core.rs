//! Property-based tests for scoring and lifecycle invariants using proptest.

use proptest::prelude::*;

use rai_core::assessment::aia::determine_recommendation;
use rai_core::evaluators::{EvaluationContext, apply_rules, default_evaluators};
use rai_core::model::{
    AiSystemType, AiaRecommendation, ComplianceStatus, Impact, LifecyclePhase, Likelihood, Risk,
    RiskCategory, RiskLevel, SystemProfile,
};

fn system_type() -> impl Strategy<Value = AiSystemType> {
    prop_oneof![
        Just(AiSystemType::Classification),
        Just(AiSystemType::Regression),
        Just(AiSystemType::Generative),
        Just(AiSystemType::Recommendation),
        Just(AiSystemType::Nlp),
        Just(AiSystemType::ComputerVision),
        Just(AiSystemType::Autonomous),
        Just(AiSystemType::Multimodal),
        Just(AiSystemType::Other),
    ]
}

fn risk_level() -> impl Strategy<Value = RiskLevel> {
    prop_oneof![
        Just(RiskLevel::Low),
        Just(RiskLevel::Medium),
        Just(RiskLevel::High),
        Just(RiskLevel::Critical),
    ]
}

fn phase() -> impl Strategy<Value = LifecyclePhase> {
    (0usize..6).prop_map(|i| LifecyclePhase::ORDER[i])
}

fn words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just("personal data".to_string()),
            Just("GDPR".to_string()),
            Just("possible bias".to_string()),
            "[a-z ]{1,20}",
        ],
        0..4,
    )
}

prop_compose! {
    fn profile()(
        system_type in system_type(),
        risk_level in risk_level(),
        phase in phase(),
        high_risk in any::<bool>(),
        owner in prop_oneof![Just(String::new()), "[A-Za-z ]{1,12}"],
        description in "[a-z ]{0,80}",
        sector in prop::option::of(prop_oneof![
            Just("healthcare".to_string()),
            Just("finance".to_string()),
            Just("employment".to_string()),
            Just("retail".to_string()),
        ]),
        training in prop::option::of("[a-z ]{1,30}"),
        operators in words(),
        populations in words(),
        regulations in words(),
        inputs in words(),
        limitations in words(),
        use_cases in words(),
        prohibited in words(),
    ) -> SystemProfile {
        let mut p = SystemProfile::new("prop", "Prop System", description, system_type, owner)
            .with_risk_level(risk_level)
            .with_phase(phase)
            .with_high_risk(high_risk);
        p.industry_sector = sector;
        p.training_data_description = training;
        p.operators = operators;
        p.affected_populations = populations;
        p.applicable_regulations = regulations;
        p.input_data_types = inputs;
        p.known_limitations = limitations;
        p.use_cases = use_cases;
        p.prohibited_uses = prohibited;
        p
    }
}

// --- Scoring properties ---

proptest! {
    #[test]
    fn scores_stay_in_unit_interval(profile in profile(), monitored in any::<bool>()) {
        let ctx = EvaluationContext::new().with_monitoring(monitored);
        for evaluator in default_evaluators() {
            let outcome = apply_rules(evaluator.principle(), evaluator.rules(), &profile, &ctx);
            prop_assert!((0.0..=1.0).contains(&outcome.score));
            let expected = (1.0 - outcome.total_deduction).clamp(0.0, 1.0);
            prop_assert!((outcome.score - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn finding_ids_are_unique_and_prefixed(profile in profile()) {
        let ctx = EvaluationContext::new();
        for evaluator in default_evaluators() {
            let principle = evaluator.principle();
            let outcome = apply_rules(principle, evaluator.rules(), &profile, &ctx);
            let mut ids: Vec<_> = outcome.findings.iter().map(|f| f.finding_id.clone()).collect();
            for id in &ids {
                let prefix = format!("{}-", principle.id_prefix());
                prop_assert!(id.starts_with(&prefix));
            }
            let before = ids.len();
            ids.dedup();
            prop_assert_eq!(before, ids.len());
        }
    }

    #[test]
    fn compliance_status_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let rank = |s: ComplianceStatus| match s {
            ComplianceStatus::NonCompliant | ComplianceStatus::NotAssessed => 0,
            ComplianceStatus::PartiallyCompliant => 1,
            ComplianceStatus::Compliant => 2,
        };
        prop_assert!(rank(ComplianceStatus::from_score(lo)) <= rank(ComplianceStatus::from_score(hi)));
    }
}

// --- Recommendation properties ---

proptest! {
    #[test]
    fn critical_findings_always_block(profile in profile()) {
        let ctx = EvaluationContext::new();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let evaluations: Vec<_> = runtime.block_on(async {
            let mut out = Vec::new();
            for evaluator in default_evaluators() {
                out.push(evaluator.evaluate(&profile, &ctx).await);
            }
            out
        });

        let has_critical = evaluations.iter().any(|e| !e.critical_findings().is_empty());
        let recommendation = determine_recommendation(&evaluations);
        if has_critical {
            prop_assert_eq!(recommendation, AiaRecommendation::DoNotProceed);
        }
        if recommendation == AiaRecommendation::Proceed {
            prop_assert!(evaluations.iter().all(|e| e.score >= 0.6));
        }
    }
}

// --- Lifecycle and risk properties ---

proptest! {
    #[test]
    fn next_phase_is_strictly_later(i in 0usize..6) {
        let phase = LifecyclePhase::ORDER[i];
        match phase.next() {
            Some(next) => prop_assert!(next > phase),
            None => prop_assert!(phase.is_terminal()),
        }
    }

    #[test]
    fn risk_score_is_product_of_ranks(l in 0usize..5, i in 0usize..5) {
        let likelihoods = [
            Likelihood::Rare,
            Likelihood::Unlikely,
            Likelihood::Possible,
            Likelihood::Likely,
            Likelihood::AlmostCertain,
        ];
        let impacts = [
            Impact::Negligible,
            Impact::Minor,
            Impact::Moderate,
            Impact::Major,
            Impact::Catastrophic,
        ];
        let risk = Risk::new("R-1", "risk", RiskCategory::Technical, likelihoods[l], impacts[i]);
        prop_assert_eq!(risk.risk_score() as usize, (l + 1) * (i + 1));
        prop_assert!((1..=25).contains(&risk.risk_score()));
    }
}
