//! Lifecycle tracking across phases, driven by evidence files on disk.

use pretty_assertions::assert_eq;
use rai_core::error::LifecycleError;
use rai_core::lifecycle::{EvidenceStore, LifecycleRegistry, LifecycleTracker};
use rai_core::model::{AiSystemType, LifecyclePhase, SystemProfile};
use serde_json::json;
use std::sync::Arc;

fn profile() -> SystemProfile {
    SystemProfile::new(
        "credit-3",
        "Credit Limit Advisor",
        "Suggests credit limits for existing customers",
        AiSystemType::Regression,
        "Retail Lending",
    )
}

fn business_understanding_evidence() -> serde_json::Value {
    json!({
        "problem_statement": "docs/problem.md",
        "success_criteria": "docs/success.md",
        "risk_screening_form": "forms/screening.pdf",
        "evidence_BU-001-C1": "Objectives signed off",
        "evidence_BU-001-C2": true,
        "evidence_BU-001-C3": ["Risk", "Legal", "Customer Ops"],
        "evidence_BU-002-C1": "medium",
        "evidence_BU-002-C2": 1
    })
}

#[test]
fn test_evidence_file_drives_phase_progression() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evidence.json");
    std::fs::write(&path, business_understanding_evidence().to_string()).unwrap();

    let store = EvidenceStore::from_path(&path).unwrap();
    let tracker = LifecycleTracker::new("Governance Office");
    let profile = profile();

    let status = tracker.initialize(&profile);
    assert_eq!(status.current_phase, LifecyclePhase::BusinessUnderstanding);
    assert_eq!(status.phase_completion(), 0.0);

    let mut status = tracker.verify_all(&status, &store);
    assert!(status.ready_for_next_phase);
    assert!(status.blocking_issues.is_empty());
    assert_eq!(status.phase_completion(), 1.0);
    assert_eq!(
        status.pending_actions,
        vec!["Initiate transition to Design Data Models phase".to_string()]
    );
    for checkpoint in &status.current_phase_checkpoints {
        assert_eq!(checkpoint.verified_by.as_deref(), Some("Governance Office"));
    }

    let transition = tracker
        .transition(&mut status, LifecyclePhase::DesignDataModels, "CRO")
        .unwrap();
    assert_eq!(
        transition.checkpoints_verified,
        vec!["BU-001".to_string(), "BU-002".to_string()]
    );
    assert!(transition.conditions.is_empty());
    assert_eq!(
        transition.notes,
        "Transition from Business Understanding to Design Data Models"
    );

    // The next phase starts from scratch.
    let status = tracker.verify_all(&status, &store);
    assert!(!status.ready_for_next_phase);
    assert_eq!(status.phase_transitions.len(), 1);
    assert_eq!(
        status.blocking_issues,
        vec![
            "Data Quality Gate: Missing artifact: data_profile_report".to_string(),
            "Data Quality Gate: Missing artifact: bias_assessment".to_string(),
            "Privacy Compliance: Missing artifact: dpia".to_string(),
            "Privacy Compliance: Missing artifact: consent_records".to_string(),
        ]
    );
}

#[test]
fn test_falsy_evidence_does_not_count() {
    let store = EvidenceStore::from_value(json!({
        "problem_statement": "",
        "success_criteria": "docs/success.md",
        "risk_screening_form": "forms/screening.pdf",
        "evidence_BU-002-C1": false,
        "evidence_BU-002-C2": 0
    }))
    .unwrap();
    let tracker = LifecycleTracker::default();
    let status = tracker.verify_all(&tracker.initialize(&profile()), &store);

    let problem = &status.current_phase_checkpoints[0];
    assert!(problem.blocked);
    assert_eq!(
        problem.blocking_reasons,
        vec!["Missing artifact: problem_statement".to_string()]
    );

    let screening = &status.current_phase_checkpoints[1];
    assert!(!screening.blocked);
    assert!(!screening.passed);
    assert!(screening.verification_criteria.iter().all(|c| !c.passed));
}

#[test]
fn test_evidence_must_be_an_object() {
    let err = EvidenceStore::from_json("[1, 2, 3]").unwrap_err();
    assert!(matches!(err, LifecycleError::Evidence { .. }));
}

#[test]
fn test_walk_to_shutdown_then_stop() {
    let tracker = LifecycleTracker::default();
    let mut status = tracker.initialize(&profile());
    for window in LifecyclePhase::ORDER.windows(2) {
        let transition = tracker
            .transition(&mut status, window[1], "Board")
            .unwrap();
        assert_eq!(transition.from_phase, window[0]);
        // unverified checkpoints never pass
        assert!(transition.checkpoints_verified.is_empty());
    }
    assert_eq!(status.current_phase, LifecyclePhase::Shutdown);
    assert_eq!(status.next_phase, None);
    assert_eq!(status.phase_transitions.len(), 5);

    let err = tracker
        .transition(&mut status, LifecyclePhase::BusinessUnderstanding, "Board")
        .unwrap_err();
    assert!(matches!(err, LifecycleError::TerminalPhase { .. }));
    assert_eq!(status.phase_transitions.len(), 5);
}

#[tokio::test]
async fn test_registry_tracks_systems_independently() {
    let registry = Arc::new(LifecycleRegistry::default());
    let store = EvidenceStore::from_value(business_understanding_evidence()).unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let registry = registry.clone();
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let mut p = profile();
            p.system_id = format!("credit-{i}");
            let status = registry.verify(&p, &store).await;
            assert!(status.ready_for_next_phase);
            registry
                .transition(&p, LifecyclePhase::DesignDataModels, "CRO")
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        let transition = handle.await.unwrap();
        assert_eq!(transition.to_phase, LifecyclePhase::DesignDataModels);
    }

    assert_eq!(registry.len().await, 8);
    let status = registry.status(&profile()).await;
    assert_eq!(status.system_id, "credit-3");
    assert_eq!(status.current_phase, LifecyclePhase::DesignDataModels);
}
