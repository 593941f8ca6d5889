//! Lifecycle tracker: checkpoint verification and phase transitions.
//!
//! Verification is a functional update. `verify_checkpoint` and `verify_all`
//! return new values and never touch their inputs. `LifecycleRegistry` adds a
//! per-system lock for callers that keep a long-lived status and mutate it
//! from concurrent tasks.

use crate::config::LifecycleConfig;
use crate::error::LifecycleError;
use crate::model::{
    LifecyclePhase, LifecycleStatus, PhaseCheckpoint, PhaseTransition, SystemProfile,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Maximum number of incomplete checkpoints listed in recommended actions.
const MAX_CHECKPOINT_ACTIONS: usize = 3;

/// Read-only view over caller-supplied artifacts and evidence.
///
/// An entry counts as present when its value is truthy: `null`, `false`,
/// `""`, `0`, `[]` and `{}` are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceStore {
    entries: Map<String, Value>,
}

impl EvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key under which evidence for a verification criterion is stored.
    pub fn evidence_key(criterion_id: &str) -> String {
        format!("evidence_{criterion_id}")
    }

    pub fn from_value(value: Value) -> Result<Self, LifecycleError> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            Value::Null => Ok(Self::default()),
            other => Err(LifecycleError::Evidence {
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LifecycleError> {
        let value: Value = serde_json::from_str(json).map_err(|e| LifecycleError::Evidence {
            message: format!("invalid JSON: {e}"),
        })?;
        Self::from_value(value)
    }

    pub fn from_path(path: &Path) -> Result<Self, LifecycleError> {
        let content = std::fs::read_to_string(path).map_err(|e| LifecycleError::Evidence {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).filter(|v| is_truthy(v))
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Present value rendered as text: strings verbatim, anything else as JSON.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(evidence_text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn evidence_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Stateless checkpoint verifier and phase state machine.
#[derive(Debug, Clone)]
pub struct LifecycleTracker {
    verified_by: String,
}

impl Default for LifecycleTracker {
    fn default() -> Self {
        Self::from_config(&LifecycleConfig::default())
    }
}

impl LifecycleTracker {
    pub fn new(verified_by: impl Into<String>) -> Self {
        Self {
            verified_by: verified_by.into(),
        }
    }

    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self::new(config.verified_by.clone())
    }

    /// Fresh status for the profile's current phase. Pure template lookup.
    pub fn initialize(&self, profile: &SystemProfile) -> LifecycleStatus {
        let phase = profile.current_phase;
        LifecycleStatus {
            system_id: profile.system_id.clone(),
            current_phase: phase,
            phase_entry_date: Utc::now(),
            current_phase_checkpoints: checkpoints_for(phase),
            phase_transitions: Vec::new(),
            ready_for_next_phase: false,
            blocking_issues: Vec::new(),
            pending_actions: Vec::new(),
            next_phase: phase.next(),
        }
    }

    /// Verify one checkpoint against the evidence store.
    ///
    /// Missing artifacts block the checkpoint and skip criterion checks.
    pub fn verify_checkpoint(
        &self,
        checkpoint: &PhaseCheckpoint,
        store: &EvidenceStore,
    ) -> PhaseCheckpoint {
        let mut verified = checkpoint.clone();
        verified.verification_date = Some(Utc::now());
        verified.verified_by = Some(self.verified_by.clone());

        let missing: Vec<&String> = checkpoint
            .required_artifacts
            .iter()
            .filter(|artifact| !store.is_present(artifact))
            .collect();

        if !missing.is_empty() {
            verified.blocked = true;
            verified.passed = false;
            verified.blocking_reasons = missing
                .iter()
                .map(|artifact| format!("Missing artifact: {artifact}"))
                .collect();
            debug!(
                checkpoint = %checkpoint.checkpoint_id,
                missing = missing.len(),
                "Checkpoint blocked on missing artifacts"
            );
            return verified;
        }

        verified.blocked = false;
        verified.blocking_reasons.clear();
        for criterion in &mut verified.verification_criteria {
            match store.text(&EvidenceStore::evidence_key(&criterion.criterion_id)) {
                Some(text) => {
                    criterion.passed = true;
                    criterion.evidence = Some(text);
                }
                None => {
                    criterion.passed = false;
                    criterion.evidence = None;
                }
            }
        }
        verified.passed = verified.verification_criteria.iter().all(|c| c.passed);
        verified
    }

    /// Verify every checkpoint of the current phase.
    pub fn verify_all(&self, status: &LifecycleStatus, store: &EvidenceStore) -> LifecycleStatus {
        let mut next = status.clone();
        next.current_phase_checkpoints = status
            .current_phase_checkpoints
            .iter()
            .map(|cp| self.verify_checkpoint(cp, store))
            .collect();
        next.ready_for_next_phase = next.current_phase_checkpoints.iter().all(|cp| cp.passed);
        next.blocking_issues = next
            .current_phase_checkpoints
            .iter()
            .flat_map(|cp| {
                cp.blocking_reasons
                    .iter()
                    .map(move |reason| format!("{}: {}", cp.name, reason))
            })
            .collect();
        next.pending_actions = self.recommended_actions(&next, store);

        info!(
            system_id = %next.system_id,
            phase = %next.current_phase,
            completion = next.phase_completion(),
            ready = next.ready_for_next_phase,
            "Lifecycle checkpoints verified"
        );
        next
    }

    /// Move to `to`, recording which checkpoints had passed.
    ///
    /// Unmet checkpoints do not prevent the transition; they are recorded as
    /// conditions on the transition entry. Leaving the terminal phase is an
    /// error.
    pub fn transition(
        &self,
        status: &mut LifecycleStatus,
        to: LifecyclePhase,
        authorized_by: &str,
    ) -> Result<PhaseTransition, LifecycleError> {
        let from = status.current_phase;
        if from.is_terminal() {
            return Err(LifecycleError::TerminalPhase {
                phase: from.to_string(),
            });
        }
        if !status.ready_for_next_phase {
            warn!(
                system_id = %status.system_id,
                from = %from,
                to = %to,
                "Transitioning with incomplete checkpoints"
            );
        }

        let transition = PhaseTransition {
            transition_id: uuid::Uuid::new_v4().to_string(),
            from_phase: from,
            to_phase: to,
            transition_date: Utc::now(),
            authorized_by: authorized_by.to_string(),
            checkpoints_verified: status
                .current_phase_checkpoints
                .iter()
                .filter(|cp| cp.passed)
                .map(|cp| cp.checkpoint_id.clone())
                .collect(),
            notes: format!("Transition from {} to {}", from.title(), to.title()),
            conditions: status.blocking_issues.clone(),
        };

        status.phase_transitions.push(transition.clone());
        status.current_phase = to;
        status.phase_entry_date = transition.transition_date;
        status.current_phase_checkpoints = checkpoints_for(to);
        status.next_phase = to.next();
        status.ready_for_next_phase = false;
        status.blocking_issues.clear();
        status.pending_actions.clear();

        info!(
            system_id = %status.system_id,
            from = %from,
            to = %to,
            authorized_by,
            "Lifecycle phase transition recorded"
        );
        Ok(transition)
    }

    /// Next steps for the current phase.
    pub fn recommended_actions(
        &self,
        status: &LifecycleStatus,
        store: &EvidenceStore,
    ) -> Vec<String> {
        let mut actions = Vec::new();

        for checkpoint in status
            .incomplete_checkpoints()
            .into_iter()
            .take(MAX_CHECKPOINT_ACTIONS)
        {
            actions.push(format!(
                "Complete checkpoint '{}': {}",
                checkpoint.name, checkpoint.description
            ));
            for artifact in &checkpoint.required_artifacts {
                if !store.is_present(artifact) {
                    actions.push(format!("  - Provide artifact: {artifact}"));
                }
            }
        }

        if status.ready_for_next_phase
            && let Some(next) = status.next_phase
        {
            actions.push(format!("Initiate transition to {} phase", next.title()));
        }

        if actions.is_empty() {
            actions.push("All checkpoints complete. Continue operations.".to_string());
        }
        actions
    }
}

fn checkpoints_for(phase: LifecyclePhase) -> Vec<PhaseCheckpoint> {
    phase
        .checkpoint_templates()
        .iter()
        .map(|template| template.instantiate(phase))
        .collect()
}

/// Per-system lifecycle state with serialized read-modify-write.
#[derive(Default)]
pub struct LifecycleRegistry {
    tracker: LifecycleTracker,
    statuses: Mutex<HashMap<String, Arc<Mutex<LifecycleStatus>>>>,
}

impl LifecycleRegistry {
    pub fn new(tracker: LifecycleTracker) -> Self {
        Self {
            tracker,
            statuses: Mutex::new(HashMap::new()),
        }
    }

    pub fn tracker(&self) -> &LifecycleTracker {
        &self.tracker
    }

    async fn handle(&self, profile: &SystemProfile) -> Arc<Mutex<LifecycleStatus>> {
        let mut statuses = self.statuses.lock().await;
        statuses
            .entry(profile.system_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(self.tracker.initialize(profile))))
            .clone()
    }

    /// Current status, initializing it on first access.
    pub async fn status(&self, profile: &SystemProfile) -> LifecycleStatus {
        let handle = self.handle(profile).await;
        let status = handle.lock().await;
        status.clone()
    }

    pub async fn verify(&self, profile: &SystemProfile, store: &EvidenceStore) -> LifecycleStatus {
        let handle = self.handle(profile).await;
        let mut status = handle.lock().await;
        *status = self.tracker.verify_all(&status, store);
        status.clone()
    }

    pub async fn transition(
        &self,
        profile: &SystemProfile,
        to: LifecyclePhase,
        authorized_by: &str,
    ) -> Result<PhaseTransition, LifecycleError> {
        let handle = self.handle(profile).await;
        let mut status = handle.lock().await;
        self.tracker.transition(&mut status, to, authorized_by)
    }

    /// Number of systems being tracked.
    pub async fn len(&self) -> usize {
        self.statuses.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.statuses.lock().await.is_empty()
    }
}
