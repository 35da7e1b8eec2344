//! Reconciliation result types

use serde::Serialize;

/// Result of reconciling one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ReconcileOutcome {
    /// Drift was found and the stored snapshot replaced.
    Updated,
    /// Stored snapshot already matched the provider.
    AlreadyConsistent,
    /// The zone could not be reconciled; other zones are unaffected.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneReconcileResult {
    pub domain_name: String,
    pub outcome: ReconcileOutcome,
}

/// Per-zone results of one reconciliation pass, in zone order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub results: Vec<ZoneReconcileResult>,
}

impl ReconcileReport {
    pub fn updated_count(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Updated))
    }

    pub fn consistent_count(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::AlreadyConsistent))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Failed { .. }))
    }

    /// No zone needed an update and none failed.
    pub fn is_clean(&self) -> bool {
        self.results
            .iter()
            .all(|r| r.outcome == ReconcileOutcome::AlreadyConsistent)
    }

    /// Outcome for `domain_name`, if it was part of the pass.
    pub fn outcome_for(&self, domain_name: &str) -> Option<&ReconcileOutcome> {
        self.results
            .iter()
            .find(|r| r.domain_name == domain_name)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&ReconcileOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}
