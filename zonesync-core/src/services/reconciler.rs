//! Drift detection and repair

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::{CoreError, CoreResult, SyncOperation};
use crate::services::ServiceContext;
use crate::types::{ReconcileOutcome, ReconcileReport, Zone, ZoneReconcileResult};
use crate::utils::domain::validate_domain_name;

/// 同步状态校对服务
///
/// Fetches the authoritative state of every stored zone and overwrites the stored snapshot
/// when it differs. One zone failing never stops the pass. The stored provider config is
/// left as it is; only the snapshot and the remote zone id are written.
pub struct Reconciler {
    ctx: Arc<ServiceContext>,
    concurrency: usize,
}

impl Reconciler {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            concurrency: 1,
        }
    }

    /// Reconcile up to `n` zones at a time. Report order still follows zone order.
    #[must_use]
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Reconcile every stored zone.
    ///
    /// Only a failure to list the zones is returned as an error; per-zone failures are
    /// reported as [`ReconcileOutcome::Failed`].
    pub async fn run(&self) -> CoreResult<ReconcileReport> {
        let zones = self.ctx.record_store.list_zones().await?;
        log::info!("Reconciling {} zone(s)", zones.len());

        let results: Vec<ZoneReconcileResult> = stream::iter(zones)
            .map(|zone| self.reconcile(zone))
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = ReconcileReport { results };
        log::info!(
            "Reconciliation finished: {} updated, {} up-to-date, {} failed",
            report.updated_count(),
            report.consistent_count(),
            report.failed_count()
        );
        Ok(report)
    }

    /// Reconcile a single zone. Fails with `DomainNotFound` if it is not stored locally.
    pub async fn run_zone(&self, domain_name: &str) -> CoreResult<ZoneReconcileResult> {
        let domain = validate_domain_name(domain_name)?;
        let zone = self
            .ctx
            .record_store
            .find_zone_by_name(&domain)
            .await?
            .ok_or(CoreError::DomainNotFound(domain))?;
        Ok(self.reconcile(zone).await)
    }

    async fn reconcile(&self, zone: Zone) -> ZoneReconcileResult {
        let _guard = self.ctx.domain_locks().acquire(&zone.domain_name).await;

        let outcome = match self.refresh(&zone).await {
            Ok(true) => {
                log::info!("[{}] Zone '{}' updated", zone.provider_id(), zone.domain_name);
                ReconcileOutcome::Updated
            }
            Ok(false) => {
                log::debug!(
                    "[{}] Zone '{}' is up-to-date",
                    zone.provider_id(),
                    zone.domain_name
                );
                ReconcileOutcome::AlreadyConsistent
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Failed to reconcile '{}': {e}", zone.domain_name);
                } else {
                    log::error!("Failed to reconcile '{}': {e}", zone.domain_name);
                }
                ReconcileOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        ZoneReconcileResult {
            domain_name: zone.domain_name,
            outcome,
        }
    }

    /// Returns whether the stored zone was changed.
    ///
    /// The snapshot goes to its own column; `provider_config` is never touched.
    async fn refresh(&self, zone: &Zone) -> CoreResult<bool> {
        const OP: SyncOperation = SyncOperation::Reconcile;
        let domain = zone.domain_name.as_str();

        let provider = self.ctx.resolve_provider(&zone.provider_config).await?;
        let snapshot = provider
            .get_zone(domain)
            .await
            .map_err(|e| CoreError::provider(OP, domain, e))?;

        let remote_zone_id = snapshot.remote_id.clone().or_else(|| zone.remote_zone_id.clone());
        if zone.snapshot.as_ref() == Some(&snapshot) && remote_zone_id == zone.remote_zone_id {
            return Ok(false);
        }

        let updated = self
            .ctx
            .record_store
            .update_zone_snapshot(zone.id, &snapshot, remote_zone_id)
            .await
            .map_err(|e| CoreError::persistence(OP, domain, &e))?;
        if !updated {
            return Err(CoreError::DomainNotFound(domain.to_string()));
        }
        Ok(true)
    }
}
