use super::{Notification, Notifier, StatsSource, VoteStore};
use crate::error::ToggleError;
use crate::models::{Resident, ResidentSet, VoteRecord};
use crate::stats::StatsSnapshot;
use log::{error, info, warn};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Result of an explicit stats refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The resident set is empty, the stats source was not called.
    Skipped,
    Updated,
    /// A fetch issued later has already replaced the snapshot, this result
    /// was dropped.
    Superseded,
    /// The fetch failed and the previous snapshot was kept.
    Failed,
}

// Snapshot tagged with the refresh token of the fetch that produced it
#[derive(Debug, Default)]
struct CurrentStats {
    token: u64,
    stats: StatsSnapshot,
}

/// Owns the local resident view and the stats snapshot shown next to it, and
/// runs the optimistic toggle protocol against the remote store.
///
/// Locks are never held across a remote call. With `serialize_toggles`
/// enabled (the default) a second toggle for a resident whose first toggle
/// has not resolved yet is rejected with [`ToggleError::InFlight`]. Without
/// it, interleaved toggles on one resident are unguarded and the later call
/// may roll back to a flag the earlier call has since replaced.
///
/// Every stats fetch takes a token from a monotonic counter; a response is
/// only applied if no fetch issued after it has been applied already.
pub struct ToggleController {
    residents: Mutex<ResidentSet>,
    snapshot: RwLock<CurrentStats>,
    refresh_token: AtomicU64,
    pending: Mutex<HashSet<String>>,
    store: Arc<dyn VoteStore>,
    stats: Arc<dyn StatsSource>,
    notifier: Arc<dyn Notifier>,
    serialize_toggles: bool,
}

impl ToggleController {
    pub fn new(
        residents: ResidentSet,
        store: Arc<dyn VoteStore>,
        stats: Arc<dyn StatsSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            residents: Mutex::new(residents),
            snapshot: RwLock::new(CurrentStats::default()),
            refresh_token: AtomicU64::new(0),
            pending: Mutex::new(HashSet::new()),
            store,
            stats,
            notifier,
            serialize_toggles: true,
        }
    }

    pub fn serialize_toggles(mut self, enabled: bool) -> Self {
        self.serialize_toggles = enabled;
        self
    }

    pub async fn flag(&self, resident_id: &str) -> Option<bool> {
        self.residents.lock().await.flag(resident_id)
    }

    pub async fn residents(&self) -> ResidentSet {
        self.residents.lock().await.clone()
    }

    pub async fn snapshot(&self) -> StatsSnapshot {
        self.snapshot.read().await.stats.clone()
    }

    /// Flips the voting flag of one resident. `current_flag` is the value the
    /// caller last saw; the requested flag is its inverse and the rollback
    /// target is `current_flag` itself.
    ///
    /// On success the stats are refreshed and the applied flag is returned.
    /// On a persistence failure the local flag is restored, the stats are
    /// left alone and the failure is both notified and returned.
    ///
    /// A toggle rejected because another one for the same resident is still
    /// pending changes nothing but is notified as a failure as well.
    pub async fn toggle(&self, resident_id: &str, current_flag: bool) -> Result<bool, ToggleError> {
        if self.serialize_toggles && !self.pending.lock().await.insert(resident_id.to_string()) {
            warn!("Rejected toggle for resident {}: previous update still pending", resident_id);
            self.notifier.notify(Notification::vote_failed());
            return Err(ToggleError::InFlight(resident_id.to_string()));
        }

        let result = self.apply_toggle(VoteRecord::toggle(resident_id, current_flag)).await;

        if self.serialize_toggles {
            self.pending.lock().await.remove(resident_id);
        }
        result
    }

    async fn apply_toggle(&self, record: VoteRecord<'_>) -> Result<bool, ToggleError> {
        let resident_id = record.resident_id;
        info!(
            "Toggling vote for resident {}: {} -> {}",
            resident_id, record.previous_flag, record.requested_flag
        );

        // Optimistic apply
        if self
            .residents
            .lock()
            .await
            .set_flag(resident_id, record.requested_flag)
            .is_none()
        {
            warn!("Toggle requested for unknown resident {}", resident_id);
            return Err(ToggleError::UnknownResident(resident_id.to_string()));
        }

        if let Err(e) = self.store.persist_vote(resident_id, record.requested_flag).await {
            error!("Failed to persist vote for resident {}: {}", resident_id, e);
            self.residents
                .lock()
                .await
                .set_flag(resident_id, record.previous_flag);
            self.notifier.notify(Notification::vote_failed());
            return Err(ToggleError::Persist {
                resident_id: resident_id.to_string(),
                source: e,
            });
        }

        self.fetch_stats().await;
        self.notifier.notify(Notification::vote_applied(record.requested_flag));
        info!("Vote for resident {} set to {}", resident_id, record.requested_flag);
        Ok(record.requested_flag)
    }

    /// Replaces the local resident view after an external change (reload,
    /// create, delete) and recomputes the stats for it.
    ///
    /// An empty replacement skips the recomputation and leaves the current
    /// snapshot in place; it is not cleared.
    pub async fn replace_residents(&self, residents: Vec<Resident>) -> Refresh {
        *self.residents.lock().await = ResidentSet::new(residents);
        self.refresh_stats().await
    }

    /// Explicit recomputation trigger. Does nothing while the resident set
    /// is empty.
    pub async fn refresh_stats(&self) -> Refresh {
        if self.residents.lock().await.is_empty() {
            return Refresh::Skipped;
        }
        self.fetch_stats().await
    }

    async fn fetch_stats(&self) -> Refresh {
        let token = self.refresh_token.fetch_add(1, Ordering::SeqCst) + 1;
        match self.stats.fetch_voting_stats().await {
            Ok(snapshot) => {
                let mut current = self.snapshot.write().await;
                if current.token > token {
                    info!("Dropped stats refresh {}: refresh {} already applied", token, current.token);
                    return Refresh::Superseded;
                }
                *current = CurrentStats {
                    token,
                    stats: snapshot,
                };
                Refresh::Updated
            }
            Err(e) => {
                error!("Failed to load voting stats: {}", e);
                Refresh::Failed
            }
        }
    }
}
