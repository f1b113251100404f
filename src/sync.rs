//! Sync — persist the difference between the snapshot and the live flowers.
//!
//! DESIGN
//! ======
//! A save cycle is computed from an owned [`FlowerDiff`] captured at dispatch
//! time, so edits made while the cycle is in flight belong to the next one.
//! Every delete and create is dispatched at once and driven concurrently on
//! the calling task; completions are counted by a per-cycle [`SaveProgress`]
//! in whatever order they arrive. The cycle finishes exactly once, when the
//! count reaches the number of operations. Overlapping cycles each own their
//! own counter and cannot disturb one another.
//!
//! ERROR HANDLING
//! ==============
//! A failed operation still counts as completed. Failures are logged and
//! returned in the [`SaveReport`]; nothing is rolled back and nothing is
//! retried. The reload that follows a save is what brings the client back in
//! line with the server.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::garden::{Flower, FlowerId, GardenId};
use crate::remote::{GardenRemote, RemoteError};

// =============================================================================
// DIFF
// =============================================================================

/// Remote operations needed to turn the snapshot into the live list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowerDiff {
    /// Snapshot flowers whose id no longer appears in the live list.
    pub to_delete: Vec<Flower>,
    /// Live flowers whose id is absent from the snapshot, including every
    /// unsaved flower.
    pub to_create: Vec<Flower>,
}

impl FlowerDiff {
    /// Number of remote calls this diff turns into.
    #[must_use]
    pub fn required(&self) -> usize {
        self.to_delete.len() + self.to_create.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required() == 0
    }

    /// Deletes first, then creates, in list order.
    pub fn into_ops(self) -> impl Iterator<Item = SyncOp> {
        self.to_delete
            .into_iter()
            .map(SyncOp::Delete)
            .chain(self.to_create.into_iter().map(SyncOp::Create))
    }
}

/// Compare by id only, as [`Flower::same_as`] does. A flower without an id
/// matches nothing on either side.
#[must_use]
pub fn diff(snapshot: &[Flower], live: &[Flower]) -> FlowerDiff {
    let live_ids = id_set(live);
    let snapshot_ids = id_set(snapshot);

    let to_delete = snapshot
        .iter()
        .filter(|f| !f.id.is_some_and(|id| live_ids.contains(&id)))
        .cloned()
        .collect();
    let to_create = live
        .iter()
        .filter(|f| !f.id.is_some_and(|id| snapshot_ids.contains(&id)))
        .cloned()
        .collect();

    FlowerDiff { to_delete, to_create }
}

fn id_set(flowers: &[Flower]) -> HashSet<FlowerId> {
    flowers.iter().filter_map(|f| f.id).collect()
}

// =============================================================================
// PROGRESS
// =============================================================================

/// Completion counter for one save cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveProgress {
    pub completed: usize,
    pub required: usize,
}

impl SaveProgress {
    #[must_use]
    pub fn new(required: usize) -> Self {
        Self { completed: 0, required }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed >= self.required
    }

    /// Count one finished operation.
    ///
    /// Returns `true` only on the call that brings `completed` up to
    /// `required`. Calls past completion are ignored.
    pub fn record(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.completed += 1;
        self.completed == self.required
    }
}

// =============================================================================
// OPERATIONS AND REPORTS
// =============================================================================

/// One remote call of a save cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOp {
    Delete(Flower),
    Create(Flower),
}

/// An operation the server did not accept.
#[derive(Debug)]
pub struct SyncFailure {
    pub op: SyncOp,
    pub error: RemoteError,
}

/// Outcome of one save cycle.
#[derive(Debug)]
pub struct SaveReport {
    pub save_id: u64,
    pub progress: SaveProgress,
    pub failures: Vec<SyncFailure>,
}

impl SaveReport {
    #[must_use]
    pub fn required(&self) -> usize {
        self.progress.required
    }

    /// `true` when every operation succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Save-cycle notifications for status indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Started { save_id: u64, required: usize },
    Progress { save_id: u64, progress: SaveProgress },
    /// Sent exactly once per cycle.
    Complete { save_id: u64, progress: SaveProgress, failed: usize },
}

// =============================================================================
// ENGINE
// =============================================================================

pub struct SyncEngine {
    remote: Arc<dyn GardenRemote>,
    next_save_id: AtomicU64,
    subscribers: Vec<mpsc::UnboundedSender<SyncEvent>>,
}

impl SyncEngine {
    #[must_use]
    pub fn new(remote: Arc<dyn GardenRemote>) -> Self {
        Self { remote, next_save_id: AtomicU64::new(1), subscribers: Vec::new() }
    }

    /// Receive [`SyncEvent`]s for every subsequent save cycle.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SyncEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&self, event: &SyncEvent) {
        for tx in &self.subscribers {
            let _ = tx.send(event.clone());
        }
    }

    /// Run one save cycle for `garden_id`.
    ///
    /// Resolves once every operation in `diff` has completed, successfully
    /// or not. An empty diff resolves immediately without remote calls.
    pub async fn save(&self, garden_id: GardenId, diff: FlowerDiff) -> SaveReport {
        let save_id = self.next_save_id.fetch_add(1, Ordering::Relaxed);
        let mut progress = SaveProgress::new(diff.required());
        let mut failures = Vec::new();

        info!(save_id, garden_id, required = progress.required, "save started");
        self.emit(&SyncEvent::Started { save_id, required: progress.required });

        if progress.is_complete() {
            self.finish(save_id, progress, &failures);
            return SaveReport { save_id, progress, failures };
        }

        let mut pending: FuturesUnordered<_> = diff.into_ops().map(|op| self.apply(garden_id, op)).collect();

        while let Some((op, result)) = pending.next().await {
            if let Err(error) = result {
                warn!(save_id, garden_id, ?op, %error, "sync operation failed");
                failures.push(SyncFailure { op, error });
            }
            if progress.record() {
                self.finish(save_id, progress, &failures);
            } else {
                debug!(save_id, completed = progress.completed, required = progress.required, "save progress");
                self.emit(&SyncEvent::Progress { save_id, progress });
            }
        }

        SaveReport { save_id, progress, failures }
    }

    fn finish(&self, save_id: u64, progress: SaveProgress, failures: &[SyncFailure]) {
        info!(save_id, completed = progress.completed, failed = failures.len(), "save complete");
        self.emit(&SyncEvent::Complete { save_id, progress, failed: failures.len() });
    }

    async fn apply(&self, garden_id: GardenId, op: SyncOp) -> (SyncOp, Result<(), RemoteError>) {
        let result = match &op {
            SyncOp::Delete(flower) => match flower.id {
                Some(id) => self.remote.delete_flower(id).await,
                None => {
                    warn!(garden_id, "snapshot flower has no id; nothing to delete");
                    Ok(())
                }
            },
            SyncOp::Create(flower) => self.remote.create_flower(garden_id, flower).await,
        };
        (op, result)
    }
}
