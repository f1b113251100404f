//! Garden state for the active editing session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Holds the one "current" garden (or none), the live flower list the user
//! edits, and the [`Snapshot`] of the flowers as last loaded or saved. The
//! snapshot is the baseline the sync engine diffs against; it is only ever
//! replaced wholesale, never edited.
//!
//! Every mutation is announced as a [`GardenEvent`] so the renderer and any
//! status indicators can react without this module knowing about them.

#[cfg(test)]
#[path = "garden_test.rs"]
mod garden_test;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::garden::{Comment, Flower, FlowerColor, Garden, GardenId, NO_GARDEN};
use crate::hit;
use crate::remote::{GardenRemote, RemoteError};
use crate::sync::{self, FlowerDiff};
use crate::viewport::Point;

/// Save indicator shown next to the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveStatus {
    /// Freshly loaded; nothing to report.
    #[default]
    Idle,
    /// Local edits have not been saved.
    Unsaved,
    /// A save cycle is in flight.
    Saving,
    /// The last save cycle finished.
    Saved,
}

/// Change notifications. Any of them means "redraw from current state".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GardenEvent {
    /// No garden is selected; the surface should be blank.
    Cleared,
    /// A garden was loaded and replaced the previous one.
    Loaded(GardenId),
    FlowersChanged,
    CommentsChanged,
    /// Presentation changed (e.g. flower size) without a data change.
    Redraw,
    SaveStatus(SaveStatus),
}

/// Independent copy of a flower list taken at load or save time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot(Vec<Flower>);

impl Snapshot {
    #[must_use]
    pub fn capture(flowers: &[Flower]) -> Self {
        Self(flowers.to_vec())
    }

    #[must_use]
    pub fn flowers(&self) -> &[Flower] {
        &self.0
    }
}

pub struct GardenState {
    remote: Arc<dyn GardenRemote>,
    current: Option<Garden>,
    snapshot: Snapshot,
    save_status: SaveStatus,
    subscribers: Vec<mpsc::UnboundedSender<GardenEvent>>,
}

impl GardenState {
    #[must_use]
    pub fn new(remote: Arc<dyn GardenRemote>) -> Self {
        Self { remote, current: None, snapshot: Snapshot::default(), save_status: SaveStatus::Idle, subscribers: Vec::new() }
    }

    /// Receive every subsequent [`GardenEvent`].
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<GardenEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub(crate) fn notify(&mut self, event: GardenEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // =========================================================================
    // READ
    // =========================================================================

    #[must_use]
    pub fn current(&self) -> Option<&Garden> {
        self.current.as_ref()
    }

    /// Id of the current garden, or [`NO_GARDEN`].
    #[must_use]
    pub fn garden_id(&self) -> GardenId {
        self.current.as_ref().map_or(NO_GARDEN, |g| g.id)
    }

    /// Live flowers in insertion (draw) order.
    #[must_use]
    pub fn flowers(&self) -> &[Flower] {
        self.current.as_ref().map_or(&[], |g| g.flowers.as_slice())
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        self.current.as_ref().map_or(&[], |g| g.comments.as_slice())
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    /// What a save would send right now.
    #[must_use]
    pub fn pending_changes(&self) -> FlowerDiff {
        sync::diff(self.snapshot.flowers(), self.flowers())
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        !self.pending_changes().is_empty()
    }

    // =========================================================================
    // LOAD
    // =========================================================================

    /// Replace the current garden with `garden_id` from the server, or clear
    /// it for [`NO_GARDEN`].
    ///
    /// # Errors
    ///
    /// Returns the remote error if the fetch fails; state is left untouched.
    pub async fn load(&mut self, garden_id: GardenId) -> Result<(), RemoteError> {
        if garden_id == NO_GARDEN {
            self.clear();
            return Ok(());
        }
        let garden = self.remote.fetch_garden(garden_id).await?;
        info!(garden_id, flowers = garden.flowers.len(), comments = garden.comments.len(), "garden loaded");
        self.snapshot = Snapshot::capture(&garden.flowers);
        self.current = Some(garden);
        self.save_status = SaveStatus::Idle;
        self.notify(GardenEvent::Loaded(garden_id));
        self.notify(GardenEvent::SaveStatus(SaveStatus::Idle));
        Ok(())
    }

    /// Drop the current garden and its snapshot.
    pub fn clear(&mut self) {
        self.current = None;
        self.snapshot = Snapshot::default();
        self.save_status = SaveStatus::Idle;
        self.notify(GardenEvent::Cleared);
    }

    /// Refetch the flowers and take a new snapshot of them.
    ///
    /// Local edits not yet saved are discarded. No-op without a garden.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the fetch fails.
    pub async fn reload_flowers(&mut self) -> Result<(), RemoteError> {
        let garden_id = self.garden_id();
        if garden_id == NO_GARDEN {
            return Ok(());
        }
        let fresh = self.remote.fetch_garden(garden_id).await?;
        let Some(garden) = self.current.as_mut() else {
            return Ok(());
        };
        debug!(garden_id, flowers = fresh.flowers.len(), "flowers reloaded");
        self.snapshot = Snapshot::capture(&fresh.flowers);
        garden.flowers = fresh.flowers;
        self.notify(GardenEvent::FlowersChanged);
        Ok(())
    }

    /// Refetch only the comment list. No-op without a garden.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the fetch fails.
    pub async fn reload_comments(&mut self) -> Result<(), RemoteError> {
        let garden_id = self.garden_id();
        if garden_id == NO_GARDEN {
            return Ok(());
        }
        let fresh = self.remote.fetch_garden(garden_id).await?;
        if let Some(garden) = self.current.as_mut() {
            garden.comments = fresh.comments;
            self.notify(GardenEvent::CommentsChanged);
        }
        Ok(())
    }

    // =========================================================================
    // LOCAL EDITS
    // =========================================================================

    /// Append an unsaved flower. Returns `false` when no garden is selected.
    pub fn add_flower_local(&mut self, color: FlowerColor, x: f64, y: f64) -> bool {
        let Some(garden) = self.current.as_mut() else {
            debug!("flower dropped with no garden selected");
            return false;
        };
        garden.flowers.push(Flower::new(color, x, y));
        self.mark_unsaved();
        true
    }

    /// Remove `flower` from the live list. Saved flowers are matched by id,
    /// unsaved ones by value (first match). Absent flowers are a no-op.
    pub fn remove_flower_local(&mut self, flower: &Flower) -> bool {
        let Some(garden) = self.current.as_mut() else {
            return false;
        };
        let is_target = |f: &Flower| if flower.is_saved() { f.same_as(flower) } else { f == flower };
        let Some(pos) = garden.flowers.iter().position(is_target) else {
            debug!(?flower, "flower already gone");
            return false;
        };
        garden.flowers.remove(pos);
        self.mark_unsaved();
        true
    }

    /// Remove every flower whose hit box at `size` contains `point`.
    /// Returns how many were removed.
    pub fn erase_at(&mut self, point: Point, size: f64) -> usize {
        let Some(garden) = self.current.as_mut() else {
            return 0;
        };
        let before = garden.flowers.len();
        garden.flowers.retain(|f| !hit::contains(point, f, size));
        let removed = before - garden.flowers.len();
        if removed > 0 {
            self.mark_unsaved();
        }
        removed
    }

    fn mark_unsaved(&mut self) {
        self.notify(GardenEvent::FlowersChanged);
        self.set_save_status(SaveStatus::Unsaved);
    }

    pub(crate) fn set_save_status(&mut self, status: SaveStatus) {
        self.save_status = status;
        self.notify(GardenEvent::SaveStatus(status));
    }
}
