//! App — the explicit application state and the commands users issue.
//!
//! DESIGN
//! ======
//! One [`App`] owns every component: [`Session`] owns who is logged in,
//! [`GardenState`] owns the garden data, [`EditorUi`] owns erase mode and
//! flower size, and [`SyncEngine`] persists edits. Commands validate first,
//! then call the remote, then update state; observers redraw from
//! [`GardenEvent`]s rather than being called directly.
//!
//! ERROR HANDLING
//! ==============
//! Validation failures return before any remote call and leave state as it
//! was. Remote failures are returned to the caller, but local edits already
//! made are kept; the next save or reload is what reconciles them.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{GardenError, ValidationError};
use crate::garden::{CommentId, FlowerColor, GardenId, GardenSummary, NO_GARDEN};
use crate::remote::{GardenRemote, HttpRemote, NewUser, RemoteError};
use crate::selection::{self, Permissions, SelectionController};
use crate::state::{EditorUi, GardenEvent, GardenState, SaveStatus, Session};
use crate::sync::{SaveReport, SyncEngine, SyncEvent};
use crate::viewport::{Point, Viewport};

pub struct App {
    remote: Arc<dyn GardenRemote>,
    session: Session,
    garden: GardenState,
    ui: EditorUi,
    selection: SelectionController,
    sync: SyncEngine,
    gardens: Vec<GardenSummary>,
    viewport: Option<Viewport>,
}

impl App {
    #[must_use]
    pub fn new(remote: Arc<dyn GardenRemote>, flower_size: f64) -> Self {
        Self {
            session: Session::new(),
            garden: GardenState::new(remote.clone()),
            ui: EditorUi::new(flower_size),
            selection: SelectionController::new(),
            sync: SyncEngine::new(remote.clone()),
            gardens: Vec::new(),
            viewport: None,
            remote,
        }
    }

    /// Build an app talking HTTP to `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(config: &ClientConfig) -> Result<Self, RemoteError> {
        let remote = HttpRemote::new(config)?;
        Ok(Self::new(Arc::new(remote), config.flower_size))
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<GardenEvent> {
        self.garden.subscribe()
    }

    pub fn subscribe_sync(&mut self) -> mpsc::UnboundedReceiver<SyncEvent> {
        self.sync.subscribe()
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn garden(&self) -> &GardenState {
        &self.garden
    }

    #[must_use]
    pub fn ui(&self) -> &EditorUi {
        &self.ui
    }

    #[must_use]
    pub fn permissions(&self) -> Permissions {
        self.selection.permissions()
    }

    #[must_use]
    pub fn gardens(&self) -> &[GardenSummary] {
        &self.gardens
    }

    /// Where the canvas is displayed. Without one, client coordinates are
    /// taken as canvas coordinates.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn to_canvas(&self, client: Point) -> Point {
        self.viewport.map_or(client, |v| v.client_to_canvas(client))
    }

    // =========================================================================
    // SESSION AND NAVIGATION
    // =========================================================================

    /// Pick up an existing session, list gardens, and start with none
    /// selected.
    ///
    /// # Errors
    ///
    /// Returns the first remote error.
    pub async fn start(&mut self) -> Result<(), GardenError> {
        self.session.refresh(self.remote.as_ref()).await?;
        self.refresh_gardens().await?;
        self.select(NO_GARDEN).await?;
        info!(authenticated = self.session.is_authenticated(), gardens = self.gardens.len(), "app started");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the remote error; the previous list is kept.
    pub async fn refresh_gardens(&mut self) -> Result<(), GardenError> {
        self.gardens = self.remote.list_gardens().await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`Session::login`].
    pub async fn login(&mut self, email: &str, password: &str) -> Result<bool, GardenError> {
        let ok = self.session.login(self.remote.as_ref(), email, password).await?;
        self.selection.refresh_permissions(&self.session, &self.garden);
        Ok(ok)
    }

    /// Create an account and log into it.
    ///
    /// # Errors
    ///
    /// See [`Session::register`].
    pub async fn register(&mut self, user: &NewUser<'_>) -> Result<bool, GardenError> {
        let ok = self.session.register(self.remote.as_ref(), user).await?;
        self.selection.refresh_permissions(&self.session, &self.garden);
        Ok(ok)
    }

    /// Close the session and return to no garden selected. Unsaved local
    /// edits are dropped.
    ///
    /// # Errors
    ///
    /// Returns the remote error; the local user and garden are dropped
    /// regardless.
    pub async fn logout(&mut self) -> Result<(), GardenError> {
        let result = self.session.logout(self.remote.as_ref()).await;
        self.select(NO_GARDEN).await?;
        Ok(result?)
    }

    /// # Errors
    ///
    /// Returns the remote error if the garden cannot be loaded.
    pub async fn select(&mut self, garden_id: GardenId) -> Result<Permissions, GardenError> {
        let permissions = self
            .selection
            .select(&mut self.garden, &self.session, &mut self.ui, garden_id)
            .await?;
        Ok(permissions)
    }

    // =========================================================================
    // FLOWERS
    // =========================================================================

    fn require_editable(&self) -> Result<(), ValidationError> {
        let permissions = Permissions::derive(&self.session, &self.garden);
        if !permissions.has_garden {
            return Err(ValidationError::NoGardenSelected);
        }
        if !self.session.is_authenticated() {
            return Err(ValidationError::NotAuthenticated);
        }
        if !permissions.can_edit {
            return Err(ValidationError::NotOwner);
        }
        Ok(())
    }

    /// Drag-and-drop a new flower at a client-space position.
    ///
    /// # Errors
    ///
    /// Fails validation unless the user can edit the current garden and the
    /// position maps to a finite canvas point.
    pub fn drop_flower(&mut self, color: FlowerColor, client: Point) -> Result<(), GardenError> {
        self.require_editable()?;
        let at = self.to_canvas(client);
        if !at.x.is_finite() || !at.y.is_finite() {
            return Err(ValidationError::InvalidPosition.into());
        }
        self.garden.add_flower_local(color, at.x, at.y);
        Ok(())
    }

    pub fn toggle_erasing(&mut self) -> bool {
        self.ui.toggle_erasing()
    }

    /// A click on the canvas. In erase mode every flower under the point is
    /// removed and the count returned; otherwise the canvas is only redrawn.
    ///
    /// # Errors
    ///
    /// In erase mode, fails validation unless the user can edit the garden.
    pub fn click(&mut self, client: Point) -> Result<usize, GardenError> {
        if !self.ui.is_erasing() {
            self.garden.notify(GardenEvent::Redraw);
            return Ok(0);
        }
        self.require_editable()?;
        let at = self.to_canvas(client);
        let removed = self.garden.erase_at(at, self.ui.flower_size());
        debug!(x = at.x, y = at.y, removed, "erase click");
        if removed == 0 {
            self.garden.notify(GardenEvent::Redraw);
        }
        Ok(removed)
    }

    /// Change the global flower size. Invalid sizes are ignored.
    pub fn set_flower_size(&mut self, size: f64) -> bool {
        if !self.ui.set_flower_size(size) {
            return false;
        }
        self.garden.notify(GardenEvent::Redraw);
        true
    }

    /// Persist local flower edits, then reload so new flowers get their ids.
    ///
    /// With nothing to send, no remote call is made and the status still
    /// ends at [`SaveStatus::Saved`].
    ///
    /// # Errors
    ///
    /// Fails validation unless the user can edit the garden, or returns the
    /// reload error. Individual sync failures are in the report, not here.
    pub async fn save(&mut self) -> Result<SaveReport, GardenError> {
        self.require_editable()?;
        let garden_id = self.garden.garden_id();
        let diff = self.garden.pending_changes();
        self.garden.set_save_status(SaveStatus::Saving);

        let report = self.sync.save(garden_id, diff).await;

        if report.required() > 0 {
            if let Err(err) = self.garden.reload_flowers().await {
                warn!(garden_id, save_id = report.save_id, error = %err, "reload after save failed");
                self.garden.set_save_status(SaveStatus::Unsaved);
                return Err(err.into());
            }
        }
        self.garden.set_save_status(SaveStatus::Saved);
        Ok(report)
    }

    // =========================================================================
    // GARDENS
    // =========================================================================

    /// Create a garden authored by the current user and select it.
    ///
    /// # Errors
    ///
    /// Validation for a blank name or no login; otherwise remote errors.
    pub async fn create_garden(&mut self, name: &str) -> Result<GardenId, GardenError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyGardenName.into());
        }
        let Some(user) = self.session.user() else {
            return Err(ValidationError::NotAuthenticated.into());
        };
        let garden_id = self.remote.create_garden(name, &user.first_name).await?;
        info!(garden_id, name, "garden created");
        self.refresh_gardens().await?;
        self.select(garden_id).await?;
        Ok(garden_id)
    }

    /// # Errors
    ///
    /// Validation for a blank name or a garden the user does not own;
    /// otherwise remote errors.
    pub async fn rename_garden(&mut self, name: &str) -> Result<(), GardenError> {
        self.require_editable()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyGardenName.into());
        }
        let garden_id = self.garden.garden_id();
        self.remote.rename_garden(garden_id, name).await?;
        info!(garden_id, name, "garden renamed");
        self.refresh_gardens().await?;
        self.select(garden_id).await?;
        Ok(())
    }

    /// Delete the current garden and fall back to no selection.
    ///
    /// # Errors
    ///
    /// Validation for a garden the user does not own; otherwise remote errors.
    pub async fn delete_garden(&mut self) -> Result<(), GardenError> {
        self.require_editable()?;
        let garden_id = self.garden.garden_id();
        self.remote.delete_garden(garden_id).await?;
        info!(garden_id, "garden deleted");
        self.refresh_gardens().await?;
        self.select(NO_GARDEN).await?;
        Ok(())
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    /// # Errors
    ///
    /// Validation for no login, no garden, or blank content; otherwise
    /// remote errors.
    pub async fn add_comment(&mut self, content: &str) -> Result<(), GardenError> {
        if !self.session.is_authenticated() {
            return Err(ValidationError::NotAuthenticated.into());
        }
        let garden_id = self.garden.garden_id();
        if garden_id == NO_GARDEN {
            return Err(ValidationError::NoGardenSelected.into());
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyComment.into());
        }
        self.remote.create_comment(garden_id, content).await?;
        self.garden.reload_comments().await?;
        Ok(())
    }

    /// Delete one of the user's own comments on the current garden. A
    /// comment that is no longer listed is a no-op.
    ///
    /// # Errors
    ///
    /// Validation for no login or someone else's comment; otherwise remote
    /// errors.
    pub async fn delete_comment(&mut self, comment_id: CommentId) -> Result<(), GardenError> {
        if !self.session.is_authenticated() {
            return Err(ValidationError::NotAuthenticated.into());
        }
        let Some(comment) = self.garden.comments().iter().find(|c| c.id == comment_id) else {
            debug!(comment_id, "comment already gone");
            return Ok(());
        };
        if !selection::can_delete_comment(&self.session, comment) {
            return Err(ValidationError::NotOwner.into());
        }
        self.remote.delete_comment(comment_id).await?;
        self.garden.reload_comments().await?;
        Ok(())
    }
}
