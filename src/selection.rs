//! Selection — switch the active garden and derive what the user may do.
//!
//! DESIGN
//! ======
//! [`Permissions`] is pure derived state: it is recomputed from the session
//! and the garden state after every selection or login change and never
//! written anywhere else. Erase mode is dropped before every switch so it
//! never carries over to another garden.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use tracing::{debug, info};

use crate::garden::{Comment, GardenId, NO_GARDEN};
use crate::remote::RemoteError;
use crate::state::{EditorUi, GardenState, Session};

/// Affordances the current user has on the current garden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions {
    /// A garden (not the sentinel) is selected.
    pub has_garden: bool,
    /// Logged in as the garden's author.
    pub can_edit: bool,
    /// Logged in with a garden selected.
    pub can_comment: bool,
}

impl Permissions {
    #[must_use]
    pub fn derive(session: &Session, garden: &GardenState) -> Self {
        let has_garden = garden.garden_id() != NO_GARDEN;
        let author_id = garden.current().map(|g| g.author_id);
        let can_edit = has_garden && session.user_id().is_some() && session.user_id() == author_id;
        let can_comment = has_garden && session.is_authenticated();
        Self { has_garden, can_edit, can_comment }
    }
}

/// Only a comment's author may delete it.
#[must_use]
pub fn can_delete_comment(session: &Session, comment: &Comment) -> bool {
    session.user_id() == Some(comment.author_id)
}

#[derive(Debug, Default)]
pub struct SelectionController {
    permissions: Permissions,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Leave erase mode, load `garden_id` (or clear for [`NO_GARDEN`]) and
    /// recompute permissions.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the load fails. Erase mode is still
    /// cleared and permissions still reflect whatever garden remains.
    pub async fn select(
        &mut self,
        garden: &mut GardenState,
        session: &Session,
        ui: &mut EditorUi,
        garden_id: GardenId,
    ) -> Result<Permissions, RemoteError> {
        if ui.is_erasing() {
            debug!("leaving erase mode before switching gardens");
            ui.set_erasing(false);
        }
        let loaded = garden.load(garden_id).await;
        let permissions = self.refresh_permissions(session, garden);
        loaded?;
        info!(garden_id, can_edit = permissions.can_edit, "garden selected");
        Ok(permissions)
    }

    /// Recompute after the session changed without a garden switch.
    pub fn refresh_permissions(&mut self, session: &Session, garden: &GardenState) -> Permissions {
        self.permissions = Permissions::derive(session, garden);
        self.permissions
    }
}
