//! Client-side state, split by owner.
//!
//! DESIGN
//! ======
//! [`garden::GardenState`] owns the active garden's data and its sync
//! baseline, [`session::Session`] owns user identity, and [`ui::EditorUi`]
//! holds transient editor chrome. Keeping them apart lets each be read and
//! written only by the component that owns it.

pub mod garden;
pub mod session;
pub mod ui;

pub use garden::{GardenEvent, GardenState, SaveStatus, Snapshot};
pub use session::Session;
pub use ui::EditorUi;
