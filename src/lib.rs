//! Client core for the community gardens app.
//!
//! Users place colored flower sprites on named gardens and comment on the
//! gardens they can view. This crate owns the part of the client with real
//! invariants: the locally edited flower list, the snapshot it is diffed
//! against, the sync cycle that persists the difference to the server, and
//! the rendering and hit-testing of flowers on a 2D surface.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`garden`] | Wire/data model: gardens, flowers, comments, users |
//! | [`viewport`] | Points and client-to-canvas coordinate scaling |
//! | [`hit`] | Bounding-box hit-testing for erase clicks |
//! | [`render`] | Flower drawing onto any [`render::Surface`] |
//! | [`remote`] | The [`remote::GardenRemote`] collaborator and its HTTP client |
//! | [`state`] | Garden, session, and editor UI state |
//! | [`sync`] | Snapshot diffing and the save cycle |
//! | [`selection`] | Switching the active garden and derived permissions |
//! | [`app`] | Application state wiring all of the above |
//! | [`config`] | Environment-driven client configuration |
//! | [`error`] | Validation and top-level error types |

pub mod app;
pub mod config;
pub mod error;
pub mod garden;
pub mod hit;
pub mod remote;
pub mod render;
pub mod selection;
pub mod state;
pub mod sync;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_helpers;
