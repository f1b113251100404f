//! Top-level error types for user-facing commands.
//!
//! Validation failures are detected before any remote call and never mutate
//! state. Remote failures are reported but do not roll back local edits; the
//! next save or reload is the only recovery path.

use crate::remote::RemoteError;

/// Input or permission problems the user can correct.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please fill out all the fields")]
    MissingFields,
    #[error("please enter a comment")]
    EmptyComment,
    #[error("please enter a garden name")]
    EmptyGardenName,
    #[error("please login first")]
    NotAuthenticated,
    #[error("please select a garden first")]
    NoGardenSelected,
    #[error("only the author can modify this")]
    NotOwner,
    #[error("flower position must be a finite point")]
    InvalidPosition,
}

/// Error returned by [`crate::app::App`] commands.
#[derive(Debug, thiserror::Error)]
pub enum GardenError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl GardenError {
    /// The validation failure, if this is one.
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(v) => Some(v),
            Self::Remote(_) => None,
        }
    }
}
