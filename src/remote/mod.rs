//! Remote — the server-side garden store as seen by the client.
//!
//! DESIGN
//! ======
//! Everything the client core needs from the server goes through the
//! [`GardenRemote`] trait so state and sync logic can be exercised against
//! in-memory mocks. [`http::HttpRemote`] is the production implementation.
//!
//! ERROR HANDLING
//! ==============
//! Every call resolves, successfully or not; nothing here retries. Callers
//! decide whether a failure is surfaced to the user or only logged, and the
//! sync engine counts failed calls as completed.

pub mod http;

use crate::garden::{CommentId, Flower, FlowerId, Garden, GardenId, GardenSummary, User};

pub use http::HttpRemote;

/// Registration form for `POST /users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by remote calls.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The configured base URL is unusable.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The request could not be sent or the response not read.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),
}

impl RemoteError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

// =============================================================================
// REMOTE TRAIT
// =============================================================================

/// The remote garden store. Enables mocking in tests.
#[async_trait::async_trait]
pub trait GardenRemote: Send + Sync {
    /// `GET /gardens/{id}`: full record including flowers and comments.
    async fn fetch_garden(&self, id: GardenId) -> Result<Garden, RemoteError>;

    /// `GET /gardens`: every garden, without flowers or comments.
    async fn list_gardens(&self) -> Result<Vec<GardenSummary>, RemoteError>;

    /// `POST /gardens`: returns the new garden's id.
    async fn create_garden(&self, name: &str, author: &str) -> Result<GardenId, RemoteError>;

    /// `PUT /gardens/{id}`.
    async fn rename_garden(&self, id: GardenId, name: &str) -> Result<(), RemoteError>;

    /// `DELETE /gardens/{id}`.
    async fn delete_garden(&self, id: GardenId) -> Result<(), RemoteError>;

    /// `POST /flowers`. The assigned id reaches the client on the next reload.
    async fn create_flower(&self, garden_id: GardenId, flower: &Flower) -> Result<(), RemoteError>;

    /// `DELETE /flowers/{id}`.
    async fn delete_flower(&self, id: FlowerId) -> Result<(), RemoteError>;

    /// `POST /comments`.
    async fn create_comment(&self, garden_id: GardenId, content: &str) -> Result<(), RemoteError>;

    /// `DELETE /comments/{id}`.
    async fn delete_comment(&self, id: CommentId) -> Result<(), RemoteError>;

    /// `GET /me`: `None` when the session is not authenticated.
    async fn current_user(&self) -> Result<Option<User>, RemoteError>;

    /// `POST /users`: `false` when the email is already registered.
    async fn create_user(&self, user: &NewUser<'_>) -> Result<bool, RemoteError>;

    /// `POST /sessions`: `false` when the credentials are rejected.
    async fn create_session(&self, email: &str, password: &str) -> Result<bool, RemoteError>;

    /// `DELETE /sessions`.
    async fn delete_session(&self) -> Result<(), RemoteError>;
}
