//! HTTP implementation of [`GardenRemote`].
//!
//! Thin reqwest wrapper over the gardens REST routes. Write bodies are
//! `application/x-www-form-urlencoded`, the session cookie lives in the
//! client's cookie store, and response handling is kept in small pure
//! functions for testability.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{GardenRemote, NewUser, RemoteError};
use crate::config::{ClientConfig, parse_base_url};
use crate::garden::{CommentId, Flower, FlowerColor, FlowerId, Garden, GardenId, GardenSummary, User};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpRemote {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    /// Build a cookie-keeping client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s) or the HTTP client
    /// fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, RemoteError> {
        let base_url = parse_base_url(&config.base_url).map_err(|e| RemoteError::InvalidBaseUrl(e.to_string()))?;
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| RemoteError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    /// Send and return `(status, body)` without judging the status.
    async fn exchange(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        Ok((status, text))
    }

    async fn expect_success(&self, request: reqwest::RequestBuilder) -> Result<String, RemoteError> {
        let (status, body) = self.exchange(request).await?;
        check_status(status, body)
    }

    async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T, RemoteError> {
        debug!(route, "GET");
        let body = self.expect_success(self.http.get(self.url(route))).await?;
        parse_json(&body)
    }

    async fn post_form<F: Serialize + ?Sized>(&self, route: &str, form: &F) -> Result<String, RemoteError> {
        debug!(route, "POST");
        self.expect_success(self.http.post(self.url(route)).form(form)).await
    }

    async fn delete(&self, route: &str) -> Result<(), RemoteError> {
        debug!(route, "DELETE");
        self.expect_success(self.http.delete(self.url(route))).await?;
        Ok(())
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct GardenForm<'a> {
    name: &'a str,
    author: &'a str,
}

#[derive(Serialize)]
struct RenameForm<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct FlowerForm {
    #[serde(rename = "gardenId")]
    garden_id: GardenId,
    color: FlowerColor,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct CommentForm<'a> {
    #[serde(rename = "gardenId")]
    garden_id: GardenId,
    content: &'a str,
}

#[derive(Serialize)]
struct SessionForm<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum CreatedId {
    Object { id: GardenId },
    Bare(GardenId),
}

// =============================================================================
// PURE HELPERS
// =============================================================================

pub(crate) fn garden_route(id: GardenId) -> String {
    format!("/gardens/{id}")
}

pub(crate) fn flower_route(id: FlowerId) -> String {
    format!("/flowers/{id}")
}

pub(crate) fn comment_route(id: CommentId) -> String {
    format!("/comments/{id}")
}

/// Pass 2xx bodies through; anything else becomes [`RemoteError::Status`].
pub(crate) fn check_status(status: u16, body: String) -> Result<String, RemoteError> {
    if (200..300).contains(&status) { Ok(body) } else { Err(RemoteError::Status { status, body }) }
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, RemoteError> {
    serde_json::from_str(body).map_err(|e| RemoteError::Parse(e.to_string()))
}

/// `POST /users` answers 422 for an email that is already taken.
pub(crate) fn registration_accepted(status: u16, body: String) -> Result<bool, RemoteError> {
    if status == 422 {
        return Ok(false);
    }
    check_status(status, body)?;
    Ok(true)
}

/// `POST /gardens` answers either `{"id": n}` or a bare `n`.
pub(crate) fn parse_created_id(body: &str) -> Result<GardenId, RemoteError> {
    match parse_json::<CreatedId>(body)? {
        CreatedId::Object { id } | CreatedId::Bare(id) => Ok(id),
    }
}

// =============================================================================
// TRAIT IMPL
// =============================================================================

#[async_trait::async_trait]
impl GardenRemote for HttpRemote {
    async fn fetch_garden(&self, id: GardenId) -> Result<Garden, RemoteError> {
        self.get_json(&garden_route(id)).await
    }

    async fn list_gardens(&self) -> Result<Vec<GardenSummary>, RemoteError> {
        self.get_json("/gardens").await
    }

    async fn create_garden(&self, name: &str, author: &str) -> Result<GardenId, RemoteError> {
        let body = self.post_form("/gardens", &GardenForm { name, author }).await?;
        parse_created_id(&body)
    }

    async fn rename_garden(&self, id: GardenId, name: &str) -> Result<(), RemoteError> {
        let route = garden_route(id);
        debug!(route = %route, "PUT");
        self.expect_success(self.http.put(self.url(&route)).form(&RenameForm { name }))
            .await?;
        Ok(())
    }

    async fn delete_garden(&self, id: GardenId) -> Result<(), RemoteError> {
        self.delete(&garden_route(id)).await
    }

    async fn create_flower(&self, garden_id: GardenId, flower: &Flower) -> Result<(), RemoteError> {
        let form = FlowerForm { garden_id, color: flower.color, x: flower.x, y: flower.y };
        self.post_form("/flowers", &form).await?;
        Ok(())
    }

    async fn delete_flower(&self, id: FlowerId) -> Result<(), RemoteError> {
        self.delete(&flower_route(id)).await
    }

    async fn create_comment(&self, garden_id: GardenId, content: &str) -> Result<(), RemoteError> {
        self.post_form("/comments", &CommentForm { garden_id, content }).await?;
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), RemoteError> {
        self.delete(&comment_route(id)).await
    }

    async fn current_user(&self) -> Result<Option<User>, RemoteError> {
        debug!(route = "/me", "GET");
        let (status, body) = self.exchange(self.http.get(self.url("/me"))).await?;
        if status == 401 {
            return Ok(None);
        }
        let body = check_status(status, body)?;
        parse_json(&body).map(Some)
    }

    async fn create_user(&self, user: &NewUser<'_>) -> Result<bool, RemoteError> {
        debug!(route = "/users", "POST");
        let (status, body) = self.exchange(self.http.post(self.url("/users")).form(user)).await?;
        registration_accepted(status, body)
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<bool, RemoteError> {
        debug!(route = "/sessions", "POST");
        let request = self
            .http
            .post(self.url("/sessions"))
            .form(&SessionForm { email, password });
        let (status, body) = self.exchange(request).await?;
        if status == 401 {
            return Ok(false);
        }
        check_status(status, body)?;
        Ok(true)
    }

    async fn delete_session(&self) -> Result<(), RemoteError> {
        self.delete("/sessions").await
    }
}
