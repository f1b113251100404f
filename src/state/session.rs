//! Who is logged in, as last reported by the server.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tracing::{info, warn};

use crate::error::{GardenError, ValidationError};
use crate::garden::{User, UserId};
use crate::remote::{GardenRemote, NewUser, RemoteError};

#[derive(Debug, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Ask the server who the session cookie belongs to.
    ///
    /// # Errors
    ///
    /// Returns the remote error if `/me` fails for a reason other than
    /// "not authenticated"; the previous user is kept in that case.
    pub async fn refresh(&mut self, remote: &dyn GardenRemote) -> Result<(), RemoteError> {
        self.user = remote.current_user().await?;
        Ok(())
    }

    /// Open a session and load the user behind it.
    ///
    /// Returns `Ok(false)` when the server rejects the credentials.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingFields`] when either field is blank, or the
    /// remote error if a call fails.
    pub async fn login(&mut self, remote: &dyn GardenRemote, email: &str, password: &str) -> Result<bool, GardenError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ValidationError::MissingFields.into());
        }
        if !remote.create_session(email.trim(), password).await? {
            warn!(email = email.trim(), "login rejected");
            return Ok(false);
        }
        self.refresh(remote).await?;
        info!(user_id = ?self.user_id(), "logged in");
        Ok(self.is_authenticated())
    }

    /// Create an account, then log in with the same credentials.
    ///
    /// Returns `Ok(false)` when the email is already registered.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingFields`] when any field is blank, or the
    /// remote error if a call fails.
    pub async fn register(&mut self, remote: &dyn GardenRemote, user: &NewUser<'_>) -> Result<bool, GardenError> {
        let user = NewUser {
            first_name: user.first_name.trim(),
            last_name: user.last_name.trim(),
            email: user.email.trim(),
            password: user.password,
        };
        if [user.first_name, user.last_name, user.email, user.password]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(ValidationError::MissingFields.into());
        }
        if !remote.create_user(&user).await? {
            warn!(email = user.email, "email already registered");
            return Ok(false);
        }
        info!(email = user.email, "account created");
        self.login(remote, user.email, user.password).await
    }

    /// Close the session. The local user is dropped even if the call fails.
    ///
    /// # Errors
    ///
    /// Returns the remote error from `DELETE /sessions`.
    pub async fn logout(&mut self, remote: &dyn GardenRemote) -> Result<(), RemoteError> {
        self.user = None;
        remote.delete_session().await
    }
}
