//! Directory client contract and user wire types.
//!
//! [`DirectoryClient`] is the capability seam between the tool handlers and
//! the remote directory: four operations, one remote call each. The adapter
//! never caches a [`UserRecord`]; every read reflects the directory's state
//! at call time.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AdapterResult;

/// Password settings supplied on user creation.
///
/// Write-only: the password travels to the directory once and never appears
/// in a [`UserRecord`], a log line, or a tool response.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProfile {
    /// Initial password.
    pub password: String,
    /// Require a password change at next sign-in.
    pub force_change_password_next_sign_in: bool,
}

impl PasswordProfile {
    /// Profile for a freshly provisioned user; the user must rotate the
    /// initial password at first sign-in.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            force_change_password_next_sign_in: true,
        }
    }
}

impl fmt::Debug for PasswordProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordProfile")
            .field("password", &"<redacted>")
            .field(
                "force_change_password_next_sign_in",
                &self.force_change_password_next_sign_in,
            )
            .finish()
    }
}

/// Request body for creating a directory user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Whether the account can sign in.
    pub account_enabled: bool,
    /// Name shown in the directory.
    pub display_name: String,
    /// Mail alias (the part before the `@`).
    pub mail_nickname: String,
    /// Unique sign-in name, email format.
    pub user_principal_name: String,
    /// Initial password settings.
    pub password_profile: PasswordProfile,
    /// Job title, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Department, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Partial update for a directory user.
///
/// `None` fields are omitted from the remote request entirely; the
/// directory leaves the corresponding attributes untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_enabled: Option<bool>,
}

impl UserChanges {
    /// True when no field would be sent to the directory.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.mail_nickname.is_none()
            && self.job_title.is_none()
            && self.department.is_none()
            && self.account_enabled.is_none()
    }
}

/// A directory user as returned by creates and reads.
///
/// This is the projection the adapter exposes to callers; the password is
/// write-only and never present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Server-assigned object id.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_enabled: Option<bool>,
}

/// Operations the adapter needs from the remote directory.
///
/// Each method maps onto exactly one remote call; there are no multi-step
/// transactions and no automatic retries. `user_id` accepts either the
/// object id or the principal name.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Create a user. Returns the created record including its
    /// server-assigned id.
    async fn create_user(&self, user: &NewUser) -> AdapterResult<UserRecord>;

    /// Fetch a user by identifier.
    async fn get_user(&self, user_id: &str) -> AdapterResult<UserRecord>;

    /// Apply a partial update to a user.
    async fn update_user(&self, user_id: &str, changes: &UserChanges) -> AdapterResult<()>;

    /// Delete a user by identifier.
    async fn delete_user(&self, user_id: &str) -> AdapterResult<()>;
}

#[async_trait]
impl<T: DirectoryClient + ?Sized> DirectoryClient for Arc<T> {
    async fn create_user(&self, user: &NewUser) -> AdapterResult<UserRecord> {
        self.as_ref().create_user(user).await
    }

    async fn get_user(&self, user_id: &str) -> AdapterResult<UserRecord> {
        self.as_ref().get_user(user_id).await
    }

    async fn update_user(&self, user_id: &str, changes: &UserChanges) -> AdapterResult<()> {
        self.as_ref().update_user(user_id, changes).await
    }

    async fn delete_user(&self, user_id: &str) -> AdapterResult<()> {
        self.as_ref().delete_user(user_id).await
    }
}
