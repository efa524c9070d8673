//! Microsoft Graph implementation of the directory client.
//!
//! One HTTP call per operation, bearer token injected from the
//! [`CredentialManager`]. Failures are mapped onto the adapter's error
//! taxonomy; the client never retries on its own (directory mutations are
//! not safely idempotent, so retry policy belongs to the caller).

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Method, StatusCode};
use serde::Deserialize;

use crate::auth::CredentialManager;
use crate::directory::{DirectoryClient, NewUser, UserChanges, UserRecord};
use crate::error::{AdapterError, AdapterResult};

/// Graph endpoint for the public Azure cloud.
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Projection requested on reads. Matches the fields of
/// [`UserRecord`]; the password is write-only and cannot be selected.
const USER_FIELDS: &str =
    "id,userPrincipalName,displayName,mailNickname,mail,jobTitle,department,accountEnabled";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OData error envelope returned by Graph.
#[derive(Debug, Deserialize)]
struct ODataError {
    error: ODataErrorBody,
}

#[derive(Debug, Deserialize)]
struct ODataErrorBody {
    code: String,
    message: String,
}

/// Directory client backed by the Microsoft Graph REST API.
pub struct GraphDirectoryClient {
    http: reqwest::Client,
    credentials: CredentialManager,
    base_url: String,
}

impl GraphDirectoryClient {
    /// Build a Graph client over the given credential manager.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Config`] if the HTTP client cannot be built.
    pub fn new(credentials: CredentialManager) -> AdapterResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdapterError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            credentials,
            base_url: GRAPH_BASE_URL.to_string(),
        })
    }

    /// Override the Graph endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn execute<B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> AdapterResult<reqwest::Response> {
        let token = self.credentials.get_token().await?;

        let mut request = self.http.request(method, url).bearer_auth(&token);
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// Consume a non-success response and map it onto the error taxonomy.
    async fn error_for(&self, user_id: Option<&str>, response: reqwest::Response) -> AdapterError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            // The directory no longer accepts the cached token; drop it so
            // the next invocation re-acquires instead of riding a dead one.
            self.credentials.invalidate().await;
        }

        map_status(status, &body, user_id)
    }
}

fn map_status(status: StatusCode, body: &str, user_id: Option<&str>) -> AdapterError {
    let (code, message) = match serde_json::from_str::<ODataError>(body) {
        Ok(parsed) => (parsed.error.code, parsed.error.message),
        Err(_) => (String::new(), body.to_string()),
    };

    match status {
        StatusCode::NOT_FOUND => AdapterError::not_found(user_id.unwrap_or("<unknown>")),
        StatusCode::CONFLICT => AdapterError::conflict(message),
        StatusCode::UNAUTHORIZED => AdapterError::authentication(format!(
            "directory rejected the access token: {message}"
        )),
        // Graph reports a duplicate userPrincipalName as a plain 400.
        _ if is_duplicate_key(&code, &message) => AdapterError::conflict(message),
        _ => {
            let detail = if message.is_empty() {
                status.to_string()
            } else {
                message
            };
            AdapterError::remote_service(status.as_u16(), detail)
        }
    }
}

fn is_duplicate_key(code: &str, message: &str) -> bool {
    code == "Request_MultipleObjectsWithSameKeyValue" || message.contains("already exists")
}

#[async_trait]
impl DirectoryClient for GraphDirectoryClient {
    async fn create_user(&self, user: &NewUser) -> AdapterResult<UserRecord> {
        debug!("creating user {}", user.user_principal_name);
        let url = format!("{}/users", self.base_url);

        let response = self.execute(Method::POST, &url, Some(user)).await?;
        if !response.status().is_success() {
            return Err(self.error_for(None, response).await);
        }

        Ok(response.json().await?)
    }

    async fn get_user(&self, user_id: &str) -> AdapterResult<UserRecord> {
        debug!("reading user {user_id}");
        let url = format!("{}/users/{}?$select={}", self.base_url, user_id, USER_FIELDS);

        let response = self.execute(Method::GET, &url, None::<&()>).await?;
        if !response.status().is_success() {
            return Err(self.error_for(Some(user_id), response).await);
        }

        Ok(response.json().await?)
    }

    async fn update_user(&self, user_id: &str, changes: &UserChanges) -> AdapterResult<()> {
        debug!("updating user {user_id}");
        let url = format!("{}/users/{}", self.base_url, user_id);

        let response = self.execute(Method::PATCH, &url, Some(changes)).await?;
        if !response.status().is_success() {
            return Err(self.error_for(Some(user_id), response).await);
        }

        // Graph answers PATCH with 204 No Content.
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> AdapterResult<()> {
        debug!("deleting user {user_id}");
        let url = format!("{}/users/{}", self.base_url, user_id);

        let response = self.execute(Method::DELETE, &url, None::<&()>).await?;
        if !response.status().is_success() {
            return Err(self.error_for(Some(user_id), response).await);
        }

        Ok(())
    }
}
