//! Shared test infrastructure.
//!
//! [`MockDirectory`] is an in-memory directory with the same observable
//! behavior the remote enforces: sequential ids, principal-name uniqueness,
//! lookup by id or principal name, and not-found on absent users. Each
//! operation counts its calls so tests can assert how many remote calls a
//! protocol exchange produced.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use entra_mcp_server::auth::{AccessToken, CredentialManager, TokenSource};
use entra_mcp_server::directory::{DirectoryClient, NewUser, UserChanges, UserRecord};
use entra_mcp_server::error::{AdapterError, AdapterResult};

/// In-memory stand-in for the remote directory.
#[derive(Default)]
pub struct MockDirectory {
    users: Mutex<Vec<UserRecord>>,
    next_id: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    /// When set, every operation fails with this error's shape.
    forced_failure: Mutex<Option<AdapterError>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(1),
            ..Self::default()
        }
    }

    /// Make every subsequent operation fail with the given error.
    pub fn fail_with(&self, error: AdapterError) {
        *self.forced_failure.lock().unwrap() = Some(error);
    }

    /// Number of users currently stored.
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn check_failure(&self) -> AdapterResult<()> {
        match self.forced_failure.lock().unwrap().as_ref() {
            Some(AdapterError::Authentication { message }) => {
                Err(AdapterError::authentication(message.clone()))
            }
            Some(AdapterError::RemoteService { status, detail }) => {
                Err(AdapterError::remote_service(*status, detail.clone()))
            }
            Some(AdapterError::Conflict { message }) => Err(AdapterError::conflict(message.clone())),
            Some(error) => Err(AdapterError::remote_service(500, error.to_string())),
            None => Ok(()),
        }
    }

    fn position(users: &[UserRecord], user_id: &str) -> Option<usize> {
        users.iter().position(|user| {
            user.id == user_id || user.user_principal_name.as_deref() == Some(user_id)
        })
    }
}

#[async_trait]
impl DirectoryClient for MockDirectory {
    async fn create_user(&self, user: &NewUser) -> AdapterResult<UserRecord> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let mut users = self.users.lock().unwrap();
        let duplicate = users
            .iter()
            .any(|existing| existing.user_principal_name.as_deref() == Some(&user.user_principal_name));
        if duplicate {
            return Err(AdapterError::conflict(format!(
                "a user with userPrincipalName '{}' already exists",
                user.user_principal_name
            )));
        }

        let id = format!("id-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = UserRecord {
            id,
            user_principal_name: Some(user.user_principal_name.clone()),
            display_name: Some(user.display_name.clone()),
            mail_nickname: Some(user.mail_nickname.clone()),
            mail: None,
            job_title: user.job_title.clone(),
            department: user.department.clone(),
            account_enabled: Some(user.account_enabled),
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn get_user(&self, user_id: &str) -> AdapterResult<UserRecord> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let users = self.users.lock().unwrap();
        Self::position(&users, user_id)
            .map(|index| users[index].clone())
            .ok_or_else(|| AdapterError::not_found(user_id))
    }

    async fn update_user(&self, user_id: &str, changes: &UserChanges) -> AdapterResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let mut users = self.users.lock().unwrap();
        let index =
            Self::position(&users, user_id).ok_or_else(|| AdapterError::not_found(user_id))?;

        let user = &mut users[index];
        if let Some(display_name) = &changes.display_name {
            user.display_name = Some(display_name.clone());
        }
        if let Some(mail_nickname) = &changes.mail_nickname {
            user.mail_nickname = Some(mail_nickname.clone());
        }
        if let Some(job_title) = &changes.job_title {
            user.job_title = Some(job_title.clone());
        }
        if let Some(department) = &changes.department {
            user.department = Some(department.clone());
        }
        if let Some(account_enabled) = changes.account_enabled {
            user.account_enabled = Some(account_enabled);
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> AdapterResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let mut users = self.users.lock().unwrap();
        let index =
            Self::position(&users, user_id).ok_or_else(|| AdapterError::not_found(user_id))?;
        users.remove(index);
        Ok(())
    }
}

/// Token source that always hands out the same long-lived token.
pub struct StaticTokenSource {
    pub token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn fetch_token(&self) -> AdapterResult<AccessToken> {
        Ok(AccessToken {
            token: self.token.clone(),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }
}

/// Credential manager pre-wired with a static token.
pub fn static_credentials(token: &str) -> CredentialManager {
    CredentialManager::new(std::sync::Arc::new(StaticTokenSource::new(token)))
}

/// Arguments for a valid `create_user` call, with overridable fields.
pub fn create_user_args(overrides: &[(&str, Value)]) -> Value {
    let mut args: HashMap<&str, Value> = HashMap::from([
        ("userPrincipalName", json!("ada@contoso.com")),
        ("displayName", json!("Ada Lovelace")),
        ("mailNickname", json!("ada")),
        ("password", json!("Str0ngP@ss!")),
    ]);
    for (key, value) in overrides {
        args.insert(key, value.clone());
    }
    serde_json::to_value(args).unwrap()
}
