//! User tool handlers.
//!
//! Each handler validates its payload against the required fields, issues at
//! most one directory call, and converts any failure into the structured
//! error envelope. Validation failures never reach the directory.

use serde_json::{Value, json};

use super::core::{DirectoryMcpServer, ToolResult};
use crate::directory::{DirectoryClient, NewUser, PasswordProfile, UserChanges};
use crate::error::{AdapterError, AdapterResult};

fn require_str<'a>(arguments: &'a Value, field: &str) -> AdapterResult<&'a str> {
    arguments
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AdapterError::invalid_input(format!("missing required field '{field}'")))
}

fn optional_str(arguments: &Value, field: &str) -> Option<String> {
    arguments
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn record_content(record: &crate::directory::UserRecord) -> Value {
    serde_json::to_value(record).unwrap_or_else(|_| json!({ "id": record.id }))
}

/// Handle user creation.
///
/// Requires `userPrincipalName`, `displayName`, `mailNickname`, and
/// `password`. `accountEnabled` defaults to true (the directory requires
/// the field on create); other optional fields are omitted from the remote
/// request when absent.
pub async fn handle_create_user<C: DirectoryClient>(
    server: &DirectoryMcpServer<C>,
    arguments: Value,
) -> ToolResult {
    let user = match build_new_user(&arguments) {
        Ok(user) => user,
        Err(error) => return ToolResult::failure("create_user", &error),
    };

    match server.directory.create_user(&user).await {
        Ok(record) => ToolResult::ok(
            record_content(&record),
            json!({ "operation": "create_user", "userId": record.id }),
        ),
        Err(error) => ToolResult::failure("create_user", &error),
    }
}

fn build_new_user(arguments: &Value) -> AdapterResult<NewUser> {
    Ok(NewUser {
        account_enabled: arguments
            .get("accountEnabled")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        display_name: require_str(arguments, "displayName")?.to_string(),
        mail_nickname: require_str(arguments, "mailNickname")?.to_string(),
        user_principal_name: require_str(arguments, "userPrincipalName")?.to_string(),
        password_profile: PasswordProfile::new(require_str(arguments, "password")?),
        job_title: optional_str(arguments, "jobTitle"),
        department: optional_str(arguments, "department"),
    })
}

/// Handle user retrieval. Requires `userId`.
pub async fn handle_read_user<C: DirectoryClient>(
    server: &DirectoryMcpServer<C>,
    arguments: Value,
) -> ToolResult {
    let user_id = match require_str(&arguments, "userId") {
        Ok(user_id) => user_id,
        Err(error) => return ToolResult::failure("read_user", &error),
    };

    match server.directory.get_user(user_id).await {
        Ok(record) => ToolResult::ok(
            record_content(&record),
            json!({ "operation": "read_user", "userId": user_id }),
        ),
        Err(error) => ToolResult::failure("read_user", &error),
    }
}

/// Handle user update.
///
/// Requires `userId` plus at least one mutable field; a payload with
/// nothing to change is rejected before any remote call, since an empty
/// patch would have no attributable effect.
pub async fn handle_update_user<C: DirectoryClient>(
    server: &DirectoryMcpServer<C>,
    arguments: Value,
) -> ToolResult {
    let user_id = match require_str(&arguments, "userId") {
        Ok(user_id) => user_id,
        Err(error) => return ToolResult::failure("update_user", &error),
    };

    let changes = UserChanges {
        display_name: optional_str(&arguments, "displayName"),
        mail_nickname: optional_str(&arguments, "mailNickname"),
        job_title: optional_str(&arguments, "jobTitle"),
        department: optional_str(&arguments, "department"),
        account_enabled: arguments.get("accountEnabled").and_then(Value::as_bool),
    };

    if changes.is_empty() {
        return ToolResult::failure(
            "update_user",
            &AdapterError::invalid_input("no updatable fields provided"),
        );
    }

    match server.directory.update_user(user_id, &changes).await {
        Ok(()) => ToolResult::ok(
            json!({ "status": "updated", "userId": user_id }),
            json!({ "operation": "update_user", "userId": user_id }),
        ),
        Err(error) => ToolResult::failure("update_user", &error),
    }
}

/// Handle user deletion. Requires `userId`.
pub async fn handle_delete_user<C: DirectoryClient>(
    server: &DirectoryMcpServer<C>,
    arguments: Value,
) -> ToolResult {
    let user_id = match require_str(&arguments, "userId") {
        Ok(user_id) => user_id,
        Err(error) => return ToolResult::failure("delete_user", &error),
    };

    match server.directory.delete_user(user_id).await {
        Ok(()) => ToolResult::ok(
            json!({ "status": "deleted", "userId": user_id }),
            json!({ "operation": "delete_user", "userId": user_id }),
        ),
        Err(error) => ToolResult::failure("delete_user", &error),
    }
}
