//! Tool schema definitions for MCP discovery.
//!
//! Each function returns one tool description: name, documentation, and a
//! JSON Schema for its input. These are served verbatim from `tools/list`
//! so callers can validate payloads before invoking.

use serde_json::{Value, json};

/// Schema for the user creation tool.
pub fn create_user_tool() -> Value {
    json!({
        "name": "create_user",
        "description": "Create a new user in Azure AD",
        "inputSchema": {
            "type": "object",
            "properties": {
                "userPrincipalName": {
                    "type": "string",
                    "description": "User's sign-in name, email format"
                },
                "displayName": {
                    "type": "string",
                    "description": "User's display name"
                },
                "mailNickname": {
                    "type": "string",
                    "description": "Mail alias"
                },
                "password": {
                    "type": "string",
                    "description": "Initial password; the user must change it at first sign-in"
                },
                "accountEnabled": {
                    "type": "boolean",
                    "description": "Whether the account can sign in (default true)"
                },
                "jobTitle": {
                    "type": "string",
                    "description": "Job title"
                },
                "department": {
                    "type": "string",
                    "description": "Department"
                }
            },
            "required": ["userPrincipalName", "displayName", "mailNickname", "password"]
        }
    })
}

/// Schema for the user retrieval tool.
pub fn read_user_tool() -> Value {
    json!({
        "name": "read_user",
        "description": "Get user information from Azure AD",
        "inputSchema": {
            "type": "object",
            "properties": {
                "userId": {
                    "type": "string",
                    "description": "Object id or userPrincipalName"
                }
            },
            "required": ["userId"]
        }
    })
}

/// Schema for the user update tool.
pub fn update_user_tool() -> Value {
    json!({
        "name": "update_user",
        "description": "Update an existing user in Azure AD; omitted fields are left unchanged",
        "inputSchema": {
            "type": "object",
            "properties": {
                "userId": {
                    "type": "string",
                    "description": "Object id or userPrincipalName"
                },
                "displayName": {
                    "type": "string",
                    "description": "New display name"
                },
                "mailNickname": {
                    "type": "string",
                    "description": "New mail alias"
                },
                "jobTitle": {
                    "type": "string",
                    "description": "Job title"
                },
                "department": {
                    "type": "string",
                    "description": "Department"
                },
                "accountEnabled": {
                    "type": "boolean",
                    "description": "Enable or disable sign-in"
                }
            },
            "required": ["userId"]
        }
    })
}

/// Schema for the user deletion tool.
pub fn delete_user_tool() -> Value {
    json!({
        "name": "delete_user",
        "description": "Delete a user from Azure AD",
        "inputSchema": {
            "type": "object",
            "properties": {
                "userId": {
                    "type": "string",
                    "description": "Object id or userPrincipalName"
                }
            },
            "required": ["userId"]
        }
    })
}
