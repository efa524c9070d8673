//! Environment-sourced adapter configuration.
//!
//! Credentials have no defaults: a missing tenant id, client id, or client
//! secret fails construction, and that failure is fatal at startup (the one
//! place the adapter is allowed to abort). The listen port defaults to 8000.

use secrecy::SecretString;

use crate::error::{AdapterError, AdapterResult};

/// Default listen port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8000;

/// Process configuration for the directory adapter.
///
/// The client secret is wrapped in [`SecretString`] so a derived `Debug`
/// prints a redacted placeholder rather than the secret itself.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Directory tenant identifier.
    pub tenant_id: String,
    /// Application (client) identifier.
    pub client_id: String,
    /// Application secret for the client-credentials flow.
    pub client_secret: SecretString,
    /// TCP port the SSE endpoint listens on.
    pub port: u16,
}

impl AdapterConfig {
    /// Load configuration from the process environment.
    ///
    /// Reads `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`
    /// (all required) and `PORT` (optional).
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Config`] if a required variable is absent or
    /// empty, or if `PORT` is not a valid port number.
    pub fn from_env() -> AdapterResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests inject a closure over a map instead
    /// of mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AdapterResult<Self> {
        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse().map_err(|_| {
                AdapterError::config(format!("PORT must be a port number, got '{raw}'"))
            })?,
        };

        Ok(Self {
            tenant_id: require(&lookup, "AZURE_TENANT_ID")?,
            client_id: require(&lookup, "AZURE_CLIENT_ID")?,
            client_secret: SecretString::new(require(&lookup, "AZURE_CLIENT_SECRET")?),
            port,
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AdapterResult<String> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AdapterError::config(format!("{name} must be set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            ("AZURE_TENANT_ID", "tenant-1"),
            ("AZURE_CLIENT_ID", "client-1"),
            ("AZURE_CLIENT_SECRET", "s3cret"),
        ])
    }

    #[test]
    fn test_loads_with_default_port() {
        let vars = full_env();
        let config = AdapterConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.tenant_id, "tenant-1");
        assert_eq!(config.client_id, "client-1");
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_explicit_port() {
        let mut vars = full_env();
        vars.insert("PORT".to_string(), "9090".to_string());
        let config = AdapterConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_missing_credential_fails() {
        for missing in ["AZURE_TENANT_ID", "AZURE_CLIENT_ID", "AZURE_CLIENT_SECRET"] {
            let mut vars = full_env();
            vars.remove(missing);

            let result = AdapterConfig::from_lookup(|name| vars.get(name).cloned());
            let error = result.unwrap_err();
            assert!(matches!(error, AdapterError::Config { .. }));
            assert!(error.to_string().contains(missing));
        }
    }

    #[test]
    fn test_empty_credential_fails() {
        let mut vars = full_env();
        vars.insert("AZURE_CLIENT_SECRET".to_string(), "  ".to_string());

        let result = AdapterConfig::from_lookup(|name| vars.get(name).cloned());
        assert!(matches!(result, Err(AdapterError::Config { .. })));
    }

    #[test]
    fn test_bad_port_fails() {
        let mut vars = full_env();
        vars.insert("PORT".to_string(), "not-a-port".to_string());

        let result = AdapterConfig::from_lookup(|name| vars.get(name).cloned());
        assert!(matches!(result, Err(AdapterError::Config { .. })));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let vars = full_env();
        let config = AdapterConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();

        let printed = format!("{config:?}");
        assert!(!printed.contains("s3cret"));
    }
}
