//! Credential and endpoint configuration for a run.
//!
//! Values given explicitly (flags, form fields) win over environment defaults.
//! Empty strings are treated as absent.

use std::fmt;

use crate::domain::RunError;

pub const PROJECT_ACCESS_KEY_ENV: &str = "TXBURST_PROJECT_ACCESS_KEY";
pub const PRIVATE_KEY_ENV: &str = "TXBURST_PRIVATE_KEY";
pub const RPC_URL_ENV: &str = "TXBURST_RPC_URL";

/// Chain used when the caller does not pick one (Sepolia).
pub const DEFAULT_CHAIN_ID: u64 = 11_155_111;

/// A string that must not show up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Which credential is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    ProjectAccessKey,
    PrivateKey,
}

impl CredentialKind {
    pub fn env_var(self) -> &'static str {
        match self {
            CredentialKind::ProjectAccessKey => PROJECT_ACCESS_KEY_ENV,
            CredentialKind::PrivateKey => PRIVATE_KEY_ENV,
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::ProjectAccessKey => f.write_str("project access key"),
            CredentialKind::PrivateKey => f.write_str("private key"),
        }
    }
}

/// Credentials as collected, possibly incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub project_access_key: Option<Secret>,
    pub private_key: Option<Secret>,
}

impl Credentials {
    pub fn new(project_access_key: Option<String>, private_key: Option<String>) -> Self {
        Self {
            project_access_key: non_empty(project_access_key),
            private_key: non_empty(private_key),
        }
    }

    /// Read the defaults from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the defaults through `lookup` (environment, dotenv map, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::new(lookup(PROJECT_ACCESS_KEY_ENV), lookup(PRIVATE_KEY_ENV))
    }

    /// Fill whatever is missing here from `defaults`.
    pub fn or(self, defaults: Credentials) -> Self {
        Self {
            project_access_key: self.project_access_key.or(defaults.project_access_key),
            private_key: self.private_key.or(defaults.private_key),
        }
    }

    /// Both credentials, or the first one missing (access key checked first).
    pub fn require(&self) -> Result<ResolvedCredentials, RunError> {
        let project_access_key = self
            .project_access_key
            .clone()
            .ok_or(RunError::MissingCredential(CredentialKind::ProjectAccessKey))?;
        let private_key = self
            .private_key
            .clone()
            .ok_or(RunError::MissingCredential(CredentialKind::PrivateKey))?;
        Ok(ResolvedCredentials {
            project_access_key,
            private_key,
        })
    }
}

/// Complete credentials, ready for a Connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub project_access_key: Secret,
    pub private_key: Secret,
}

/// Everything a Connector needs to build a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub credentials: ResolvedCredentials,

    /// Chain the client must sign for and submit to.
    pub chain_id: u64,

    /// RPC endpoint override. `None` means the connector's own default.
    pub endpoint: Option<String>,
}

/// Endpoint override: explicit value, else `TXBURST_RPC_URL`.
pub fn resolve_endpoint(explicit: Option<String>) -> Option<String> {
    non_empty(explicit).or_else(|| non_empty(std::env::var(RPC_URL_ENV).ok()))
}

fn non_empty<T: From<String>>(value: Option<String>) -> Option<T> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(T::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn explicit_values_win_over_environment() {
        let defaults = Credentials::from_lookup(env(&[
            (PROJECT_ACCESS_KEY_ENV, "env-pak"),
            (PRIVATE_KEY_ENV, "env-pk"),
        ]));
        let creds = Credentials::new(Some("flag-pak".into()), None).or(defaults);

        let resolved = creds.require().unwrap();
        assert_eq!(resolved.project_access_key.expose(), "flag-pak");
        assert_eq!(resolved.private_key.expose(), "env-pk");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let creds = Credentials::new(Some("  ".into()), Some("pk".into()));
        let err = creds.require().unwrap_err();
        assert!(matches!(
            err,
            RunError::MissingCredential(CredentialKind::ProjectAccessKey)
        ));
    }

    #[test]
    fn access_key_is_checked_before_private_key() {
        let err = Credentials::default().require().unwrap_err();
        assert!(matches!(
            err,
            RunError::MissingCredential(CredentialKind::ProjectAccessKey)
        ));

        let err = Credentials::new(Some("pak".into()), None)
            .require()
            .unwrap_err();
        assert!(matches!(
            err,
            RunError::MissingCredential(CredentialKind::PrivateKey)
        ));
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let creds = Credentials::new(Some("pak-123".into()), Some("0xdeadbeef".into()));
        let shown = format!("{creds:?}");
        assert!(!shown.contains("pak-123"));
        assert!(!shown.contains("deadbeef"));
    }
}
