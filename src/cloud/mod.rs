//! @acp:module "Cloud API"
//! @acp:summary "Cloud API access: credentials, client trait, memoized client"
//! @acp:domain cli
//! @acp:layer service
//!
//! Commands talk to the Cloud API through the [`CloudApi`] trait. The
//! production implementation is [`CloudClient`]; [`ClientService`] builds
//! it once per process from the stored credentials.

pub mod client;
pub mod service;
pub mod types;

pub use client::CloudClient;
pub use service::ClientService;
pub use types::{Application, Environment, EnvironmentFlags, LogType, Vcs};

use crate::config::{keys, JsonFileStore};
use crate::error::Result;

/// @acp:summary "Cloud API operations used by acli"
pub trait CloudApi {
    /// All applications visible to the account
    fn applications(&self) -> Result<Vec<Application>>;

    fn application(&self, uuid: &str) -> Result<Application>;

    /// Environments of one application
    fn environments(&self, application_uuid: &str) -> Result<Vec<Environment>>;

    fn environment(&self, environment_id: &str) -> Result<Environment>;

    /// Log types available for an environment
    fn logs(&self, environment_id: &str) -> Result<Vec<LogType>>;

    /// Raw (gzipped) contents of one log
    fn download_log(&self, environment_id: &str, log_type: &str) -> Result<Vec<u8>>;

    /// The drush aliases archive (`.tar.gz`) for the account
    fn drush_aliases(&self) -> Result<Vec<u8>>;
}

/// @acp:summary "Cloud API key and secret"
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"********")
            .finish()
    }
}

impl Credentials {
    /// Read credentials; missing values load as empty strings
    pub fn load(store: &JsonFileStore) -> Result<Self> {
        Ok(Self {
            key: store.get_string(keys::KEY)?.unwrap_or_default(),
            secret: store.get_string(keys::SECRET)?.unwrap_or_default(),
        })
    }

    pub fn save(&self, store: &JsonFileStore) -> Result<()> {
        store.set(keys::KEY, self.key.clone().into())?;
        store.set(keys::SECRET, self.secret.clone().into())
    }

    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }
}

/// @acp:summary "True iff both key and secret are stored and non-empty"
pub fn is_machine_authenticated(store: &JsonFileStore) -> Result<bool> {
    Ok(Credentials::load(store)?.is_complete())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_with(values: &[(&str, serde_json::Value)]) -> (TempDir, JsonFileStore) {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("cloud_api.conf"));
        for (key, value) in values {
            store.set(key, value.clone()).unwrap();
        }
        (temp, store)
    }

    #[test]
    fn test_authenticated_with_key_and_secret() {
        let (_temp, store) = store_with(&[("key", json!("k")), ("secret", json!("s"))]);
        assert!(is_machine_authenticated(&store).unwrap());
    }

    #[test]
    fn test_not_authenticated_when_either_is_missing() {
        let cases = [
            vec![],
            vec![("key", json!("k"))],
            vec![("secret", json!("s"))],
            vec![("key", json!("")), ("secret", json!("s"))],
            vec![("key", json!("k")), ("secret", json!(""))],
            vec![("key", json!("k")), ("secret", json!(null))],
        ];

        for case in cases {
            let (_temp, store) = store_with(&case);
            assert!(
                !is_machine_authenticated(&store).unwrap(),
                "expected unauthenticated for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_debug_hides_secret() {
        let creds = Credentials {
            key: "k".into(),
            secret: "hunter2".into(),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
