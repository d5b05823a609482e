//! @acp:module "Configuration"
//! @acp:summary "File locations, API endpoints and persisted keys"
//! @acp:domain cli
//! @acp:layer config
//!
//! acli keeps two JSON files under `~/.acquia/`:
//!
//! - `cloud_api.conf` holds the Cloud API `key` and `secret`
//! - `acquia-cli.json` holds the telemetry preference and the list of
//!   local projects

pub mod projects;
pub mod store;

use std::path::PathBuf;

pub use projects::{LocalProject, LocalUserConfig};
pub use store::JsonFileStore;

/// Keys of the acli datastore
pub mod keys {
    /// Telemetry opt-in preference (bool)
    pub const SEND_TELEMETRY: &str = "send_telemetry";
    /// Anonymous analytics device id
    pub const DEVICE_ID: &str = "device_id";
    /// Cloud API key in the cloud datastore
    pub const KEY: &str = "key";
    /// Cloud API secret in the cloud datastore
    pub const SECRET: &str = "secret";
}

const CONFIG_DIR: &str = ".acquia";
const CLOUD_CONFIG_FILENAME: &str = "cloud_api.conf";
const ACLI_CONFIG_FILENAME: &str = "acquia-cli.json";

fn default_api_base_uri() -> String {
    "https://cloud.acquia.com/api".to_string()
}

fn default_accounts_uri() -> String {
    "https://accounts.acquia.com".to_string()
}

/// @acp:summary "Cloud API endpoint configuration"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// Base URI of the Cloud API, without trailing slash
    pub base_uri: String,
    /// Base URI of the OAuth accounts service
    pub accounts_uri: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            base_uri: default_api_base_uri(),
            accounts_uri: default_accounts_uri(),
        }
    }
}

impl ApiEndpoints {
    /// OAuth2 token endpoint
    pub fn token_uri(&self) -> String {
        format!(
            "{}/api/auth/oauth/token",
            self.accounts_uri.trim_end_matches('/')
        )
    }
}

/// @acp:summary "Resolved locations and endpoints for one invocation"
/// @acp:lock normal
#[derive(Debug, Clone)]
pub struct Settings {
    /// Credential file (`key`, `secret`)
    pub cloud_config_path: PathBuf,

    /// acli datastore file
    pub acli_config_path: PathBuf,

    /// Key of the local project list inside the acli datastore
    pub acli_config_key: String,

    /// Where downloads are staged before they are unpacked
    pub staging_dir: PathBuf,

    pub endpoints: ApiEndpoints,
}

impl Default for Settings {
    fn default() -> Self {
        let dir = default_config_dir();
        Self {
            cloud_config_path: dir.join(CLOUD_CONFIG_FILENAME),
            acli_config_path: dir.join(ACLI_CONFIG_FILENAME),
            acli_config_key: ACLI_CONFIG_FILENAME.to_string(),
            staging_dir: std::env::temp_dir(),
            endpoints: ApiEndpoints::default(),
        }
    }
}

impl Settings {
    /// @acp:summary "Apply command-line or environment overrides on top of defaults"
    pub fn with_overrides(
        cloud_config: Option<PathBuf>,
        acli_config: Option<PathBuf>,
        api_base_uri: Option<String>,
        accounts_uri: Option<String>,
    ) -> Self {
        let mut settings = Self::default();
        if let Some(path) = cloud_config {
            settings.cloud_config_path = path;
        }
        if let Some(path) = acli_config {
            settings.acli_config_path = path;
        }
        if let Some(uri) = api_base_uri {
            settings.endpoints.base_uri = uri.trim_end_matches('/').to_string();
        }
        if let Some(uri) = accounts_uri {
            settings.endpoints.accounts_uri = uri.trim_end_matches('/').to_string();
        }
        settings
    }

    /// Store holding Cloud API credentials
    pub fn cloud_datastore(&self) -> JsonFileStore {
        JsonFileStore::new(&self.cloud_config_path)
    }

    /// Store holding acli preferences and local projects
    pub fn acli_datastore(&self) -> JsonFileStore {
        JsonFileStore::new(&self.acli_config_path)
    }
}

fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(CONFIG_DIR))
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR))
}
