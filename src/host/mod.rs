//! @acp:module "Host Environment"
//! @acp:summary "Cloud IDE detection and environment-provided identifiers"
//! @acp:domain cli
//! @acp:layer detection
//!
//! Environment variables are read once into [`HostEnvironment`] so the
//! rest of the code never touches `std::env` directly.

use std::env;
use std::path::PathBuf;

/// Set to `IDE` inside a managed Cloud IDE
pub const AH_SITE_ENVIRONMENT: &str = "AH_SITE_ENVIRONMENT";
/// Application linked to the Cloud IDE
pub const ACQUIA_APPLICATION_UUID: &str = "ACQUIA_APPLICATION_UUID";
/// Id of the Cloud IDE instance
pub const REMOTEIDE_UUID: &str = "REMOTEIDE_UUID";

/// @acp:summary "Snapshot of the environment variables acli reacts to"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    pub ah_site_environment: Option<String>,
    pub application_uuid: Option<String>,
    pub remote_ide_uuid: Option<String>,
    pub home: Option<PathBuf>,
}

impl HostEnvironment {
    /// Capture from the process environment. Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            ah_site_environment: non_empty_var(AH_SITE_ENVIRONMENT),
            application_uuid: non_empty_var(ACQUIA_APPLICATION_UUID),
            remote_ide_uuid: non_empty_var(REMOTEIDE_UUID),
            home: non_empty_var("HOME").map(PathBuf::from),
        }
    }

    /// Running inside a managed Cloud IDE
    pub fn is_acquia_cloud_ide(&self) -> bool {
        self.ah_site_environment.as_deref() == Some("IDE")
    }

    /// Application UUID exposed by a Cloud IDE
    pub fn cloud_ide_application_uuid(&self) -> Option<&str> {
        self.application_uuid.as_deref()
    }

    /// Id of the current Cloud IDE
    pub fn cloud_ide_uuid(&self) -> Option<&str> {
        self.remote_ide_uuid.as_deref()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
