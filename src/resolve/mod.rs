//! @acp:module "Application Resolution"
//! @acp:summary "Prioritized chain of strategies that decide which Cloud application to use"
//! @acp:domain cli
//! @acp:layer service
//!
//! The default chain, tried in order until one yields an application:
//!
//! 1. `--cloud-app-uuid` option (validated)
//! 2. the linked application of the current local project
//! 3. `cloud.appId` from `blt/blt.yml`
//! 4. `ACQUIA_APPLICATION_UUID` (Cloud IDE)
//! 5. git remotes matched against production environments
//! 6. an interactive pick from all applications

pub mod sources;

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

pub use sources::{
    find_cloud_application_by_git_url, BltManifest, CloudIdeEnvironment, ExplicitOption,
    GitRemoteInference, InteractivePrompt, LinkedLocalProject,
};

use crate::cloud::ClientService;
use crate::config::LocalProject;
use crate::error::{AcliError, Result};
use crate::host::HostEnvironment;
use crate::interactive::Prompter;

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-8][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("UUID pattern is valid")
});

/// @acp:summary "Reject blank or non-RFC-4122 UUIDs"
pub fn validate_uuid(uuid: &str) -> Result<&str> {
    if uuid.trim().is_empty() {
        return Err(AcliError::Validation(
            "This value should not be blank.".to_string(),
        ));
    }
    if !UUID_PATTERN.is_match(uuid) {
        return Err(AcliError::Validation(
            "This is not a valid UUID.".to_string(),
        ));
    }
    Ok(uuid)
}

/// Everything a strategy may consult
pub struct ResolveContext<'a> {
    /// Value of `--cloud-app-uuid`, if given
    pub explicit_uuid: Option<&'a str>,
    pub repo_root: Option<&'a Path>,
    pub local_project: Option<&'a LocalProject>,
    pub host: &'a HostEnvironment,
    /// Client is only built when a strategy needs the network
    pub client: &'a ClientService,
    pub prompter: &'a dyn Prompter,
    /// Draw a progress bar during git-remote inference
    pub show_progress: bool,
}

/// @acp:summary "One way of finding the application UUID"
pub trait ApplicationSource {
    /// Short name used in debug logs
    fn name(&self) -> &'static str;

    /// `Ok(None)` passes to the next strategy; errors abort resolution
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Option<String>>;
}

/// An application UUID together with the strategy that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub uuid: String,
    pub source: &'static str,
}

/// @acp:summary "Runs strategies in priority order, stopping at the first hit"
pub struct ApplicationResolver {
    sources: Vec<Box<dyn ApplicationSource>>,
}

impl ApplicationResolver {
    /// The standard six-step chain
    pub fn new() -> Self {
        Self::with_sources(vec![
            Box::new(ExplicitOption),
            Box::new(LinkedLocalProject),
            Box::new(BltManifest),
            Box::new(CloudIdeEnvironment),
            Box::new(GitRemoteInference),
            Box::new(InteractivePrompt),
        ])
    }

    pub fn with_sources(sources: Vec<Box<dyn ApplicationSource>>) -> Self {
        Self { sources }
    }

    /// Names of the strategies, in the order they are tried
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Option<Resolution>> {
        for source in &self.sources {
            tracing::debug!("Trying application source: {}", source.name());
            if let Some(uuid) = source.resolve(ctx)? {
                tracing::debug!("Using Cloud application {} from {}", uuid, source.name());
                return Ok(Some(Resolution {
                    uuid,
                    source: source.name(),
                }));
            }
        }
        Ok(None)
    }
}

impl Default for ApplicationResolver {
    fn default() -> Self {
        Self::new()
    }
}
