//! @acp:module "Application Sources"
//! @acp:summary "The individual strategies of the resolution chain"
//! @acp:domain cli
//! @acp:layer service

use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::{validate_uuid, ApplicationSource, ResolveContext};
use crate::cloud::{Application, CloudApi, Environment};
use crate::error::Result;
use crate::git;
use crate::interactive::prompt_choose_application;

/// `--cloud-app-uuid`
pub struct ExplicitOption;

impl ApplicationSource for ExplicitOption {
    fn name(&self) -> &'static str {
        "option"
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Option<String>> {
        match ctx.explicit_uuid {
            Some(uuid) if !uuid.is_empty() => Ok(Some(validate_uuid(uuid)?.to_string())),
            _ => Ok(None),
        }
    }
}

/// Application already linked to the local project
pub struct LinkedLocalProject;

impl ApplicationSource for LinkedLocalProject {
    fn name(&self) -> &'static str {
        "local project"
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Option<String>> {
        Ok(ctx
            .local_project
            .filter(|p| p.is_linked())
            .and_then(|p| p.cloud_application_uuid.clone()))
    }
}

/// `cloud.appId` in `<repo>/blt/blt.yml`
pub struct BltManifest;

impl BltManifest {
    pub fn manifest_path(repo_root: &Path) -> std::path::PathBuf {
        repo_root.join("blt").join("blt.yml")
    }

    /// Read `cloud.appId`; non-string values are ignored
    pub fn read_app_id(repo_root: &Path) -> Result<Option<String>> {
        let path = Self::manifest_path(repo_root);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let manifest: serde_yaml::Value = serde_yaml::from_str(&content)?;
        Ok(manifest
            .get("cloud")
            .and_then(|cloud| cloud.get("appId"))
            .and_then(|id| id.as_str())
            .filter(|id| !id.is_empty())
            .map(str::to_string))
    }
}

impl ApplicationSource for BltManifest {
    fn name(&self) -> &'static str {
        "blt.yml"
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Option<String>> {
        let Some(root) = ctx.repo_root else {
            return Ok(None);
        };
        let app_id = Self::read_app_id(root)?;
        if let Some(id) = &app_id {
            tracing::debug!("Using Cloud application UUID {} from blt/blt.yml", id);
        }
        Ok(app_id)
    }
}

/// `ACQUIA_APPLICATION_UUID` set by a Cloud IDE
pub struct CloudIdeEnvironment;

impl ApplicationSource for CloudIdeEnvironment {
    fn name(&self) -> &'static str {
        "cloud ide"
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Option<String>> {
        Ok(ctx.host.cloud_ide_application_uuid().map(str::to_string))
    }
}

/// Match local git remotes against production VCS URLs
pub struct GitRemoteInference;

impl ApplicationSource for GitRemoteInference {
    fn name(&self) -> &'static str {
        "git remotes"
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Option<String>> {
        let Some(root) = ctx.repo_root else {
            return Ok(None);
        };
        let remotes = git::get_git_remotes(root)?;
        if remotes.is_empty() {
            tracing::debug!("No Acquia git remotes in {}", root.display());
            return Ok(None);
        }

        println!(
            "There is no Acquia Cloud application linked to {}.",
            style(root.join(".git").display()).bold()
        );
        println!("Searching for a matching Cloud application...");

        let cloud = ctx.client.get_client()?;
        match find_cloud_application_by_git_url(cloud, &remotes, ctx.show_progress)? {
            Some(application) => {
                println!("{} Found a matching application!", style("✓").green());
                Ok(Some(application.uuid))
            }
            None => {
                println!(
                    "{} Could not find a matching Cloud application.",
                    style("!").yellow()
                );
                Ok(None)
            }
        }
    }
}

/// @acp:summary "First application with a production environment whose VCS URL is a local remote"
///
/// Environments are fetched one application at a time and the scan stops
/// at the first match.
pub fn find_cloud_application_by_git_url(
    cloud: &dyn CloudApi,
    local_git_remotes: &[String],
    show_progress: bool,
) -> Result<Option<Application>> {
    let applications = cloud.applications()?;
    let count = applications.len();

    let progress = search_progress(count as u64, show_progress);
    progress.set_message(format!(
        "Searching {} on Acquia Cloud...",
        style(format!("{} applications", count)).bold()
    ));

    for application in applications {
        progress.set_message(format!(
            "Searching {} for matching git URLs",
            style(&application.name).bold()
        ));
        let environments = cloud.environments(&application.uuid)?;
        if search_environments_for_git_url(&application, &environments, local_git_remotes) {
            progress.finish_and_clear();
            return Ok(Some(application));
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(None)
}

/// Bar counting searched applications, ticking while a request is in flight
fn search_progress(count: u64, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(count);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{pos}/{len}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(120));
    progress
}

fn search_environments_for_git_url(
    application: &Application,
    environments: &[Environment],
    local_git_remotes: &[String],
) -> bool {
    environments.iter().any(|environment| {
        let matched = environment.is_production()
            && environment
                .vcs
                .url
                .as_ref()
                .is_some_and(|url| local_git_remotes.contains(url));
        if matched {
            tracing::debug!(
                "Found matching Cloud application! {} with uuid {} matches local git URL {}",
                application.name,
                application.uuid,
                environment.vcs.url.as_deref().unwrap_or_default()
            );
        }
        matched
    })
}

/// Last resort: ask
pub struct InteractivePrompt;

impl ApplicationSource for InteractivePrompt {
    fn name(&self) -> &'static str {
        "prompt"
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Option<String>> {
        let cloud = ctx.client.get_client()?;
        Ok(prompt_choose_application(ctx.prompter, cloud)?.map(|a| a.uuid))
    }
}
