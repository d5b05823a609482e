//! @acp:module "Command Base"
//! @acp:summary "State and behaviour shared by every acli command"
//! @acp:domain cli
//! @acp:layer handler
//!
//! A [`CommandBase`] is built once per invocation from [`Settings`] and the
//! captured [`HostEnvironment`]. [`CommandBase::initialize`] runs the
//! telemetry and authentication gates before any command body.

use std::path::{Path, PathBuf};

use console::style;

use crate::cloud::{is_machine_authenticated, Application, ClientService, CloudApi, Environment};
use crate::config::{JsonFileStore, LocalProject, LocalUserConfig, Settings};
use crate::error::{AcliError, Result};
use crate::host::HostEnvironment;
use crate::interactive::{prompt_choose_environment, DialoguerPrompter, NonInteractivePrompter, Prompter};
use crate::resolve::{ApplicationResolver, ResolveContext};
use crate::telemetry;

/// @acp:summary "Per-invocation context: stores, client, prompter and project"
/// @acp:lock normal
pub struct CommandBase {
    settings: Settings,
    cloud_datastore: JsonFileStore,
    acli_datastore: JsonFileStore,
    client_service: ClientService,
    prompter: Box<dyn Prompter>,
    resolver: ApplicationResolver,
    host: HostEnvironment,
    repo_root: Option<PathBuf>,
    interactive: bool,
    local_project: Option<LocalProject>,
}

impl CommandBase {
    pub fn new(
        settings: Settings,
        host: HostEnvironment,
        repo_root: Option<PathBuf>,
        interactive: bool,
    ) -> Self {
        let prompter: Box<dyn Prompter> = if interactive {
            Box::new(DialoguerPrompter::new())
        } else {
            Box::new(NonInteractivePrompter)
        };

        Self {
            cloud_datastore: settings.cloud_datastore(),
            acli_datastore: settings.acli_datastore(),
            client_service: ClientService::new(
                settings.cloud_datastore(),
                settings.endpoints.clone(),
            ),
            settings,
            prompter,
            resolver: ApplicationResolver::new(),
            host,
            repo_root,
            interactive,
            local_project: None,
        }
    }

    pub fn with_prompter(mut self, prompter: Box<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    /// Use a pre-built Cloud API client
    pub fn with_cloud_client(mut self, client: Box<dyn CloudApi>) -> Self {
        self.client_service = ClientService::new(
            self.settings.cloud_datastore(),
            self.settings.endpoints.clone(),
        )
        .with_client(client);
        self
    }

    pub fn with_resolver(mut self, resolver: ApplicationResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cloud_datastore(&self) -> &JsonFileStore {
        &self.cloud_datastore
    }

    pub fn acli_datastore(&self) -> &JsonFileStore {
        &self.acli_datastore
    }

    pub fn host(&self) -> &HostEnvironment {
        &self.host
    }

    pub fn repo_root(&self) -> Option<&Path> {
        self.repo_root.as_deref()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    /// Record of the current repository, once loaded
    pub fn local_project(&self) -> Option<&LocalProject> {
        self.local_project.as_ref()
    }

    /// The memoized Cloud API client
    pub fn cloud(&self) -> Result<&dyn CloudApi> {
        self.client_service.get_client()
    }

    /// @acp:summary "Telemetry gate, then auth gate, then local project load"
    pub fn initialize(&mut self, requires_auth: bool) -> Result<()> {
        telemetry::check_and_prompt_preference(
            &self.acli_datastore,
            self.prompter.as_ref(),
            self.interactive,
        )?;

        if requires_auth && !is_machine_authenticated(&self.cloud_datastore)? {
            return Err(AcliError::NotAuthenticated);
        }

        self.load_local_project_info()
    }

    /// @acp:summary "Load the record for the repo root, creating a stub when missing"
    pub fn load_local_project_info(&mut self) -> Result<()> {
        tracing::debug!("Loading local project information...");
        let Some(root) = self.repo_root.clone() else {
            return Ok(());
        };

        let key = &self.settings.acli_config_key;
        let mut config = LocalUserConfig::load(&self.acli_datastore, key)?;
        let (project, created) = config.find_or_insert_stub(&root);
        if created {
            tracing::debug!("Saving local project information.");
            config.save(&self.acli_datastore, key)?;
        } else {
            tracing::debug!("Matching local project found.");
        }
        self.local_project = Some(project);
        Ok(())
    }

    fn is_linked(&self) -> bool {
        self.local_project.as_ref().is_some_and(LocalProject::is_linked)
    }

    /// @acp:summary "Resolve the Cloud application and offer to link it"
    ///
    /// With `link_app` the application is linked without asking. Otherwise
    /// the user is asked, except inside a Cloud IDE.
    pub fn determine_cloud_application(
        &mut self,
        explicit_uuid: Option<&str>,
        link_app: bool,
    ) -> Result<Option<String>> {
        let resolution = {
            let ctx = ResolveContext {
                explicit_uuid,
                repo_root: self.repo_root.as_deref(),
                local_project: self.local_project.as_ref(),
                host: &self.host,
                client: &self.client_service,
                prompter: self.prompter.as_ref(),
                show_progress: self.interactive,
            };
            self.resolver.resolve(&ctx)?
        };
        let Some(resolution) = resolution else {
            return Ok(None);
        };

        if self.repo_root.is_some() && !self.is_linked() {
            let application = self.cloud()?.application(&resolution.uuid)?;
            if link_app {
                self.save_local_config_cloud_app_uuid(&application)?;
            } else if !self.host.is_acquia_cloud_ide() {
                self.prompt_link_application(&application)?;
            }
        }

        Ok(Some(resolution.uuid))
    }

    /// Ask which environment of an application to use
    pub fn determine_cloud_environment(
        &self,
        application_uuid: &str,
    ) -> Result<Option<Environment>> {
        prompt_choose_environment(self.prompter.as_ref(), self.cloud()?, application_uuid)
    }

    pub fn prompt_link_application(&mut self, application: &Application) -> Result<bool> {
        let question = format!(
            "Would you like to link the Cloud application {} to this repository?",
            style(&application.name).bold()
        );
        if self.prompter.confirm(&question, true)? {
            self.save_local_config_cloud_app_uuid(application)
        } else {
            Ok(false)
        }
    }

    /// @acp:summary "Persist the application UUID on the current repository's record"
    ///
    /// Returns false when there is no repository to link.
    pub fn save_local_config_cloud_app_uuid(&mut self, application: &Application) -> Result<bool> {
        let Some(root) = self.repo_root.clone() else {
            return Ok(false);
        };

        let key = &self.settings.acli_config_key;
        let mut config = LocalUserConfig::load(&self.acli_datastore, key)?;
        let project = config.link(&root, &application.uuid);
        config.save(&self.acli_datastore, key)?;
        self.local_project = Some(project);

        println!(
            "{} The Cloud application {} has been linked to this repository",
            style("✓").green(),
            style(&application.name).bold()
        );
        Ok(true)
    }

    /// Repo root, or an error when not inside a Drupal project
    pub fn validate_cwd_is_valid_drupal_project(&self) -> Result<&Path> {
        self.repo_root.as_deref().ok_or(AcliError::NoDrupalProject)
    }
}
