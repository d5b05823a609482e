//! Shared fakes for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use acli::cloud::{EnvironmentFlags, Vcs};
use acli::{
    AcliError, Application, CloudApi, CommandBase, Environment, HostEnvironment, LogType, Prompter,
    Result, Settings,
};
use tempfile::TempDir;

pub type CallLog = Rc<RefCell<Vec<String>>>;

/// In-memory Cloud API that records every call
#[derive(Default)]
pub struct FakeCloud {
    pub applications: Vec<Application>,
    pub environments: Vec<(String, Vec<Environment>)>,
    pub aliases: Vec<u8>,
    pub calls: CallLog,
}

impl FakeCloud {
    pub fn new(calls: CallLog) -> Self {
        Self {
            calls,
            ..Default::default()
        }
    }

    pub fn with_application(mut self, uuid: &str, name: &str, environments: Vec<Environment>) -> Self {
        self.applications.push(Application {
            uuid: uuid.to_string(),
            name: name.to_string(),
        });
        self.environments.push((uuid.to_string(), environments));
        self
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl CloudApi for FakeCloud {
    fn applications(&self) -> Result<Vec<Application>> {
        self.record("applications".to_string());
        Ok(self.applications.clone())
    }

    fn application(&self, uuid: &str) -> Result<Application> {
        self.record(format!("application:{}", uuid));
        self.applications
            .iter()
            .find(|a| a.uuid == uuid)
            .cloned()
            .ok_or_else(|| AcliError::Api(format!("HTTP 404: {}", uuid)))
    }

    fn environments(&self, application_uuid: &str) -> Result<Vec<Environment>> {
        self.record(format!("environments:{}", application_uuid));
        Ok(self
            .environments
            .iter()
            .find(|(uuid, _)| uuid == application_uuid)
            .map(|(_, envs)| envs.clone())
            .unwrap_or_default())
    }

    fn environment(&self, environment_id: &str) -> Result<Environment> {
        self.record(format!("environment:{}", environment_id));
        self.environments
            .iter()
            .flat_map(|(_, envs)| envs.iter())
            .find(|e| e.id == environment_id)
            .cloned()
            .ok_or_else(|| AcliError::Api(format!("HTTP 404: {}", environment_id)))
    }

    fn logs(&self, environment_id: &str) -> Result<Vec<LogType>> {
        self.record(format!("logs:{}", environment_id));
        Ok(Vec::new())
    }

    fn download_log(&self, environment_id: &str, log_type: &str) -> Result<Vec<u8>> {
        self.record(format!("download_log:{}:{}", environment_id, log_type));
        Ok(Vec::new())
    }

    fn drush_aliases(&self) -> Result<Vec<u8>> {
        self.record("drush_aliases".to_string());
        Ok(self.aliases.clone())
    }
}

/// Prompter answering from a script and recording what it was asked
#[derive(Default)]
pub struct ScriptedPrompter {
    pub confirm_answer: bool,
    pub select_labels: RefCell<VecDeque<String>>,
    pub asked: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new(confirm_answer: bool, select_labels: &[&str], asked: Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            confirm_answer,
            select_labels: RefCell::new(select_labels.iter().map(|s| s.to_string()).collect()),
            asked,
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(format!("confirm:{}", console::strip_ansi_codes(prompt)));
        Ok(self.confirm_answer)
    }

    fn select(&self, prompt: &str, labels: &[String]) -> Result<Option<usize>> {
        self.asked.borrow_mut().push(format!("select:{}", prompt));
        let wanted = self.select_labels.borrow_mut().pop_front();
        Ok(wanted.and_then(|w| labels.iter().position(|l| *l == w)))
    }

    fn multi_select(&self, prompt: &str, _labels: &[String]) -> Result<Vec<usize>> {
        self.asked.borrow_mut().push(format!("multi_select:{}", prompt));
        Ok(Vec::new())
    }

    fn input(&self, prompt: &str) -> Result<String> {
        Err(AcliError::InteractionRequired(prompt.to_string()))
    }

    fn password(&self, prompt: &str) -> Result<String> {
        Err(AcliError::InteractionRequired(prompt.to_string()))
    }
}

pub fn environment(id: &str, production: bool, vcs_url: &str) -> Environment {
    Environment {
        id: id.to_string(),
        name: if production { "prod" } else { "dev" }.to_string(),
        label: String::new(),
        ssh_url: Some(format!("site.{}@site.ssh.hosting.acquia.com", id)),
        flags: EnvironmentFlags { production },
        vcs: Vcs {
            url: Some(vcs_url.to_string()),
        },
    }
}

/// A temp dir holding config files and a Drupal checkout at `<tmp>/site`
pub struct Workspace {
    pub temp: TempDir,
    pub repo_root: PathBuf,
    pub staging_dir: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let repo_root = temp.path().join("site");
        std::fs::create_dir_all(repo_root.join("docroot")).unwrap();
        std::fs::write(repo_root.join("docroot/index.php"), "<?php").unwrap();
        let staging_dir = temp.path().join("staging");
        std::fs::create_dir(&staging_dir).unwrap();
        Self {
            temp,
            repo_root,
            staging_dir,
        }
    }

    pub fn settings(&self) -> Settings {
        let mut settings = Settings::with_overrides(
            Some(self.temp.path().join("cloud_api.conf")),
            Some(self.temp.path().join("acquia-cli.json")),
            None,
            None,
        );
        settings.staging_dir = self.staging_dir.clone();
        settings
    }

    pub fn acli_config_path(&self) -> PathBuf {
        self.temp.path().join("acquia-cli.json")
    }

    pub fn write_git_config(&self, remotes: &[(&str, &str)]) {
        let mut config = String::from("[core]\n\trepositoryformatversion = 0\n");
        for (name, url) in remotes {
            config.push_str(&format!(
                "[remote \"{}\"]\n\turl = {}\n\tfetch = +refs/heads/*:refs/remotes/{}/*\n",
                name, url, name
            ));
        }
        std::fs::create_dir_all(self.repo_root.join(".git")).unwrap();
        std::fs::write(self.repo_root.join(".git/config"), config).unwrap();
    }

    pub fn write_blt(&self, contents: &str) {
        std::fs::create_dir_all(self.repo_root.join("blt")).unwrap();
        std::fs::write(self.repo_root.join("blt/blt.yml"), contents).unwrap();
    }

    /// Base with credentials stored and the project loaded
    pub fn base(&self, host: HostEnvironment, cloud: FakeCloud, prompter: ScriptedPrompter) -> CommandBase {
        self.base_at(Some(&self.repo_root), host, cloud, prompter)
    }

    pub fn base_at(
        &self,
        repo_root: Option<&Path>,
        host: HostEnvironment,
        cloud: FakeCloud,
        prompter: ScriptedPrompter,
    ) -> CommandBase {
        let settings = self.settings();
        let credentials = settings.cloud_datastore();
        credentials.set("key", "k".into()).unwrap();
        credentials.set("secret", "s".into()).unwrap();

        let mut base = CommandBase::new(settings, host, repo_root.map(Path::to_path_buf), false)
            .with_prompter(Box::new(prompter))
            .with_cloud_client(Box::new(cloud));
        base.initialize(true).unwrap();
        base
    }
}
