//! @acp:module "Log Download Command"
//! @acp:summary "log:download - fetch environment logs into a local directory"
//! @acp:domain cli
//! @acp:layer handler

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::base::CommandBase;
use crate::cloud::{CloudApi, Environment, LogType};
use crate::interactive::prompt_choose_logs;

/// Log download options
pub struct LogDownloadOptions {
    pub cloud_app_uuid: Option<String>,
    /// Directory the archives are written to
    pub destination: PathBuf,
}

/// `<env>-<type>.tar.gz`
pub fn log_file_name(environment: &Environment, log: &LogType) -> String {
    format!("{}-{}.tar.gz", environment.name, log.log_type)
}

/// @acp:summary "Choose an environment and logs, then download each one"
pub fn execute_log_download(base: &mut CommandBase, options: LogDownloadOptions) -> Result<i32> {
    let application_uuid = base
        .determine_cloud_application(options.cloud_app_uuid.as_deref(), false)?
        .ok_or_else(|| anyhow!("No Cloud application was selected"))?;
    let environment = base
        .determine_cloud_environment(&application_uuid)?
        .ok_or_else(|| anyhow!("No Cloud environment was selected"))?;

    let cloud = base.cloud()?;
    let logs = prompt_choose_logs(base.prompter(), cloud, &environment.id)?;
    if logs.is_empty() {
        println!("{} No logs selected.", style("!").yellow());
        return Ok(0);
    }

    let written = download_logs(
        cloud,
        &environment,
        &logs,
        &options.destination,
        base.is_interactive(),
    )?;
    for path in written {
        println!(
            "{} Log downloaded to {}",
            style("✓").green(),
            style(path.display()).bold()
        );
    }
    Ok(0)
}

/// Download the given logs into `destination`, returning the written files
pub fn download_logs(
    cloud: &dyn CloudApi,
    environment: &Environment,
    logs: &[LogType],
    destination: &Path,
    show_progress: bool,
) -> Result<Vec<PathBuf>> {
    let progress = if show_progress {
        ProgressBar::new(logs.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let mut written = Vec::with_capacity(logs.len());
    for log in logs {
        progress.set_message(format!("Downloading {}", log.label));
        let bytes = cloud
            .download_log(&environment.id, &log.log_type)
            .with_context(|| format!("Failed to download the {} log", log.log_type))?;
        let path = destination.join(log_file_name(environment, log));
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(written)
}
