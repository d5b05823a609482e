//! @acp:module "Remote Drush Command"
//! @acp:summary "remote:drush - run drush on a Cloud environment over SSH"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::{anyhow, Result};

use super::base::CommandBase;
use crate::ssh::{drush_command, SshHelper};

/// Remote drush options
pub struct DrushOptions {
    pub cloud_app_uuid: Option<String>,
    /// Arguments passed through to drush
    pub drush_args: Vec<String>,
}

/// @acp:summary "Proxy a drush command; the exit code is ssh's"
pub fn execute_drush(base: &mut CommandBase, options: DrushOptions) -> Result<i32> {
    let application_uuid = base
        .determine_cloud_application(options.cloud_app_uuid.as_deref(), false)?
        .ok_or_else(|| anyhow!("No Cloud application was selected"))?;
    let environment = base
        .determine_cloud_environment(&application_uuid)?
        .ok_or_else(|| anyhow!("No Cloud environment was selected"))?;

    let ssh_url = environment
        .ssh_url
        .as_deref()
        .ok_or_else(|| anyhow!("Environment {} has no SSH URL", environment.display_label()))?;
    let remote = drush_command(ssh_url, &options.drush_args);

    Ok(SshHelper::default().execute(&environment, &[remote], base.is_interactive())?)
}
