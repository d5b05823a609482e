//! @acp:module "Cloud Pickers"
//! @acp:summary "Prompts for choosing Cloud applications, environments and logs"
//! @acp:domain cli
//! @acp:layer ui

use super::{choose_from_objects, choose_many_from_objects, Prompter};
use crate::cloud::{Application, CloudApi, Environment, LogType};
use crate::error::Result;

/// @acp:summary "Ask which of the account's applications to use"
pub fn prompt_choose_application(
    prompter: &dyn Prompter,
    cloud: &dyn CloudApi,
) -> Result<Option<Application>> {
    let applications = cloud.applications()?;
    Ok(choose_from_objects(
        prompter,
        &applications,
        |a| a.uuid.as_str(),
        |a| a.name.as_str(),
        "Please select an Acquia Cloud application:",
    )?
    .cloned())
}

/// @acp:summary "Ask which environment of an application to use"
pub fn prompt_choose_environment(
    prompter: &dyn Prompter,
    cloud: &dyn CloudApi,
    application_uuid: &str,
) -> Result<Option<Environment>> {
    let environments = cloud.environments(application_uuid)?;
    Ok(choose_from_objects(
        prompter,
        &environments,
        |e| e.id.as_str(),
        |e| e.name.as_str(),
        "Please select an Acquia Cloud environment:",
    )?
    .cloned())
}

/// @acp:summary "Ask which logs of an environment to use (multi-select)"
pub fn prompt_choose_logs(
    prompter: &dyn Prompter,
    cloud: &dyn CloudApi,
    environment_id: &str,
) -> Result<Vec<LogType>> {
    let logs = cloud.logs(environment_id)?;
    Ok(choose_many_from_objects(
        prompter,
        &logs,
        |l| l.log_type.as_str(),
        |l| l.label.as_str(),
        "Please select one or more logs:",
    )?
    .into_iter()
    .cloned()
    .collect())
}
