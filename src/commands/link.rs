//! @acp:module "Link Command"
//! @acp:summary "link - associate the current repository with a Cloud application"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;
use console::style;

use super::base::CommandBase;

/// Link options
pub struct LinkOptions {
    pub cloud_app_uuid: Option<String>,
}

/// @acp:summary "Resolve an application and link it without asking"
///
/// Exits 1 when the repository is already linked or nothing was chosen.
pub fn execute_link(base: &mut CommandBase, options: LinkOptions) -> Result<i32> {
    base.validate_cwd_is_valid_drupal_project()?;

    if let Some(uuid) = base
        .local_project()
        .filter(|p| p.is_linked())
        .and_then(|p| p.cloud_application_uuid.clone())
    {
        println!(
            "{} This repository is already linked to Cloud application {}.",
            style("!").yellow(),
            style(uuid).bold()
        );
        return Ok(1);
    }

    match base.determine_cloud_application(options.cloud_app_uuid.as_deref(), true)? {
        Some(_) => Ok(0),
        None => {
            eprintln!("{} No Cloud application was selected.", style("✗").red());
            Ok(1)
        }
    }
}
