//! @acp:module "Auth Commands"
//! @acp:summary "auth:login and auth:logout"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;
use console::style;

use super::base::CommandBase;
use crate::cloud::{is_machine_authenticated, Credentials};
use crate::config::keys;
use crate::error::AcliError;

/// Login options
pub struct LoginOptions {
    pub key: Option<String>,
    pub secret: Option<String>,
}

/// @acp:summary "Store Cloud API credentials, prompting for anything missing"
pub fn execute_login(base: &CommandBase, options: LoginOptions) -> Result<i32> {
    let store = base.cloud_datastore();

    if base.is_interactive() && is_machine_authenticated(store)? {
        let reauth = base.prompter().confirm(
            "Your machine has already been authenticated with Acquia Cloud API, would you like to re-authenticate?",
            true,
        )?;
        if !reauth {
            return Ok(0);
        }
    }

    let key = match options.key.filter(|k| !k.is_empty()) {
        Some(key) => key,
        None => {
            println!(
                "You will need an Acquia Cloud API token from {}",
                style("https://cloud.acquia.com/a/profile/tokens").underlined()
            );
            base.prompter().input("Please enter your API Key")?
        }
    };
    let secret = match options.secret.filter(|s| !s.is_empty()) {
        Some(secret) => secret,
        None => base.prompter().password("Please enter your API Secret")?,
    };

    let credentials = Credentials {
        key: key.trim().to_string(),
        secret: secret.trim().to_string(),
    };
    if !credentials.is_complete() {
        return Err(AcliError::Validation("This value should not be blank.".to_string()).into());
    }
    credentials.save(store)?;

    println!(
        "{} Saved credentials to {}",
        style("✓").green(),
        style(store.path().display()).bold()
    );
    Ok(0)
}

/// @acp:summary "Forget the stored Cloud API credentials"
pub fn execute_logout(base: &CommandBase) -> Result<i32> {
    let store = base.cloud_datastore();
    let removed_key = store.remove(keys::KEY)?;
    let removed_secret = store.remove(keys::SECRET)?;

    if removed_key || removed_secret {
        println!(
            "{} Removed Acquia Cloud API credentials from {}",
            style("✓").green(),
            style(store.path().display()).bold()
        );
    } else {
        println!("No Acquia Cloud API credentials were stored.");
    }
    Ok(0)
}
