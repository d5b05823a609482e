//! @acp:module "Telemetry Command"
//! @acp:summary "telemetry - toggle anonymous usage reporting"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;
use console::style;

use super::base::CommandBase;
use crate::telemetry::{set_telemetry_preference, telemetry_preference};

/// Flip the stored preference. Unset counts as disabled.
pub fn execute_telemetry(base: &CommandBase) -> Result<i32> {
    let store = base.acli_datastore();
    let enabled = !telemetry_preference(store)?.unwrap_or(false);
    set_telemetry_preference(store, enabled)?;

    if enabled {
        println!("{} Telemetry has been enabled.", style("✓").green());
    } else {
        println!("{} Telemetry has been disabled.", style("✓").green());
    }
    Ok(0)
}
