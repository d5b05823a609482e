//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Each command is in its own submodule. Handlers take the shared
//! [`CommandBase`] and return the process exit code.

pub mod aliases;
pub mod auth;
pub mod base;
pub mod drush;
pub mod link;
pub mod logs;
pub mod telemetry;

pub use aliases::{execute_aliases_download, install_aliases, prepare_drush_directory};
pub use auth::{execute_login, execute_logout, LoginOptions};
pub use base::CommandBase;
pub use drush::{execute_drush, DrushOptions};
pub use link::{execute_link, LinkOptions};
pub use logs::{execute_log_download, LogDownloadOptions};
pub use telemetry::execute_telemetry;
