#![forbid(unsafe_code)]

//! @acp:module "Acquia CLI Library"
//! @acp:summary "Acquia Cloud API client, local project links and command plumbing"
//! @acp:domain cli
//! @acp:layer api
//! @acp:stability stable
//!
//! # acli
//!
//! Command-line client for the Acquia Cloud API.
//!
//! ## Features
//!
//! - **Project links**: remembers which Cloud application a local checkout belongs to
//! - **Application resolution**: option, link, `blt.yml`, Cloud IDE, git remotes, prompt
//! - **Remote helpers**: drush aliases, drush over SSH, log downloads
//! - **Opt-in telemetry**: asked once, stored permanently
//!
//! ## Example
//!
//! ```rust,no_run
//! use acli::{ApplicationResolver, CommandBase, HostEnvironment, Settings};
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = acli::project::current_repo_root();
//!     let mut base = CommandBase::new(Settings::default(), HostEnvironment::from_env(), root, true);
//!     base.initialize(true)?;
//!
//!     if let Some(uuid) = base.determine_cloud_application(None, false)? {
//!         println!("Using application {}", uuid);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cloud;
pub mod commands;
pub mod config;
pub mod error;
pub mod git;
pub mod host;
pub mod interactive;
pub mod project;
pub mod resolve;
pub mod ssh;
pub mod telemetry;

// Re-exports
pub use cloud::{
    is_machine_authenticated, Application, ClientService, CloudApi, CloudClient, Credentials,
    Environment, LogType,
};
pub use commands::CommandBase;
pub use config::{ApiEndpoints, JsonFileStore, LocalProject, LocalUserConfig, Settings};
pub use error::{AcliError, Result};
pub use git::{get_git_remotes, GitRemote};
pub use host::HostEnvironment;
pub use interactive::{
    choose_from_objects, choose_many_from_objects, DialoguerPrompter, NonInteractivePrompter,
    Prompter,
};
pub use resolve::{ApplicationResolver, ApplicationSource, Resolution, ResolveContext};
pub use ssh::SshHelper;
pub use telemetry::{CommandEvent, OsInfo, Telemetry};

/// Version string reported to the Cloud API and analytics
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
