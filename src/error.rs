//! @acp:module "Errors"
//! @acp:summary "Library error type and Result alias"
//! @acp:domain cli
//! @acp:layer core

use std::path::PathBuf;

use thiserror::Error;

/// @acp:summary "Errors raised by the acli library"
#[derive(Debug, Error)]
pub enum AcliError {
    #[error("This machine is not yet authenticated with Acquia Cloud. Please run `acli auth:login`")]
    NotAuthenticated,

    /// User input failed validation (malformed UUID, blank value)
    #[error("{0}")]
    Validation(String),

    #[error("Could not find a local Drupal project. Looked for `docroot/index.php` in current and parent directories. Please execute this command from within a Drupal project directory.")]
    NoDrupalProject,

    #[error("Acquia Cloud API request failed: {0}")]
    Api(String),

    #[error("Home directory not found.")]
    HomeNotFound,

    #[error("Directory \"{}\" was not created", .0.display())]
    DirectoryNotCreated(PathBuf),

    #[error("SSH command failed: {0}")]
    Ssh(String),

    #[error("This command requires interactive input: {0}")]
    InteractionRequired(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Git config error: {0}")]
    Git(#[from] git2::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, AcliError>;
