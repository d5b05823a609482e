//! @acp:module "SSH"
//! @acp:summary "Run commands on Cloud environments over the system ssh client"
//! @acp:domain cli
//! @acp:layer io

use std::process::Command;

use crate::cloud::Environment;
use crate::error::{AcliError, Result};

/// @acp:summary "Thin wrapper around the `ssh` binary"
#[derive(Debug, Clone)]
pub struct SshHelper {
    program: String,
}

impl Default for SshHelper {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
        }
    }
}

impl SshHelper {
    /// Use a different ssh executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Argument vector for `ssh`, excluding the program name
    pub fn build_ssh_args(ssh_url: &str, remote_command: &[String], tty: bool) -> Vec<String> {
        let mut args = Vec::with_capacity(remote_command.len() + 6);
        if tty {
            args.push("-t".to_string());
        }
        args.extend([
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "LogLevel=ERROR".to_string(),
            ssh_url.to_string(),
        ]);
        args.extend(remote_command.iter().cloned());
        args
    }

    /// @acp:summary "Run a command on an environment, returning ssh's exit code"
    ///
    /// stdin/stdout/stderr are inherited from acli.
    pub fn execute(&self, environment: &Environment, remote_command: &[String], tty: bool) -> Result<i32> {
        let ssh_url = environment.ssh_url.as_deref().ok_or_else(|| {
            AcliError::Ssh(format!(
                "Environment {} has no SSH URL",
                environment.display_label()
            ))
        })?;

        let args = Self::build_ssh_args(ssh_url, remote_command, tty);
        tracing::debug!("Running {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| AcliError::Ssh(format!("Failed to start {}: {}", self.program, e)))?;

        // Killed by a signal
        Ok(status.code().unwrap_or(1))
    }
}

/// `site.env` part of `site.env@host`
pub fn ssh_user(ssh_url: &str) -> &str {
    ssh_url.split('@').next().unwrap_or(ssh_url)
}

/// @acp:summary "Remote shell line running drush in the environment's docroot"
pub fn drush_command(ssh_url: &str, drush_args: &[String]) -> String {
    let mut line = format!("cd /var/www/html/{}/docroot; drush", ssh_user(ssh_url));
    for arg in drush_args {
        line.push(' ');
        line.push_str(&shell_quote(arg));
    }
    line
}

/// Single-quote an argument for the remote shell when needed
fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
