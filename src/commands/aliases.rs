//! @acp:module "Aliases Download Command"
//! @acp:summary "remote:aliases:download - install the account's drush aliases"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Fetches the drush aliases archive, stages it in the configured staging
//! directory and unpacks the files under `.drush/` into `$HOME/.drush`.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use flate2::read::GzDecoder;

use super::base::CommandBase;
use crate::error::AcliError;

const DRUSH_DIR: &str = ".drush";

/// @acp:summary "Download and install drush aliases"
///
/// A failure to stage the archive is logged and the command still exits 0.
pub fn execute_aliases_download(base: &CommandBase) -> Result<i32> {
    let aliases = base
        .cloud()?
        .drush_aliases()
        .context("Failed to download the drush aliases archive")?;

    let archive_path = base.settings().staging_dir.join(format!(
        "AcquiaDrushAliases{}.tar.gz",
        uuid::Uuid::new_v4().simple()
    ));
    println!(
        "Acquia Cloud Drush Aliases archive downloaded to {}",
        style(archive_path.display()).yellow()
    );

    if aliases.is_empty() {
        tracing::error!("Unable to download Drush Aliases");
        return Ok(0);
    }
    if let Err(e) = fs::write(&archive_path, &aliases) {
        tracing::debug!("Writing {} failed: {}", archive_path.display(), e);
        tracing::error!("Unable to download Drush Aliases");
        return Ok(0);
    }

    let home = base.host().home.clone().ok_or(AcliError::HomeNotFound)?;
    let drush_dir = prepare_drush_directory(&home)?;
    let installed = install_aliases(File::open(&archive_path)?, &drush_dir)
        .with_context(|| format!("Failed to extract {}", archive_path.display()))?;
    tracing::debug!("Installed {} alias file(s)", installed.len());

    println!(
        "Acquia Cloud Drush aliases installed into {}",
        style(drush_dir.display()).yellow()
    );

    if let Err(e) = fs::remove_file(&archive_path) {
        tracing::debug!("Could not remove {}: {}", archive_path.display(), e);
    }
    Ok(0)
}

/// @acp:summary "Ensure `<home>/.drush` exists and is writable by its owner"
pub fn prepare_drush_directory(home: &Path) -> crate::error::Result<PathBuf> {
    let drush_dir = home.join(DRUSH_DIR);

    if !drush_dir.is_dir() {
        let created = create_private_dir(&drush_dir);
        if created.is_err() && !drush_dir.is_dir() {
            return Err(AcliError::DirectoryNotCreated(drush_dir));
        }
    }

    if fs::metadata(&drush_dir)?.permissions().readonly() {
        restrict_to_owner(&drush_dir)?;
    }

    Ok(drush_dir)
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().mode(0o700).create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir(path)
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
fn restrict_to_owner(path: &Path) -> std::io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions)
}

/// Archive path as a `.drush/<file>` leaf, ignoring a leading `./`
fn drush_leaf(path: &Path) -> Option<&std::ffi::OsStr> {
    let mut components = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir));
    match (components.next(), components.next(), components.next()) {
        (Some(Component::Normal(dir)), Some(Component::Normal(file)), None)
            if dir == DRUSH_DIR =>
        {
            Some(file)
        }
        _ => None,
    }
}

/// @acp:summary "Unpack the regular files directly under `.drush/` into `drush_dir`"
///
/// Existing files are overwritten. Returns the written paths.
pub fn install_aliases<R: Read>(archive: R, drush_dir: &Path) -> crate::error::Result<Vec<PathBuf>> {
    let mut tarball = tar::Archive::new(GzDecoder::new(archive));
    let mut installed = Vec::new();

    for entry in tarball.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry.path()?.into_owned();
        let Some(file_name) = drush_leaf(&path) else {
            continue;
        };
        let target = drush_dir.join(file_name);
        entry.unpack(&target)?;
        installed.push(target);
    }

    Ok(installed)
}
