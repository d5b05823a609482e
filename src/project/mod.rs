//! @acp:module "Project Discovery"
//! @acp:summary "Locate the root of the local Drupal project"
//! @acp:domain cli
//! @acp:layer detection

use std::path::{Path, PathBuf};

/// File whose presence marks a project root
pub const ROOT_MARKER: &str = "docroot/index.php";

/// @acp:summary "Nearest directory at or above `start` containing docroot/index.php"
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(ROOT_MARKER).is_file())
        .map(Path::to_path_buf)
}

/// Repo root for the current working directory
pub fn current_repo_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_repo_root(&cwd)
}
