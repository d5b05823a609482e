//! @acp:module "Git Remotes"
//! @acp:summary "Read remote URLs from a repository's .git/config"
//! @acp:domain cli
//! @acp:layer io

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Hostnames whose remotes belong to Acquia Cloud
pub const PROVIDER_HOSTNAMES: [&str; 2] = ["acquia.com", "acquia-sites.com"];

/// A `[remote "<name>"]` section with its url
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRemote {
    pub name: String,
    pub url: String,
}

impl GitRemote {
    /// Whether the url points at an Acquia-hosted repository
    pub fn is_provider_remote(&self) -> bool {
        PROVIDER_HOSTNAMES
            .iter()
            .any(|host| self.url.contains(host))
    }
}

pub fn git_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(".git").join("config")
}

/// @acp:summary "All remotes declared in <repo_root>/.git/config, in file order"
///
/// Returns `None` when the repository has no `.git/config`.
pub fn read_remotes(repo_root: &Path) -> Result<Option<Vec<GitRemote>>> {
    let path = git_config_path(repo_root);
    if !path.exists() {
        return Ok(None);
    }

    let config = git2::Config::open(&path)?;
    let mut remotes = Vec::new();
    let mut entries = config.entries(Some(r"remote\..*\.url"))?;
    while let Some(entry) = entries.next() {
        let entry = entry?;
        let (Some(name), Some(url)) = (entry.name(), entry.value()) else {
            continue;
        };
        let remote = name
            .strip_prefix("remote.")
            .and_then(|rest| rest.strip_suffix(".url"))
            .unwrap_or(name);
        remotes.push(GitRemote {
            name: remote.to_string(),
            url: url.to_string(),
        });
    }

    Ok(Some(remotes))
}

/// @acp:summary "URLs of the remotes hosted by Acquia"
pub fn provider_remote_urls(remotes: &[GitRemote]) -> Vec<String> {
    remotes
        .iter()
        .filter(|r| r.is_provider_remote())
        .map(|r| r.url.clone())
        .collect()
}

/// Convenience wrapper: provider remote URLs of a repository, empty when
/// it has no git config
pub fn get_git_remotes(repo_root: &Path) -> Result<Vec<String>> {
    Ok(read_remotes(repo_root)?
        .map(|remotes| provider_remote_urls(&remotes))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn repo_with_config(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        std::fs::write(git_config_path(temp.path()), config).unwrap();
        temp
    }

    #[test]
    fn test_only_provider_remotes_are_returned() {
        let repo = repo_with_config(
            r#"[core]
	repositoryformatversion = 0
	bare = false
[remote "origin"]
	url = git@github.com:example/site.git
	fetch = +refs/heads/*:refs/remotes/origin/*
[remote "acquia"]
	url = site@svn-3.prod.hosting.acquia.com:site.git
	fetch = +refs/heads/*:refs/remotes/acquia/*
[branch "main"]
	remote = origin
"#,
        );

        let urls = get_git_remotes(repo.path()).unwrap();
        assert_eq!(urls, vec!["site@svn-3.prod.hosting.acquia.com:site.git".to_string()]);
    }

    #[test]
    fn test_read_remotes_keeps_names() {
        let repo = repo_with_config(
            "[remote \"cloud\"]\n\turl = site@site.ssh.prod.acquia-sites.com:site.git\n",
        );

        let remotes = read_remotes(repo.path()).unwrap().unwrap();
        assert_eq!(remotes.len(), 1);
        assert_eq!(remotes[0].name, "cloud");
        assert!(remotes[0].is_provider_remote());
    }

    #[test]
    fn test_missing_git_config() {
        let temp = TempDir::new().unwrap();
        assert_eq!(read_remotes(temp.path()).unwrap(), None);
        assert!(get_git_remotes(temp.path()).unwrap().is_empty());
    }
}
