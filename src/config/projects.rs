//! @acp:module "Local Projects"
//! @acp:summary "Records linking local repository directories to Cloud applications"
//! @acp:domain cli
//! @acp:layer config
//!
//! Records are keyed by `directory`. They are created on first use of a
//! directory and updated when an application is linked; nothing here
//! removes them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::store::JsonFileStore;
use crate::error::Result;

/// @acp:summary "A local repository known to acli"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalProject {
    pub name: String,

    /// Absolute repository root, unique within the store
    pub directory: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_application_uuid: Option<String>,

    /// Fields written by other tools, kept as-is on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocalProject {
    /// Unlinked record named after the directory's last component
    pub fn stub(directory: &Path) -> Self {
        let name = directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| directory.display().to_string());

        Self {
            name,
            directory: directory.to_path_buf(),
            cloud_application_uuid: None,
            extra: Map::new(),
        }
    }

    pub fn is_linked(&self) -> bool {
        self.cloud_application_uuid
            .as_deref()
            .is_some_and(|uuid| !uuid.is_empty())
    }
}

/// @acp:summary "The persisted list of local projects"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalUserConfig {
    #[serde(rename = "localProjects", default)]
    pub local_projects: Vec<LocalProject>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocalUserConfig {
    /// @acp:summary "Load from the acli datastore, empty when absent"
    pub fn load(store: &JsonFileStore, key: &str) -> Result<Self> {
        Ok(store.get_as(key)?.unwrap_or_default())
    }

    pub fn save(&self, store: &JsonFileStore, key: &str) -> Result<()> {
        store.set_as(key, self)
    }

    pub fn find(&self, directory: &Path) -> Option<&LocalProject> {
        self.local_projects.iter().find(|p| p.directory == directory)
    }

    /// @acp:summary "Return the record for a directory, appending a stub if missing"
    ///
    /// The boolean is true when a stub was created.
    pub fn find_or_insert_stub(&mut self, directory: &Path) -> (LocalProject, bool) {
        if let Some(project) = self.find(directory) {
            return (project.clone(), false);
        }
        let project = LocalProject::stub(directory);
        self.local_projects.push(project.clone());
        (project, true)
    }

    /// @acp:summary "Set the application UUID on a directory's record"
    ///
    /// Creates the record first when the directory is unknown. Other
    /// records are left untouched.
    pub fn link(&mut self, directory: &Path, application_uuid: &str) -> LocalProject {
        let index = match self
            .local_projects
            .iter()
            .position(|p| p.directory == directory)
        {
            Some(index) => index,
            None => {
                self.local_projects.push(LocalProject::stub(directory));
                self.local_projects.len() - 1
            }
        };
        let project = &mut self.local_projects[index];
        project.cloud_application_uuid = Some(application_uuid.to_string());
        project.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    const KEY: &str = "acquia-cli.json";

    #[test]
    fn test_stub_is_named_after_directory() {
        let project = LocalProject::stub(Path::new("/home/dev/sites/mysite"));
        assert_eq!(project.name, "mysite");
        assert_eq!(project.directory, PathBuf::from("/home/dev/sites/mysite"));
        assert!(!project.is_linked());
    }

    #[test]
    fn test_find_or_insert_stub_only_once() {
        let mut config = LocalUserConfig::default();
        let dir = Path::new("/srv/project");

        let (_, created) = config.find_or_insert_stub(dir);
        assert!(created);
        let (project, created) = config.find_or_insert_stub(dir);
        assert!(!created);

        assert_eq!(config.local_projects.len(), 1);
        assert_eq!(project.directory, dir);
        assert_eq!(project.cloud_application_uuid, None);
    }

    #[test]
    fn test_link_touches_only_matching_record() {
        let mut config = LocalUserConfig::default();
        config.find_or_insert_stub(Path::new("/srv/one"));
        config.find_or_insert_stub(Path::new("/srv/two"));
        let untouched = config.find(Path::new("/srv/one")).cloned();

        config.link(Path::new("/srv/two"), "a47ac10b-58cc-4372-a567-0e02b2c3d470");

        assert_eq!(config.find(Path::new("/srv/one")).cloned(), untouched);
        assert_eq!(
            config
                .find(Path::new("/srv/two"))
                .and_then(|p| p.cloud_application_uuid.clone())
                .as_deref(),
            Some("a47ac10b-58cc-4372-a567-0e02b2c3d470")
        );
    }

    #[test]
    fn test_link_creates_missing_record() {
        let mut config = LocalUserConfig::default();
        let project = config.link(Path::new("/srv/new"), "uuid-1");
        assert_eq!(config.local_projects.len(), 1);
        assert!(project.is_linked());
    }

    #[test]
    fn test_relink_is_idempotent_on_disk() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("acquia-cli.json"));
        let dir = Path::new("/srv/site");

        let mut config = LocalUserConfig::load(&store, KEY).unwrap();
        config.link(dir, "a47ac10b-58cc-4372-a567-0e02b2c3d470");
        config.save(&store, KEY).unwrap();
        let first = std::fs::read_to_string(store.path()).unwrap();

        let mut config = LocalUserConfig::load(&store, KEY).unwrap();
        config.link(dir, "a47ac10b-58cc-4372-a567-0e02b2c3d470");
        config.save(&store, KEY).unwrap();
        let second = std::fs::read_to_string(store.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("acquia-cli.json"));
        store
            .set(
                KEY,
                json!({
                    "localProjects": [
                        {"name": "site", "directory": "/srv/site", "ide_uuid": "x"}
                    ]
                }),
            )
            .unwrap();

        let mut config = LocalUserConfig::load(&store, KEY).unwrap();
        config.link(Path::new("/srv/site"), "uuid-1");
        config.save(&store, KEY).unwrap();

        let raw = store.get(KEY).unwrap().unwrap();
        assert_eq!(raw["localProjects"][0]["ide_uuid"], json!("x"));
        assert_eq!(raw["localProjects"][0]["cloud_application_uuid"], json!("uuid-1"));
    }
}
