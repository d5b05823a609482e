//! @acp:module "Cloud API Types"
//! @acp:summary "Response records from the Cloud API"
//! @acp:domain cli
//! @acp:layer model
//!
//! Only the fields acli reads are modelled; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};

/// HAL collection envelope: `{"_embedded": {"items": [...]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Embedded<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Collection<T> {
    pub fn into_items(self) -> Vec<T> {
        self.embedded.items
    }
}

/// @acp:summary "A Cloud application"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub uuid: String,
    pub name: String,
}

/// @acp:summary "An environment of a Cloud application"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment id, e.g. `24-a47ac10b-58cc-4372-a567-0e02b2c3d470`
    pub id: String,

    /// Machine name (`dev`, `test`, `prod`)
    pub name: String,

    #[serde(default)]
    pub label: String,

    /// `sitegroup.env@host` login for SSH
    #[serde(default)]
    pub ssh_url: Option<String>,

    #[serde(default)]
    pub flags: EnvironmentFlags,

    #[serde(default)]
    pub vcs: Vcs,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        self.flags.production
    }

    /// Human-readable label, falling back to the machine name
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentFlags {
    #[serde(default)]
    pub production: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vcs {
    #[serde(default)]
    pub url: Option<String>,
}

/// @acp:summary "A kind of log available for an environment"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogType {
    #[serde(rename = "type")]
    pub log_type: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_collection_parses() {
        let json = r#"{
            "total": 1,
            "_embedded": {
                "items": [{
                    "id": "24-a47ac10b-58cc-4372-a567-0e02b2c3d470",
                    "name": "prod",
                    "label": "Production",
                    "ssh_url": "site.prod@site.ssh.prod.acquia-sites.com",
                    "flags": {"production": true, "livedev": false},
                    "vcs": {"type": "git", "url": "site@svn-1.prod.hosting.acquia.com:site.git"}
                }]
            }
        }"#;

        let envs: Collection<Environment> = serde_json::from_str(json).unwrap();
        let envs = envs.into_items();

        assert_eq!(envs.len(), 1);
        assert!(envs[0].is_production());
        assert_eq!(
            envs[0].vcs.url.as_deref(),
            Some("site@svn-1.prod.hosting.acquia.com:site.git")
        );
    }

    #[test]
    fn test_environment_missing_optional_fields() {
        let env: Environment =
            serde_json::from_str(r#"{"id": "1-x", "name": "ide"}"#).unwrap();
        assert!(!env.is_production());
        assert_eq!(env.vcs.url, None);
        assert_eq!(env.display_label(), "ide");
    }

    #[test]
    fn test_log_type_renames_type() {
        let log: LogType =
            serde_json::from_str(r#"{"type": "apache-access", "label": "Apache access"}"#).unwrap();
        assert_eq!(log.log_type, "apache-access");
    }
}
