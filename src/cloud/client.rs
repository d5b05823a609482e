//! @acp:module "Cloud API Client"
//! @acp:summary "Blocking HTTP client for the Cloud API v2"
//! @acp:domain cli
//! @acp:layer io
//!
//! Authenticates with the OAuth2 client-credentials grant. The token is
//! requested on the first API call and reused for the life of the client.

use std::cell::RefCell;
use std::io::Read;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::types::{Application, Collection, Environment, LogType};
use super::{CloudApi, Credentials};
use crate::config::ApiEndpoints;
use crate::error::{AcliError, Result};

const ACCEPT: &str = "application/json, version=2";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// @acp:summary "ureq-backed Cloud API client"
pub struct CloudClient {
    agent: ureq::Agent,
    credentials: Credentials,
    endpoints: ApiEndpoints,
    token: RefCell<Option<String>>,
}

impl CloudClient {
    /// Build a client. Performs no network I/O.
    pub fn new(credentials: Credentials, endpoints: ApiEndpoints) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(&format!("acli/{}", crate::VERSION))
            .build();

        Self {
            agent,
            credentials,
            endpoints,
            token: RefCell::new(None),
        }
    }

    fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.borrow().as_ref() {
            return Ok(token.clone());
        }

        tracing::debug!("Requesting Cloud API access token");
        let response = self
            .agent
            .post(&self.endpoints.token_uri())
            .send_form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.key.as_str()),
                ("client_secret", self.credentials.secret.as_str()),
            ])
            .map_err(api_error)?;
        let token: TokenResponse = response
            .into_json()
            .map_err(|e| AcliError::Api(format!("invalid token response: {}", e)))?;

        *self.token.borrow_mut() = Some(token.access_token.clone());
        Ok(token.access_token)
    }

    fn get(&self, path: &str) -> Result<ureq::Response> {
        let url = format!("{}{}", self.endpoints.base_uri, path);
        let token = self.access_token()?;

        tracing::debug!("GET {}", url);
        self.agent
            .get(&url)
            .set("Accept", ACCEPT)
            .set("Authorization", &format!("Bearer {}", token))
            .call()
            .map_err(api_error)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path)?
            .into_json()
            .map_err(|e| AcliError::Api(format!("invalid response from {}: {}", path, e)))
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.get(path)?.into_reader().read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl CloudApi for CloudClient {
    fn applications(&self) -> Result<Vec<Application>> {
        Ok(self
            .get_json::<Collection<Application>>("/applications")?
            .into_items())
    }

    fn application(&self, uuid: &str) -> Result<Application> {
        self.get_json(&format!("/applications/{}", uuid))
    }

    fn environments(&self, application_uuid: &str) -> Result<Vec<Environment>> {
        Ok(self
            .get_json::<Collection<Environment>>(&format!(
                "/applications/{}/environments",
                application_uuid
            ))?
            .into_items())
    }

    fn environment(&self, environment_id: &str) -> Result<Environment> {
        self.get_json(&format!("/environments/{}", environment_id))
    }

    fn logs(&self, environment_id: &str) -> Result<Vec<LogType>> {
        Ok(self
            .get_json::<Collection<LogType>>(&format!("/environments/{}/logs", environment_id))?
            .into_items())
    }

    fn download_log(&self, environment_id: &str, log_type: &str) -> Result<Vec<u8>> {
        self.get_bytes(&format!("/environments/{}/logs/{}", environment_id, log_type))
    }

    fn drush_aliases(&self) -> Result<Vec<u8>> {
        self.get_bytes("/account/drush-aliases/download")
    }
}

fn api_error(err: ureq::Error) -> AcliError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            AcliError::Api(format!("HTTP {}: {}", code, body.trim()))
        }
        ureq::Error::Transport(transport) => AcliError::Api(transport.to_string()),
    }
}
