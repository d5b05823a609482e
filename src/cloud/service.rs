//! @acp:module "Client Service"
//! @acp:summary "Lazily built, memoized Cloud API client"
//! @acp:domain cli
//! @acp:layer service

use std::cell::OnceCell;

use super::client::CloudClient;
use super::{CloudApi, Credentials};
use crate::config::{ApiEndpoints, JsonFileStore};
use crate::error::Result;

/// @acp:summary "Hands out one Cloud API client per process"
///
/// Credentials are read from disk the first time a client is requested.
/// Later changes to the credential file are not observed.
pub struct ClientService {
    credentials_store: JsonFileStore,
    endpoints: ApiEndpoints,
    client: OnceCell<Box<dyn CloudApi>>,
}

impl ClientService {
    pub fn new(credentials_store: JsonFileStore, endpoints: ApiEndpoints) -> Self {
        Self {
            credentials_store,
            endpoints,
            client: OnceCell::new(),
        }
    }

    /// Use an already constructed client instead of building one
    pub fn with_client(self, client: Box<dyn CloudApi>) -> Self {
        // A fresh service has an empty cell, so this cannot fail.
        let _ = self.client.set(client);
        self
    }

    /// @acp:summary "Return the memoized client, building it on first use"
    pub fn get_client(&self) -> Result<&dyn CloudApi> {
        if let Some(client) = self.client.get() {
            return Ok(client.as_ref());
        }

        let credentials = Credentials::load(&self.credentials_store)?;
        tracing::debug!("Building Cloud API client");
        let client: Box<dyn CloudApi> =
            Box::new(CloudClient::new(credentials, self.endpoints.clone()));
        Ok(self.client.get_or_init(|| client).as_ref())
    }
}
