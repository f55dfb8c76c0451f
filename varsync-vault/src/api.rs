//! Master-password endpoint contract and HTTP client.
//!
//! The server stores and compares verification hashes by string equality;
//! it never receives the raw password or the vault master key. Responses
//! always carry `{ success, message }` JSON — including 401/404/422, so the
//! client parses the body on any status and only maps transport or decoding
//! failures to errors.

use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use varsync_crypto::MasterPasswordRecord;

use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};

/// The `{ success, message }` envelope every endpoint replies with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// The master-password endpoints the vault core consumes.
///
/// `set_master_password` submits the full record (hash plus vault salt) at
/// vault initialization; `verify_master_password` submits just the
/// verification hash for comparison. A rejected password is a successful
/// call with `success: false`, not an error.
pub trait MasterPasswordEndpoint {
    fn set_master_password(
        &self,
        project: &str,
        record: &MasterPasswordRecord,
    ) -> impl Future<Output = VaultResult<ActionResponse>> + Send;

    fn verify_master_password(
        &self,
        project: &str,
        hash: &str,
    ) -> impl Future<Output = VaultResult<ActionResponse>> + Send;
}

/// HTTP client for the Varsync master-password endpoints.
pub struct VarsyncApiClient {
    client: Client,
    config: VaultConfig,
}

impl VarsyncApiClient {
    pub fn new(config: VaultConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self { client, config }
    }

    async fn post_master_password(
        &self,
        project: &str,
        hash: &str,
        verify: bool,
    ) -> VaultResult<ActionResponse> {
        let mut url = format!("{}/{project}/master-password", self.config.api_base_url);
        if verify {
            url.push_str("?verify=true");
        }
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "masterPasswordHash": hash }))
            .send()
            .await?;

        let status = response.status();
        response
            .json::<ActionResponse>()
            .await
            .map_err(|e| VaultError::Api(format!("unexpected response (status {status}): {e}")))
    }
}

impl MasterPasswordEndpoint for VarsyncApiClient {
    async fn set_master_password(
        &self,
        project: &str,
        record: &MasterPasswordRecord,
    ) -> VaultResult<ActionResponse> {
        self.post_master_password(project, record.as_str(), false).await
    }

    async fn verify_master_password(
        &self,
        project: &str,
        hash: &str,
    ) -> VaultResult<ActionResponse> {
        self.post_master_password(project, hash, true).await
    }
}
