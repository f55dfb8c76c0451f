//! Shared test helpers: fast KDF params, tracing setup, and an in-memory
//! master-password endpoint mirroring the server's verification behavior.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use varsync_crypto::{KdfParams, MasterPasswordRecord};
use varsync_vault::{ActionResponse, MasterPasswordEndpoint, VaultResult};

/// Low-iteration params so suites stay fast; production stays at 600k.
pub fn test_params() -> KdfParams {
    KdfParams { iterations: 1_000 }
}

/// Opt-in tracing output for debugging (`RUST_LOG=debug cargo test`).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// In-memory stand-in for the master-password endpoints: stores records
/// per project and compares verification hashes by string equality, with
/// the server's response messages.
#[derive(Default)]
pub struct InMemoryEndpoint {
    records: Mutex<HashMap<String, MasterPasswordRecord>>,
}

impl InMemoryEndpoint {
    pub fn record(&self, project: &str) -> Option<MasterPasswordRecord> {
        self.records.lock().unwrap().get(project).cloned()
    }
}

impl MasterPasswordEndpoint for InMemoryEndpoint {
    async fn set_master_password(
        &self,
        project: &str,
        record: &MasterPasswordRecord,
    ) -> VaultResult<ActionResponse> {
        self.records
            .lock()
            .unwrap()
            .insert(project.to_string(), record.clone());
        Ok(ActionResponse {
            success: true,
            message: "Master password set successfully".into(),
        })
    }

    async fn verify_master_password(
        &self,
        project: &str,
        hash: &str,
    ) -> VaultResult<ActionResponse> {
        let response = match self.records.lock().unwrap().get(project) {
            None => ActionResponse {
                success: false,
                message: "Master password is not set".into(),
            },
            Some(record) if hash == record.verification_hash() => ActionResponse {
                success: true,
                message: "Master password is correct".into(),
            },
            Some(_) => ActionResponse {
                success: false,
                message: "Master password is incorrect".into(),
            },
        };
        Ok(response)
    }
}
