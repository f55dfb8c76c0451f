//! Master-key lifecycle management.
//!
//! One [`MasterKeySession`] per active project context is the single source
//! of truth for the derived master key. The key exists only in memory: it is
//! re-derived whenever the master password or the project's vault salt
//! changes, read as unavailable while a derivation is in flight, and dropped
//! on clear. Concurrent readers all observe the same published value through
//! a watch channel.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tokio::task;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use varsync_crypto::{
    derive_master_key, verification_hash, KdfParams, MasterKey, MasterPasswordRecord,
};

use crate::api::{ActionResponse, MasterPasswordEndpoint};
use crate::error::{VaultError, VaultResult};
use crate::property::{self, Property};

struct SessionState {
    master_password: Option<Zeroizing<String>>,
    vault_salt: Option<String>,
    /// Bumped on every input change. A derivation that finishes after its
    /// generation has been superseded is discarded, so a stale
    /// password/salt pairing can never surface as the current key.
    generation: u64,
}

/// In-memory master-key holder for one project context.
///
/// Inject one instance per session; components read the key through
/// [`master_key`](Self::master_key) or observe changes through
/// [`subscribe`](Self::subscribe) — they never derive independently.
pub struct MasterKeySession {
    params: KdfParams,
    state: Arc<RwLock<SessionState>>,
    key_tx: Arc<watch::Sender<Option<MasterKey>>>,
}

impl MasterKeySession {
    pub fn new() -> Self {
        Self::with_params(KdfParams::default())
    }

    pub fn with_params(params: KdfParams) -> Self {
        let (key_tx, _) = watch::channel(None);
        Self {
            params,
            state: Arc::new(RwLock::new(SessionState {
                master_password: None,
                vault_salt: None,
                generation: 0,
            })),
            key_tx: Arc::new(key_tx),
        }
    }

    /// Sets (or clears, with `None` or an empty string) the session master
    /// password and kicks off re-derivation.
    pub async fn set_master_password(&self, password: Option<String>) {
        let mut state = self.state.write().await;
        state.master_password = password.filter(|p| !p.is_empty()).map(Zeroizing::new);
        self.respawn_derivation(&mut state);
    }

    /// Sets (or clears) the vault salt for the current project.
    pub async fn set_vault_salt(&self, salt: Option<String>) {
        let mut state = self.state.write().await;
        state.vault_salt = salt.filter(|s| !s.is_empty());
        self.respawn_derivation(&mut state);
    }

    /// Adopts the vault salt from a project's stored record.
    pub async fn adopt_record(&self, record: &MasterPasswordRecord) {
        self.set_vault_salt(Some(record.vault_salt().to_string())).await;
    }

    /// Drops the password, salt, and key (logout / navigation away).
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.master_password = None;
        state.vault_salt = None;
        self.respawn_derivation(&mut state);
        debug!("session cleared");
    }

    /// The current master key, if one has been derived and is not stale.
    pub fn master_key(&self) -> Option<MasterKey> {
        self.key_tx.borrow().clone()
    }

    pub fn is_unlocked(&self) -> bool {
        self.key_tx.borrow().is_some()
    }

    /// Subscribes to key availability changes. All subscribers observe the
    /// same sequence of values.
    pub fn subscribe(&self) -> watch::Receiver<Option<MasterKey>> {
        self.key_tx.subscribe()
    }

    /// Invalidates the published key and, if both inputs are present,
    /// spawns a fresh derivation on the blocking pool.
    fn respawn_derivation(&self, state: &mut SessionState) {
        state.generation += 1;
        let generation = state.generation;

        // Readers must not see a key from the previous pairing while the
        // new derivation is in flight.
        self.key_tx.send_replace(None);

        let (Some(password), Some(salt)) = (state.master_password.clone(), state.vault_salt.clone())
        else {
            return;
        };

        let params = self.params;
        let state_arc = Arc::clone(&self.state);
        let key_tx = Arc::clone(&self.key_tx);

        tokio::spawn(async move {
            let derived =
                task::spawn_blocking(move || derive_master_key(password.as_str(), &salt, &params))
                    .await;

            let key = match derived {
                Ok(Ok(key)) => key,
                Ok(Err(e)) => {
                    warn!("master key derivation failed: {e}");
                    return;
                }
                Err(e) => {
                    warn!("master key derivation task failed: {e}");
                    return;
                }
            };

            let state = state_arc.read().await;
            if state.generation != generation {
                debug!("discarding stale master key derivation (generation {generation})");
                return;
            }
            key_tx.send_replace(Some(key));
            debug!("master key derived (generation {generation})");
        });
    }

    // ── Endpoint flows ──

    /// First-time vault setup: composes the master-password record, submits
    /// it, and on success adopts the password and the new vault salt.
    pub async fn initialize<E: MasterPasswordEndpoint>(
        &self,
        endpoint: &E,
        project: &str,
        email: &str,
        password: &str,
    ) -> VaultResult<ActionResponse> {
        let record = self
            .run_blocking({
                let (password, email, params) = (password.to_owned(), email.to_owned(), self.params);
                move || MasterPasswordRecord::create(&password, &email, &params)
            })
            .await?;

        let response = endpoint.set_master_password(project, &record).await?;
        if response.success {
            let mut state = self.state.write().await;
            state.master_password = Some(Zeroizing::new(password.to_owned()));
            state.vault_salt = Some(record.vault_salt().to_owned());
            self.respawn_derivation(&mut state);
        }
        Ok(response)
    }

    /// Verifies the master password against the server and, only on
    /// success, adopts it into the session. A rejection is returned as the
    /// endpoint's response so the UI can re-prompt; it is never retried
    /// here with the same inputs.
    pub async fn unlock<E: MasterPasswordEndpoint>(
        &self,
        endpoint: &E,
        project: &str,
        email: &str,
        password: &str,
    ) -> VaultResult<ActionResponse> {
        let hash = self
            .run_blocking({
                let (password, email, params) = (password.to_owned(), email.to_owned(), self.params);
                move || verification_hash(&password, &email, &params)
            })
            .await?;

        let response = endpoint.verify_master_password(project, &hash).await?;
        if response.success {
            self.set_master_password(Some(password.to_owned())).await;
        } else {
            debug!("master password verification rejected: {}", response.message);
        }
        Ok(response)
    }

    // ── Value operations ──

    /// Encrypts a plaintext value under the session master key.
    pub async fn encrypt_value(&self, plaintext: &str) -> VaultResult<String> {
        let key = self.master_key().ok_or(VaultError::Locked)?;
        let params = self.params;
        let plaintext = plaintext.to_owned();
        self.run_blocking(move || varsync_crypto::encrypt_value(&plaintext, key.as_str(), &params))
            .await
    }

    /// Decrypts a ciphertext blob under the session master key.
    pub async fn decrypt_value(&self, blob: &str) -> VaultResult<String> {
        let key = self.master_key().ok_or(VaultError::Locked)?;
        let params = self.params;
        let blob = blob.to_owned();
        self.run_blocking(move || varsync_crypto::decrypt_value(&blob, key.as_str(), &params))
            .await
    }

    /// Toggles a property between plain and encrypted.
    pub async fn toggle_property(&self, prop: &Property) -> VaultResult<Property> {
        let key = self.master_key().ok_or(VaultError::Locked)?;
        let params = self.params;
        let prop = prop.clone();
        self.run_blocking(move || property::toggle_encryption(&prop, &key, &params))
            .await
    }

    /// Decrypts an encrypted property for display without mutating it.
    pub async fn reveal_property(&self, prop: &Property) -> VaultResult<String> {
        let key = self.master_key().ok_or(VaultError::Locked)?;
        let params = self.params;
        let prop = prop.clone();
        self.run_blocking(move || property::reveal(&prop, &key, &params))
            .await
    }

    /// Runs a CPU-bound crypto closure on the blocking pool.
    async fn run_blocking<T, E, F>(&self, f: F) -> VaultResult<T>
    where
        T: Send + 'static,
        E: Into<VaultError> + Send + 'static,
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        let result = task::spawn_blocking(f)
            .await
            .map_err(|e| VaultError::Task(e.to_string()))?;
        result.map_err(Into::into)
    }
}

impl Default for MasterKeySession {
    fn default() -> Self {
        Self::new()
    }
}
