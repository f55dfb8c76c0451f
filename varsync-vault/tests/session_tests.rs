//! Tests for the master-key lifecycle: state machine transitions, reactive
//! re-derivation, stale-derivation discard, and the initialize/unlock flows
//! against the in-memory endpoint.

mod support;

use std::time::Duration;

use pretty_assertions::assert_eq;
use support::{init_tracing, test_params, InMemoryEndpoint};
use varsync_crypto::derive_master_key;
use varsync_crypto::MasterKey;
use varsync_vault::{MasterKeySession, Property, VaultError};

async fn wait_for_key(session: &MasterKeySession) -> MasterKey {
    let mut rx = session.subscribe();
    let key = tokio::time::timeout(Duration::from_secs(10), rx.wait_for(|k| k.is_some()))
        .await
        .expect("timed out waiting for master key")
        .expect("watch channel closed")
        .clone();
    key.unwrap()
}

// ── State machine ──

#[tokio::test]
async fn new_session_is_locked() {
    let session = MasterKeySession::with_params(test_params());
    assert!(!session.is_unlocked());
    assert!(session.master_key().is_none());
}

#[tokio::test]
async fn key_available_once_password_and_salt_are_present() {
    init_tracing();
    let session = MasterKeySession::with_params(test_params());
    session.set_vault_salt(Some("projectSalt123".into())).await;
    session.set_master_password(Some("correct horse".into())).await;

    let key = wait_for_key(&session).await;
    let expected = derive_master_key("correct horse", "projectSalt123", &test_params()).unwrap();
    assert_eq!(key, expected);
    assert!(session.is_unlocked());
}

#[tokio::test]
async fn clearing_the_password_locks_immediately() {
    let session = MasterKeySession::with_params(test_params());
    session.set_vault_salt(Some("projectSalt123".into())).await;
    session.set_master_password(Some("correct horse".into())).await;
    wait_for_key(&session).await;

    session.set_master_password(None).await;
    assert!(session.master_key().is_none());
    assert!(!session.is_unlocked());
}

#[tokio::test]
async fn empty_password_counts_as_cleared() {
    let session = MasterKeySession::with_params(test_params());
    session.set_vault_salt(Some("projectSalt123".into())).await;
    session.set_master_password(Some(String::new())).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(session.master_key().is_none());
}

#[tokio::test]
async fn losing_the_salt_locks_immediately() {
    let session = MasterKeySession::with_params(test_params());
    session.set_vault_salt(Some("projectSalt123".into())).await;
    session.set_master_password(Some("correct horse".into())).await;
    wait_for_key(&session).await;

    session.set_vault_salt(None).await;
    assert!(session.master_key().is_none());
}

#[tokio::test]
async fn clear_drops_password_salt_and_key() {
    let session = MasterKeySession::with_params(test_params());
    session.set_vault_salt(Some("projectSalt123".into())).await;
    session.set_master_password(Some("correct horse".into())).await;
    wait_for_key(&session).await;

    session.clear().await;
    assert!(!session.is_unlocked());

    // Restoring only the salt must not resurrect the key.
    session.set_vault_salt(Some("projectSalt123".into())).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(session.master_key().is_none());
}

// ── Reactive re-derivation ──

#[tokio::test]
async fn salt_change_produces_a_different_key() {
    let session = MasterKeySession::with_params(test_params());
    session.set_vault_salt(Some("saltOne".into())).await;
    session.set_master_password(Some("correct horse".into())).await;
    let first = wait_for_key(&session).await;

    session.set_vault_salt(Some("saltTwo".into())).await;
    let second = wait_for_key(&session).await;
    assert_ne!(first, second);
}

#[tokio::test]
async fn latest_password_wins_over_superseded_derivations() {
    let session = MasterKeySession::with_params(test_params());
    session.set_vault_salt(Some("projectSalt123".into())).await;
    session.set_master_password(Some("first password".into())).await;
    session.set_master_password(Some("second password".into())).await;

    let key = wait_for_key(&session).await;
    let expected = derive_master_key("second password", "projectSalt123", &test_params()).unwrap();
    assert_eq!(key, expected);
}

#[tokio::test]
async fn concurrent_readers_observe_the_same_key() {
    let session = MasterKeySession::with_params(test_params());
    let mut rx_a = session.subscribe();
    let mut rx_b = session.subscribe();

    session.set_vault_salt(Some("projectSalt123".into())).await;
    session.set_master_password(Some("correct horse".into())).await;

    let a = rx_a.wait_for(|k| k.is_some()).await.unwrap().clone().unwrap();
    let b = rx_b.wait_for(|k| k.is_some()).await.unwrap().clone().unwrap();
    assert_eq!(a, b);
}

// ── Value operations ──

#[tokio::test]
async fn encrypt_decrypt_roundtrip_through_the_session() {
    let session = MasterKeySession::with_params(test_params());
    session.set_vault_salt(Some("projectSalt123".into())).await;
    session.set_master_password(Some("correct horse".into())).await;
    wait_for_key(&session).await;

    let blob = session.encrypt_value("sk_live_12345").await.unwrap();
    assert_ne!(blob, "sk_live_12345");
    assert_eq!(session.decrypt_value(&blob).await.unwrap(), "sk_live_12345");
}

#[tokio::test]
async fn locked_session_rejects_value_operations() {
    let session = MasterKeySession::with_params(test_params());

    assert!(matches!(
        session.encrypt_value("value").await.unwrap_err(),
        VaultError::Locked
    ));
    assert!(matches!(
        session.decrypt_value("blob").await.unwrap_err(),
        VaultError::Locked
    ));
    assert!(matches!(
        session.toggle_property(&Property::plain("value")).await.unwrap_err(),
        VaultError::Locked
    ));
    assert!(matches!(
        session.reveal_property(&Property::plain("value")).await.unwrap_err(),
        VaultError::Locked
    ));
}

// ── Endpoint flows ──

#[tokio::test]
async fn initialize_stores_the_record_and_unlocks() {
    let endpoint = InMemoryEndpoint::default();
    let session = MasterKeySession::with_params(test_params());

    let response = session
        .initialize(&endpoint, "my-project", "user@example.com", "correct horse")
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(response.message, "Master password set successfully");

    let record = endpoint.record("my-project").expect("record must be stored");
    assert!(record.verify("correct horse", "user@example.com", &test_params()).unwrap());

    wait_for_key(&session).await;
    assert!(session.is_unlocked());
}

#[tokio::test]
async fn unlock_with_the_correct_password_succeeds() {
    let endpoint = InMemoryEndpoint::default();
    let setup = MasterKeySession::with_params(test_params());
    setup
        .initialize(&endpoint, "my-project", "user@example.com", "correct horse")
        .await
        .unwrap();
    wait_for_key(&setup).await;
    let blob = setup.encrypt_value("sk_live_12345").await.unwrap();

    // A fresh session on another device: salt from the stored record,
    // password from the prompt.
    let session = MasterKeySession::with_params(test_params());
    let record = endpoint.record("my-project").unwrap();
    session.adopt_record(&record).await;

    let response = session
        .unlock(&endpoint, "my-project", "user@example.com", "correct horse")
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(response.message, "Master password is correct");

    wait_for_key(&session).await;
    assert_eq!(session.decrypt_value(&blob).await.unwrap(), "sk_live_12345");
}

#[tokio::test]
async fn unlock_with_a_wrong_password_stays_locked() {
    let endpoint = InMemoryEndpoint::default();
    let setup = MasterKeySession::with_params(test_params());
    setup
        .initialize(&endpoint, "my-project", "user@example.com", "correct horse")
        .await
        .unwrap();

    let session = MasterKeySession::with_params(test_params());
    session.adopt_record(&endpoint.record("my-project").unwrap()).await;

    let response = session
        .unlock(&endpoint, "my-project", "user@example.com", "wrong horse")
        .await
        .unwrap();
    assert!(!response.success);
    assert_eq!(response.message, "Master password is incorrect");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!session.is_unlocked());
}

#[tokio::test]
async fn unlock_before_vault_initialization_reports_not_set() {
    let endpoint = InMemoryEndpoint::default();
    let session = MasterKeySession::with_params(test_params());

    let response = session
        .unlock(&endpoint, "my-project", "user@example.com", "correct horse")
        .await
        .unwrap();
    assert!(!response.success);
    assert_eq!(response.message, "Master password is not set");
    assert!(!session.is_unlocked());
}
