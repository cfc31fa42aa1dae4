//! Auth pipeline integration tests.
//!
//! Each test boots the loopback mock backend from `common`, points a real
//! [`ApiClient`] at it, and asserts on the observable contract: which bearer
//! header went out, how many refresh calls were made, what the caller got
//! back, and what happened to the persisted tokens.

mod common;

use api_client::{ApiClient, ApiError, AuthApi, Credentials, MemoryTokenStore, TokenStore};
use common::{BackendState, RefreshBehavior, spawn};
use configuration::ApiSettings;
use core_types::{Portfolio, TokenPair};
use events::{ExpiryReason, SessionEvent};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use uuid::Uuid;

fn pair(access: &str, refresh: &str) -> TokenPair {
    TokenPair {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }
}

fn client_at(base_url: &str, tokens: Arc<MemoryTokenStore>) -> ApiClient {
    ApiClient::new(
        &ApiSettings {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        },
        tokens,
    )
}

#[tokio::test]
async fn valid_token_is_sent_as_bearer_header() {
    let state = BackendState::new(Some("acc-1"), RefreshBehavior::Reject);
    let base_url = spawn(state.clone()).await;
    let tokens = Arc::new(MemoryTokenStore::with_pair(pair("acc-1", "ref-1")));
    let client = client_at(&base_url, tokens);

    let portfolios: Vec<Portfolio> = client.portfolios().list().await.unwrap();

    assert!(portfolios.is_empty());
    assert_eq!(state.refresh_calls(), 0);
    let headers = state.seen_auth_headers.lock().unwrap();
    assert_eq!(*headers, vec![Some("Bearer acc-1".to_string())]);
}

#[tokio::test]
async fn missing_tokens_send_unauthenticated_and_fail_without_refresh_call() {
    let state = BackendState::new(Some("acc-1"), RefreshBehavior::Reject);
    let base_url = spawn(state.clone()).await;
    let client = client_at(&base_url, Arc::new(MemoryTokenStore::new()));
    let mut expiry = client.subscribe();

    let err = client.portfolios().list().await.unwrap_err();

    // The 401 could not even start a refresh: no token to exchange, and the
    // refresh endpoint was never contacted.
    assert!(matches!(
        err,
        ApiError::SessionExpired(ExpiryReason::MissingRefreshToken)
    ));
    assert_eq!(state.refresh_calls(), 0);
    let headers = state.seen_auth_headers.lock().unwrap();
    assert_eq!(*headers, vec![None]);
    assert!(matches!(
        expiry.try_recv(),
        Ok(SessionEvent::Expired(expiry)) if expiry.reason == ExpiryReason::MissingRefreshToken
    ));
}

#[tokio::test]
async fn expired_token_triggers_exactly_one_refresh_and_one_retry() {
    let state = BackendState::new(
        Some("acc-2"),
        RefreshBehavior::Issue {
            access: "acc-2".to_string(),
            refresh: "ref-2".to_string(),
        },
    );
    let base_url = spawn(state.clone()).await;
    let tokens = Arc::new(MemoryTokenStore::with_pair(pair("stale", "ref-1")));
    let client = client_at(&base_url, tokens.clone());

    client.portfolios().list().await.unwrap();

    assert_eq!(state.refresh_calls(), 1);
    assert_eq!(state.portfolio_calls(), 2);
    // The retry went out with the freshly issued token, and the rotated pair
    // was persisted.
    let headers = state.seen_auth_headers.lock().unwrap();
    assert_eq!(
        *headers,
        vec![
            Some("Bearer stale".to_string()),
            Some("Bearer acc-2".to_string())
        ]
    );
    assert_eq!(tokens.access_token().as_deref(), Some("acc-2"));
    assert_eq!(tokens.refresh_token().as_deref(), Some("ref-2"));
}

#[tokio::test]
async fn failed_retry_does_not_start_a_second_refresh_cycle() {
    let state = BackendState::new(
        None,
        RefreshBehavior::Issue {
            access: "acc-2".to_string(),
            refresh: "ref-2".to_string(),
        },
    );
    state.reject_all.store(true, Ordering::SeqCst);
    let base_url = spawn(state.clone()).await;
    let tokens = Arc::new(MemoryTokenStore::with_pair(pair("stale", "ref-1")));
    let client = client_at(&base_url, tokens);

    let err = client.portfolios().list().await.unwrap_err();

    // One refresh, one retry, then the second 401 surfaces as-is.
    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(state.refresh_calls(), 1);
    assert_eq!(state.portfolio_calls(), 2);
}

#[tokio::test]
async fn rejected_refresh_tears_the_session_down() {
    let state = BackendState::new(None, RefreshBehavior::Reject);
    let base_url = spawn(state.clone()).await;
    let tokens = Arc::new(MemoryTokenStore::with_pair(pair("stale", "ref-1")));
    let client = client_at(&base_url, tokens.clone());
    let mut expiry = client.subscribe();

    let err = client.portfolios().list().await.unwrap_err();

    // The caller sees the refresh failure, not the original 401.
    assert!(matches!(
        err,
        ApiError::SessionExpired(ExpiryReason::RefreshRejected)
    ));
    assert_eq!(state.refresh_calls(), 1);
    assert_eq!(state.portfolio_calls(), 1);
    assert_eq!(tokens.access_token(), None);
    assert_eq!(tokens.refresh_token(), None);
    assert!(matches!(
        expiry.try_recv(),
        Ok(SessionEvent::Expired(expiry)) if expiry.reason == ExpiryReason::RefreshRejected
    ));
}

#[tokio::test]
async fn login_persists_the_issued_pair_and_returns_the_profile() {
    let state = BackendState::new(None, RefreshBehavior::Reject);
    let base_url = spawn(state.clone()).await;
    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_at(&base_url, tokens.clone());

    let user = client
        .login(&Credentials {
            email: "trader@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.email, "trader@example.com");
    assert_eq!(tokens.access_token().as_deref(), Some("acc-login"));
    assert_eq!(tokens.refresh_token().as_deref(), Some("ref-login"));

    // The persisted pair immediately authorizes subsequent requests.
    let profile = client.profile().await.unwrap();
    assert_eq!(profile.display_name, "Test Trader");
    assert_eq!(state.profile_calls(), 1);
}

#[tokio::test]
async fn envelope_rejection_surfaces_the_backend_message() {
    let state = BackendState::new(None, RefreshBehavior::Reject);
    let base_url = spawn(state).await;
    let client = client_at(&base_url, Arc::new(MemoryTokenStore::new()));

    let err = client
        .login(&Credentials {
            email: "trader@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        ApiError::Rejected(message) => assert_eq!(message, "invalid credentials"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn report_download_returns_the_raw_bytes() {
    let state = BackendState::new(Some("acc-1"), RefreshBehavior::Reject);
    let base_url = spawn(state).await;
    let tokens = Arc::new(MemoryTokenStore::with_pair(pair("acc-1", "ref-1")));
    let client = client_at(&base_url, tokens);

    let bytes = client.reports().download(Uuid::new_v4()).await.unwrap();

    assert_eq!(&bytes[..], &b"%PDF-1.7 report body"[..]);
}
