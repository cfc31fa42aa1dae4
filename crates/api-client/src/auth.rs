use crate::client::ApiClient;
use crate::error::ApiError;
use crate::responses::LoginResponse;
use async_trait::async_trait;
use core_types::{TokenPair, User};
use events::SessionEvent;
use serde::Serialize;
use tokio::sync::broadcast;

/// The credentials exchanged for a token pair at login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The body sent to the registration endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// The authentication surface the session manager is built against.
///
/// This trait is the contract between the transport layer and session state,
/// allowing the underlying implementation (live or mock) to be swapped out.
/// It deliberately exposes no raw token access; credential presence and
/// teardown are the only storage facts a consumer may observe.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a token pair, persists the pair, and
    /// returns the authenticated user's profile.
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError>;

    /// Creates a new account. Does not log the new user in and persists
    /// nothing.
    async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError>;

    /// Notifies the backend that the session is ending. Callers decide
    /// whether a failure here matters; token teardown is separate.
    async fn logout(&self) -> Result<(), ApiError>;

    /// Fetches the current user's profile using the stored access token.
    async fn profile(&self) -> Result<User, ApiError>;

    /// Whether an access token is currently persisted.
    fn has_credentials(&self) -> bool;

    /// Drops any persisted tokens.
    fn clear_credentials(&self) -> Result<(), ApiError>;

    /// Observes session lifecycle events (expiry broadcasts).
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let response: LoginResponse = self.post_json("/auth/login", credentials).await?;
        self.tokens().store(TokenPair {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        })?;
        tracing::info!(email = %credentials.email, "logged in");
        Ok(response.user)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.post_json("/auth/register", request).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.post_unit("/auth/logout").await
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.get_json("/auth/profile").await
    }

    fn has_credentials(&self) -> bool {
        self.tokens().access_token().is_some()
    }

    fn clear_credentials(&self) -> Result<(), ApiError> {
        self.tokens().clear()
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.subscribe_events()
    }
}
