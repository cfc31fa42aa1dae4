use crate::error::ApiError;
use crate::responses::{ApiEnvelope, RefreshRequest};
use crate::token_store::TokenStore;
use bytes::Bytes;
use chrono::Utc;
use configuration::settings::ApiSettings;
use core_types::TokenPair;
use events::{ExpiryReason, SessionEvent, SessionExpiry};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Capacity of the session-event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// The one HTTP client every endpoint wrapper shares.
///
/// All authenticated traffic funnels through [`ApiClient::request`], which
/// attaches the bearer token from the store and transparently performs the
/// single refresh-and-retry cycle when the backend answers 401. Transport
/// code never navigates or prints; when a session becomes unrecoverable it
/// broadcasts [`SessionEvent::Expired`] and lets subscribers decide.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    pub fn new(api: &ApiSettings, tokens: Arc<dyn TokenStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .expect("Failed to build reqwest client");

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            http,
            base_url: api.base_url.clone(),
            tokens,
            events,
        }
    }

    pub(crate) fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub(crate) fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // --- Request pipeline ---

    /// Sends one request, recovering from a single expired-access-token
    /// failure. Independent in-flight requests each run their own cycle; a
    /// burst of simultaneous 401s may issue redundant refresh calls, which
    /// the backend accepts until the refresh token rotates.
    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let mut retried = false;
        loop {
            let response = self.dispatch(method.clone(), path, body).await?;
            if response.status() == StatusCode::UNAUTHORIZED && !retried {
                // Mark the request retried before the refresh attempt, so a
                // retry that fails again can never start a second cycle.
                retried = true;
                self.refresh_session().await?;
                continue;
            }
            return Ok(response);
        }
    }

    /// Builds and sends the raw request. The bearer header is attached only
    /// when a token is stored; an anonymous client simply sends without it.
    async fn dispatch<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = self.tokens.access_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Exchanges the persisted refresh token for a new pair.
    ///
    /// Failure of any kind tears the session down: credentials are cleared,
    /// an expiry event is broadcast, and the *refresh* error propagates to
    /// the original caller in place of the 401 that triggered it.
    async fn refresh_session(&self) -> Result<(), ApiError> {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            // Nothing to exchange; fail without a network call.
            self.expire(ExpiryReason::MissingRefreshToken);
            return Err(ApiError::SessionExpired(ExpiryReason::MissingRefreshToken));
        };

        tracing::debug!("access token rejected; attempting silent refresh");
        match self.exchange_refresh_token(refresh_token).await {
            Ok(pair) => {
                self.tokens.store(pair)?;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "token refresh failed");
                let reason = match &err {
                    ApiError::Http(_) => ExpiryReason::RefreshTransport,
                    _ => ExpiryReason::RefreshRejected,
                };
                self.expire(reason);
                match err {
                    ApiError::Http(transport) => Err(ApiError::Http(transport)),
                    _ => Err(ApiError::SessionExpired(reason)),
                }
            }
        }
    }

    /// The refresh exchange is sent without a bearer header; the refresh
    /// token in the body is the whole credential.
    async fn exchange_refresh_token(&self, refresh_token: String) -> Result<TokenPair, ApiError> {
        let response = self
            .http
            .post(format!("{}/auth/refresh", self.base_url))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        Self::decode(response).await
    }

    fn expire(&self, reason: ExpiryReason) {
        if let Err(err) = self.tokens.clear() {
            tracing::warn!(%err, "failed to clear stored credentials");
        }
        tracing::warn!(%reason, "session expired");
        let _ = self.events.send(SessionEvent::Expired(SessionExpiry {
            at: Utc::now(),
            reason,
        }));
    }

    // --- Typed helpers used by the endpoint wrappers ---

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path, None::<&()>).await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::POST, path, Some(body)).await?;
        Self::decode(response).await
    }

    /// POST with no request body, for action endpoints like issue/reprice.
    pub(crate) async fn post_empty_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::POST, path, None::<&()>).await?;
        Self::decode(response).await
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::PUT, path, Some(body)).await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_unit(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::POST, path, None::<&()>).await?;
        Self::decode_unit(response).await
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path, None::<&()>).await?;
        Self::decode_unit(response).await
    }

    /// Fetches a raw byte payload (report files). Same auth and retry path
    /// as everything else, but the body is a blob rather than an envelope.
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Bytes, ApiError> {
        let response = self.request(Method::GET, path, None::<&()>).await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(response.bytes().await?)
    }

    // --- Envelope decoding ---

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let envelope = Self::decode_envelope::<T>(response).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::Decode("successful response carried no data".to_string()))
    }

    async fn decode_unit(response: Response) -> Result<(), ApiError> {
        Self::decode_envelope::<serde_json::Value>(response)
            .await
            .map(|_| ())
    }

    async fn decode_envelope<T: DeserializeOwned>(
        response: Response,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        let text = response.text().await?;
        if !status.is_success() {
            // Error statuses produced by the backend itself still carry the
            // envelope; surface its message when present.
            if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&text) {
                if !envelope.message.is_empty() {
                    return Err(ApiError::Rejected(envelope.message));
                }
            }
            return Err(ApiError::Status(status));
        }
        let envelope = serde_json::from_str::<ApiEnvelope<T>>(&text)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message));
        }
        Ok(envelope)
    }
}
