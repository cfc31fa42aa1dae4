use crate::error::SessionError;
use api_client::{AuthApi, Credentials, RegisterRequest};
use core_types::User;
use events::SessionEvent;
use std::sync::{Arc, RwLock};
use tokio::task::JoinHandle;

/// Where the session currently stands.
///
/// `Uninitialized` exists only between construction and the first
/// `initialize()` call; after that the session is always in one of the other
/// three states, and only `login` can re-enter `Authenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Authenticated,
    Anonymous,
}

/// A point-in-time view of the session, cheap to clone and hand out.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub user: Option<User>,
}

impl SessionSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated)
    }
}

/// Holds the current authenticated user and manages session lifecycle.
///
/// Explicitly constructed around the auth surface it drives; nothing here is
/// process-global, and consumers never see raw tokens. Everything observable
/// is the snapshot plus the four operations `initialize` / `login` /
/// `logout` / `register`.
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    current: RwLock<SessionSnapshot>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self {
            api,
            current: RwLock::new(SessionSnapshot {
                state: SessionState::Uninitialized,
                user: None,
            }),
        }
    }

    /// Resolves the persisted credentials into a session at startup.
    ///
    /// With no stored access token the session is anonymous outright and the
    /// profile endpoint is never called. With one, the profile fetch decides:
    /// success authenticates, failure clears the stale credentials and falls
    /// back to anonymous. Startup never fails the caller.
    pub async fn initialize(&self) -> SessionSnapshot {
        if !self.api.has_credentials() {
            self.transition(SessionState::Anonymous, None);
            return self.snapshot();
        }

        self.transition(SessionState::Loading, None);
        match self.api.profile().await {
            Ok(user) => {
                tracing::info!(email = %user.email, "session restored");
                self.transition(SessionState::Authenticated, Some(user));
            }
            Err(err) => {
                tracing::warn!(%err, "stored credentials are unusable; starting anonymous");
                if let Err(err) = self.api.clear_credentials() {
                    tracing::warn!(%err, "failed to clear credentials");
                }
                self.transition(SessionState::Anonymous, None);
            }
        }
        self.snapshot()
    }

    /// Exchanges credentials for a session. On failure the previous state is
    /// left untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, SessionError> {
        let user = self.api.login(credentials).await?;
        self.transition(SessionState::Authenticated, Some(user.clone()));
        Ok(user)
    }

    /// Ends the session. The backend is notified best-effort; local teardown
    /// happens regardless of what the network does.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            tracing::warn!(%err, "backend logout failed; clearing local session anyway");
        }
        if let Err(err) = self.api.clear_credentials() {
            tracing::warn!(%err, "failed to clear credentials");
        }
        self.transition(SessionState::Anonymous, None);
    }

    /// Creates an account. Deliberately leaves session state alone; the new
    /// user logs in explicitly afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, SessionError> {
        Ok(self.api.register(request).await?)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.current
            .read()
            .map(|snapshot| snapshot.clone())
            .unwrap_or(SessionSnapshot {
                state: SessionState::Anonymous,
                user: None,
            })
    }

    pub fn current_user(&self) -> Option<User> {
        self.snapshot().user
    }

    /// Applies a transport-layer expiry: an authenticated session becomes
    /// anonymous. Other states already reflect the absence of credentials.
    pub fn note_expired(&self) {
        let mut current = match self.current.write() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        if current.state == SessionState::Authenticated {
            tracing::info!("session expired; dropping to anonymous");
            current.state = SessionState::Anonymous;
            current.user = None;
        }
    }

    /// Spawns the background task that flips the session to anonymous when
    /// the transport layer broadcasts an expiry.
    pub fn watch_expiry(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        let mut receiver = manager.api.subscribe();
        tokio::spawn(async move {
            while let Ok(event) = receiver.recv().await {
                match event {
                    SessionEvent::Expired(expiry) => {
                        tracing::debug!(reason = %expiry.reason, "expiry event received");
                        manager.note_expired();
                    }
                }
            }
        })
    }

    fn transition(&self, state: SessionState, user: Option<User>) {
        if let Ok(mut current) = self.current.write() {
            current.state = state;
            current.user = user;
        }
    }
}
