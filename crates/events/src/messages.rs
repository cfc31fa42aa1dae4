use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a session stopped being recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryReason {
    /// A refresh was needed but no refresh token was persisted.
    MissingRefreshToken,
    /// The backend rejected the refresh token.
    RefreshRejected,
    /// The refresh call failed at the transport level.
    RefreshTransport,
}

impl fmt::Display for ExpiryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpiryReason::MissingRefreshToken => "no refresh token available",
            ExpiryReason::RefreshRejected => "refresh token rejected by the backend",
            ExpiryReason::RefreshTransport => "refresh request failed to reach the backend",
        };
        write!(f, "{s}")
    }
}

/// Details of a session expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExpiry {
    pub at: DateTime<Utc>,
    pub reason: ExpiryReason,
}

/// The top-level session lifecycle event enum.
///
/// The transport layer broadcasts these instead of performing navigation or
/// other presentation side effects itself; whoever is driving the UI decides
/// what an expired session means (the CLI prints a re-login notice, the
/// session manager flips to anonymous).
///
/// The `#[serde(tag = "type", content = "payload")]` attribute serializes the
/// enum into a clean tagged JSON object for structured log output, e.g.:
/// `{"type": "Expired", "payload": {"at": "...", "reason": "RefreshRejected"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SessionEvent {
    /// The session could not be silently recovered and the stored credentials
    /// have been cleared. Re-authentication is required.
    Expired(SessionExpiry),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_event_serializes_tagged() {
        let event = SessionEvent::Expired(SessionExpiry {
            at: "2025-03-01T12:00:00Z".parse().unwrap(),
            reason: ExpiryReason::RefreshRejected,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Expired");
        assert_eq!(json["payload"]["reason"], "RefreshRejected");
    }
}
