use core_types::User;
use serde::{Deserialize, Serialize};

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.

/// The envelope every backend response is wrapped in.
///
/// `data` is present on success for endpoints that return a payload; failure
/// responses carry `success: false` and a human-readable `message`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// The payload of a successful `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// The body sent to `POST /auth/refresh`. The refresh call itself is
/// unauthenticated; this token is the whole credential.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_failure_tolerates_missing_data_and_message() {
        let env: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!env.success);
        assert!(env.message.is_empty());
        assert!(env.data.is_none());
    }

    #[test]
    fn login_response_deserializes() {
        let json = r#"{
            "accessToken": "acc",
            "refreshToken": "ref",
            "user": {
                "id": "7b7f6a2e-5b0e-4f6a-9f2a-0c9d1c2b3a4d",
                "email": "t@example.com",
                "displayName": "T",
                "role": "VIEWER",
                "createdAt": "2025-01-01T00:00:00Z"
            }
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token, "acc");
        assert_eq!(resp.user.email, "t@example.com");
    }
}
