use events::ExpiryReason;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP transport failure: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The backend rejected the request: {0}")]
    Rejected(String),

    #[error("Unexpected HTTP status {0} from the backend")]
    Status(reqwest::StatusCode),

    #[error("The request was not authorized")]
    Unauthorized,

    #[error("Session expired: {0}")]
    SessionExpired(ExpiryReason),

    #[error("Failed to decode the API response: {0}")]
    Decode(String),

    #[error("Token storage failure: {0}")]
    TokenStore(String),
}
