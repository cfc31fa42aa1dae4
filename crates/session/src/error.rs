use api_client::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Authentication request failed: {0}")]
    Api(#[from] ApiError),
}
