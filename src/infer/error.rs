use std::time::Duration;
use thiserror::Error;

use crate::service;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("No response from API within {0:?}")]
    Timeout(Duration),

    #[error("Error response from API ({status}): {body}")]
    ErrorResponse { status: u16, body: Box<str> },
}

impl From<ApiError> for service::Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::ErrorResponse { status, body } => service::Error::Upstream { status, body },
            other => service::Error::Internal(other.into()),
        }
    }
}
