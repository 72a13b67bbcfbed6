#[allow(unused_imports)]
use serde::{Deserialize, Serialize};

/// Prefix of the plain-text body sent when the upstream API rejects a request.
pub const UPSTREAM_ERROR_PREFIX: &str = "API请求失败: ";

pub const EMPTY_MESSAGE_ERROR: &str = "消息不能为空";

pub const INTERNAL_ERROR: &str = "服务器内部错误";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Box<str>),
    #[error("Upstream rejected the request with status {status}: {body}")]
    Upstream { status: u16, body: Box<str> },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(any(feature = "server-http2", feature = "client-http2"))]
#[cfg_attr(feature = "server-http2", derive(Serialize))]
#[cfg_attr(feature = "client-http2", derive(Deserialize))]
#[derive(Debug)]
pub struct HttpErrorBody {
    pub error: Box<str>,
}

#[cfg(feature = "server-http2")]
impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        match self {
            Error::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, axum::Json(HttpErrorBody { error })).into_response()
            }
            Error::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, format!("{UPSTREAM_ERROR_PREFIX}{body}")).into_response()
            }
            Error::Internal(error) => {
                tracing::error!("Internal error: {:?}", error);
                let body = HttpErrorBody {
                    error: INTERNAL_ERROR.into(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}
