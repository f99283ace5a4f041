//! Error types for the account API client.
//!
//! # Design
//! Only pipeline failures are errors. A 404 or 409 from the server is a
//! successfully executed request and comes back as an `HttpResponse`, so
//! callers branch on the status code instead of on `ApiError`.
//!
//! `Cancelled` and `DeadlineExceeded` are derived from the caller's
//! `CancelSignal`, never from the transport's own error, so they stay stable
//! regardless of how the transport surfaced the abort.

use thiserror::Error;

use crate::http::HttpResponse;
use crate::signal::CancelReason;

/// Errors returned by the request pipeline.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base URL or a relative path could not be turned into an absolute URL.
    #[error("malformed URL `{input}`: {reason}")]
    MalformedUrl { input: String, reason: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(#[source] serde_json::Error),

    /// The network call failed and the cancel signal had not fired.
    #[error("transport error: {0}")]
    TransportError(#[source] reqwest::Error),

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// The operation's deadline passed before it completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The response body was present but did not decode into the expected type.
    /// The response is kept so its status code and headers stay usable.
    #[error("decoding failed (HTTP {}): {source}", .response.status)]
    DecodingError {
        response: HttpResponse,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// The response obtained before the failure, if any.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::DecodingError { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, ApiError::Cancelled | ApiError::DeadlineExceeded)
    }
}

impl From<CancelReason> for ApiError {
    fn from(reason: CancelReason) -> Self {
        match reason {
            CancelReason::Cancelled => ApiError::Cancelled,
            CancelReason::DeadlineExceeded => ApiError::DeadlineExceeded,
        }
    }
}
