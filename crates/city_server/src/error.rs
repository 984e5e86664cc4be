//! HTTP error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::protocol::{Envelope, INVALID_BODY};

/// A failed request: status code plus the message the client sees.
///
/// The message is all the client gets. Internal causes are logged where
/// the error is created.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    reason: Option<&'static str>,
}

impl ApiError {
    /// 500 with a client-safe message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            reason: None,
        }
    }

    /// 422 for a request body that parsed but does not fit the game state.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
            reason: None,
        }
    }

    /// Attach a machine-readable cause tag.
    #[must_use]
    pub const fn with_reason(mut self, reason: &'static str) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Status code of this error.
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        Self {
            status: rejection.status(),
            message: INVALID_BODY.to_string(),
            reason: Some("invalid_body"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(status = %self.status, message = %self.message, "request failed");
        let envelope = match self.reason {
            Some(reason) => Envelope::failure(self.message, reason),
            None => Envelope::error(self.message),
        };
        (self.status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_is_kept() {
        let err = ApiError::unprocessable("Invalid state update").with_reason("invalid_state");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.reason, Some("invalid_state"));
    }
}
