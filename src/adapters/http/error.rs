//! Error body and status mapping shared by every HTTP handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ControlError;
use crate::domain::foundation::ErrorCode;

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Transient notification attached to otherwise successful responses.
#[derive(Debug, Clone, Serialize)]
pub struct WarningResponse {
    pub code: String,
    pub message: String,
}

impl From<ControlError> for WarningResponse {
    fn from(err: ControlError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

pub fn status_for(err: &ControlError) -> StatusCode {
    match err {
        ControlError::NotFound(_) => StatusCode::NOT_FOUND,
        ControlError::Validation(_) => StatusCode::BAD_REQUEST,
        ControlError::ChannelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ControlError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
        ControlError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Converts an application error into its JSON response.
pub fn handle_control_error(err: ControlError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(code = %err.code(), "Request failed: {}", err);
    } else {
        tracing::debug!(code = %err.code(), "Request rejected: {}", err);
    }

    let mut body = ErrorResponse::new(err.code(), err.to_string());
    if let ControlError::Validation(validation) = &err {
        body = body.with_details(serde_json::json!({ "field": validation.field() }));
    }
    (status, Json(body)).into_response()
}

/// 400 for a path segment that is not a valid id.
pub fn invalid_id(kind: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(format!("Invalid {} ID", kind))),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Missing;
    use crate::domain::foundation::{ScreenId, ValidationError};

    #[test]
    fn statuses_follow_error_taxonomy() {
        let missing = ControlError::NotFound(Missing::Screen(ScreenId::new("s1").unwrap()));
        assert_eq!(status_for(&missing), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&ControlError::ChannelUnavailable("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&ControlError::UpstreamFailure("500".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&ControlError::Validation(ValidationError::empty_field("name"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ControlError::Storage("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_response_uses_error_code_strings() {
        let body = ErrorResponse::new(ErrorCode::ScreenNotFound, "gone");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "SCREEN_NOT_FOUND");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn warning_from_channel_error_keeps_code() {
        let warning = WarningResponse::from(ControlError::ChannelUnavailable("timeout".into()));
        assert_eq!(warning.code, "CHANNEL_UNAVAILABLE");
        assert!(warning.message.contains("timeout"));
    }
}
