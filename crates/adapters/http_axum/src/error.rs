//! HTTP error and outcome response mapping.

use std::str::FromStr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smarthome_domain::error::{SmartHomeError, ValidationError};
use smarthome_domain::outcome::{DenialKind, Outcome};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SmartHomeError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(SmartHomeError);

impl From<SmartHomeError> for ApiError {
    fn from(err: SmartHomeError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SmartHomeError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            SmartHomeError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            SmartHomeError::Consistency(err) => {
                tracing::warn!(error = %err, "consistency violation");
                (StatusCode::CONFLICT, err.to_string())
            }
            SmartHomeError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Parse an identifier taken from the request path or body.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    T::from_str(raw)
        .map_err(|_| ValidationError::InvalidIdentifier(format!("{what} {raw}")).into())
}

/// JSON envelope of a rules engine decision.
#[derive(Serialize)]
struct OutcomeBody<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

/// Renders an [`Outcome`] as `{success, message, data}`.
///
/// Applied and partial outcomes answer `200`. Denials answer `409` for
/// policy refusals, `403` for missing permission and `422` for references
/// to records that do not exist.
pub struct OutcomeResponse<T>(pub Outcome<T>);

impl<T: Serialize> IntoResponse for OutcomeResponse<T> {
    fn into_response(self) -> Response {
        let status = match self.0.denial().map(|denial| denial.kind()) {
            None => StatusCode::OK,
            Some(DenialKind::Policy) => StatusCode::CONFLICT,
            Some(DenialKind::Authorization) => StatusCode::FORBIDDEN,
            Some(DenialKind::Validation) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = OutcomeBody {
            success: self.0.success(),
            message: self.0.message(),
            data: self.0.into_value(),
        };
        (status, Json(body)).into_response()
    }
}
