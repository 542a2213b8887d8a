//! Maps `ProxyError` to the JSON error bodies the dashboard widgets expect.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mydash_core::ProxyError;
use serde::Serialize;

/// Per-endpoint wording for each failure class.
#[derive(Debug, Clone, Copy)]
pub struct ErrorMessages {
    /// `None` for endpoints that take no client input
    pub invalid_input: Option<&'static str>,
    pub configuration: &'static str,
    pub timeout: &'static str,
    pub failure: &'static str,
}

pub const WEATHER_MESSAGES: ErrorMessages = ErrorMessages {
    invalid_input: Some("Invalid or missing location parameters"),
    configuration: "Weather service configuration error",
    timeout: "Weather request timed out",
    failure: "Failed to fetch weather data",
};

pub const NEWS_MESSAGES: ErrorMessages = ErrorMessages {
    invalid_input: None,
    configuration: "News service configuration error",
    timeout: "News request timed out",
    failure: "Failed to fetch news data",
};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Status code and body for `err`.
///
/// `details` is only ever filled for upstream, network and shape failures,
/// and only when `expose_details` is set.
pub fn error_body(
    err: &ProxyError,
    messages: &ErrorMessages,
    expose_details: bool,
) -> (StatusCode, ErrorBody) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = match err {
        ProxyError::InvalidInput(_) => ErrorBody {
            error: messages.invalid_input.unwrap_or(messages.failure),
            details: None,
        },
        ProxyError::Configuration(_) => ErrorBody {
            error: messages.configuration,
            details: None,
        },
        ProxyError::Timeout => ErrorBody {
            error: messages.timeout,
            details: None,
        },
        ProxyError::Upstream { .. } | ProxyError::Network(_) | ProxyError::InvalidShape(_) => {
            ErrorBody {
                error: messages.failure,
                details: expose_details.then(|| err.to_string()),
            }
        }
    };

    (status, body)
}

pub fn error_response(err: &ProxyError, messages: &ErrorMessages, expose_details: bool) -> Response {
    let (status, body) = error_body(err, messages, expose_details);
    (status, Json(body)).into_response()
}
