use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::ErrorReport;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: &'static str,
}

/// JSON error for `/api/*`: the public message goes into `{"error": ...}`,
/// the detail only into the attached [`ErrorReport`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            message,
            detail: detail.into(),
        }
    }

    pub fn bad_request(message: &'static str, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, detail)
    }

    pub fn internal(message: &'static str, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.message,
        };
        ErrorReport::detail("infra::http::api", self.status, self.detail)
            .attach_to((self.status, Json(body)).into_response())
    }
}
