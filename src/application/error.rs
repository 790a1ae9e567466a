use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::{export::ExportError, render::RenderError},
    infra::error::InfraError,
};

/// Diagnostic carried in response extensions so the response logger can say
/// why a request failed without leaking it into the body.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    /// Outermost message first.
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn detail(source: &'static str, status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            source,
            status,
            messages: vec![detail.into()],
        }
    }

    pub fn chain(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        Self {
            source,
            status,
            messages: error_chain(error),
        }
    }

    pub fn attach_to(self, mut response: Response) -> Response {
        response.extensions_mut().insert(self);
        response
    }
}

/// Collect an error and all of its sources, outermost first.
pub fn error_chain(error: &dyn StdError) -> Vec<String> {
    let mut messages = vec![error.to_string()];
    let mut source = error.source();
    while let Some(inner) = source {
        messages.push(inner.to_string());
        source = inner.source();
    }
    messages
}

/// Failure of an HTML route. The body is a fixed plain-text message; the
/// cause travels in the attached [`ErrorReport`].
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: &'static str,
    report: ErrorReport,
}

impl From<RenderError> for HttpError {
    fn from(error: RenderError) -> Self {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self {
            status,
            message: "Template rendering failed",
            report: ErrorReport::chain("application::render", status, &error),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        self.report
            .attach_to((self.status, self.message).into_response())
    }
}

/// Top-level error for the binary's commands.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
