//! Static asset serving from the on-disk asset directory.
//!
//! The live service reads the same directory the exporter copies, so both
//! modes ship identical assets.

use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use mime_guess::Mime;
use tracing::error;

use crate::application::error::ErrorReport;

const SOURCE: &str = "infra::assets::serve";

#[derive(Debug, Clone)]
pub struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn serve(&self, path: &str) -> Response {
        let Some(relative) = sanitize(path) else {
            return not_found_response();
        };

        let absolute = self.root.join(&relative);
        match tokio::fs::read(&absolute).await {
            Ok(contents) => {
                let mime = mime_guess::from_path(&relative).first_or_octet_stream();
                build_response(Bytes::from(contents), mime)
            }
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                not_found_response()
            }
            Err(err) => {
                error!(
                    target = SOURCE,
                    path = %absolute.display(),
                    error = %err,
                    "failed to read static asset"
                );
                ErrorReport::chain(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                    .attach_to(StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }
}

/// Reduce a request path to a plain relative path. Rejects traversal,
/// absolute components and directory requests.
fn sanitize(path: &str) -> Option<PathBuf> {
    let candidate = path.trim_start_matches('/');
    if candidate.is_empty() || candidate.ends_with('/') {
        return None;
    }

    let mut relative = PathBuf::new();
    for component in Path::new(candidate).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (!relative.as_os_str().is_empty()).then_some(relative)
}

fn not_found_response() -> Response {
    ErrorReport::detail(SOURCE, StatusCode::NOT_FOUND, "Static asset not found")
        .attach_to(StatusCode::NOT_FOUND.into_response())
}

fn build_response(bytes: Bytes, mime: Mime) -> Response {
    let len = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        headers.insert(header::CONTENT_LENGTH, value);
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );

    response
}
