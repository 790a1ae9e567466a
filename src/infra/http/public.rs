use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
};

use crate::{
    application::render::PageRenderer,
    domain::catalog::CONTENT_PAGES,
    infra::assets::StaticAssets,
    presentation::views::{render_not_found_response, render_page_response},
};

use super::RouterState;

#[derive(Clone)]
pub struct HttpState {
    pub renderer: Arc<PageRenderer>,
    pub assets: Arc<StaticAssets>,
}

pub(super) fn build_router() -> Router<RouterState> {
    let mut router = Router::new();

    for page in CONTENT_PAGES {
        let Some(route) = page.route() else {
            continue;
        };
        router = router.route(
            route,
            get(move |State(state): State<HttpState>| async move {
                render_page_response(&state.renderer, page, StatusCode::OK)
            }),
        );
    }

    router
        .route("/static/{*path}", get(serve_static))
        .route("/_health", get(health))
        .fallback(not_found)
}

async fn serve_static(State(state): State<HttpState>, Path(path): Path<String>) -> Response {
    state.assets.serve(&path).await
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found(State(state): State<HttpState>) -> Response {
    render_not_found_response(&state.renderer)
}
