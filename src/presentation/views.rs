use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    application::{
        error::{ErrorReport, HttpError},
        render::PageRenderer,
    },
    domain::catalog::Page,
};

pub fn render_page(renderer: &PageRenderer, page: Page) -> Result<Html<String>, HttpError> {
    renderer.render(page).map(Html).map_err(HttpError::from)
}

pub fn render_page_response(renderer: &PageRenderer, page: Page, status: StatusCode) -> Response {
    match render_page(renderer, page) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(renderer: &PageRenderer) -> Response {
    let response = render_page_response(renderer, Page::NotFound, StatusCode::NOT_FOUND);
    if response.status() != StatusCode::NOT_FOUND {
        return response;
    }
    ErrorReport::detail(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "no route matched",
    )
    .attach_to(response)
}
