#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{Router, body::Body, http::Response};
use http_body_util::BodyExt;
use linksly::{
    application::{
        render::{LinkResolver, PageRenderer},
        subscribe::SubscriptionService,
    },
    domain::{catalog::ALL_PAGES, site::SiteMetadata},
    infra::{
        assets::StaticAssets,
        http::{self, ApiState, HttpState, RouterState},
        subscribers::FileSubscriberLog,
        templates::{load_shared_templates, load_templates},
    },
};

pub fn repo_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")
}

pub fn repo_static() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
}

pub fn renderer(templates: &Path, links: Arc<dyn LinkResolver>) -> PageRenderer {
    let tera = load_templates(templates).expect("templates load");
    PageRenderer::new(tera, Arc::new(SiteMetadata::default()), links)
}

/// Renderer holding only the shared layouts, as the export builds it.
pub fn layout_renderer(templates: &Path, links: Arc<dyn LinkResolver>) -> PageRenderer {
    let pages: Vec<&str> = ALL_PAGES.iter().map(|page| page.template()).collect();
    let tera = load_shared_templates(templates, &pages).expect("layouts load");
    PageRenderer::new(tera, Arc::new(SiteMetadata::default()), links)
}

/// Live router over the repository templates and assets, logging signups to
/// `subscribers_log`.
pub fn live_router(subscribers_log: &Path) -> Router {
    let renderer = renderer(&repo_templates(), Arc::new(linksly::application::render::RouteLinks));
    renderer.ensure_catalog().expect("catalog complete");

    http::build_router(RouterState {
        http: HttpState {
            renderer: Arc::new(renderer),
            assets: Arc::new(StaticAssets::new(repo_static())),
        },
        api: ApiState {
            subscriptions: Arc::new(SubscriptionService::new(Arc::new(
                FileSubscriberLog::new(subscribers_log),
            ))),
        },
    })
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Copy a flat template directory so a test can break one file.
pub fn copy_templates(into: &Path) {
    fs::create_dir_all(into).expect("mkdir templates");
    for entry in fs::read_dir(repo_templates()).expect("read templates") {
        let entry = entry.expect("dir entry");
        fs::copy(entry.path(), into.join(entry.file_name())).expect("copy template");
    }
}
