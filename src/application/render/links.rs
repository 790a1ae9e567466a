use crate::domain::catalog::Page;

/// Strategy for turning `url_for` calls in templates into concrete URLs.
pub trait LinkResolver: Send + Sync {
    /// Short label for the rendering mode, used in logs and metrics.
    fn mode(&self) -> &'static str;

    /// URL of a file under the asset directory.
    fn asset(&self, filename: &str) -> String;

    /// URL of another catalog page, or `None` if the page is not linkable in
    /// this mode.
    fn page(&self, page: Page) -> Option<String>;
}

/// Links for the live service: absolute routes and the `/static` mount.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteLinks;

impl LinkResolver for RouteLinks {
    fn mode(&self) -> &'static str {
        "live"
    }

    fn asset(&self, filename: &str) -> String {
        format!("/static/{}", filename.trim_start_matches('/'))
    }

    fn page(&self, page: Page) -> Option<String> {
        page.route().map(str::to_string)
    }
}

/// Links for exported files: everything relative to the output root, since
/// there is no route table on a static host.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLinks;

impl LinkResolver for StaticLinks {
    fn mode(&self) -> &'static str {
        "static"
    }

    fn asset(&self, filename: &str) -> String {
        format!("./static/{}", filename.trim_start_matches('/'))
    }

    fn page(&self, page: Page) -> Option<String> {
        page.output_file().map(|file| format!("./{file}"))
    }
}
