//! The fixed page catalog shared by live rendering and static export.
//!
//! Every page the site knows about is a [`Page`] variant. A page maps a
//! logical endpoint name (the value templates pass to `url_for`) to its
//! template, its live route, and the file it becomes in a static export.

use std::fmt;

/// Content pages in export order.
pub const CONTENT_PAGES: [Page; 4] = [Page::Home, Page::Privacy, Page::Terms, Page::Support];

/// Every page with a template, including the live-only not-found page.
pub const ALL_PAGES: [Page; 5] = [
    Page::Home,
    Page::Privacy,
    Page::Terms,
    Page::Support,
    Page::NotFound,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Privacy,
    Terms,
    Support,
    NotFound,
}

impl Page {
    /// Logical name used by templates when linking to this page.
    pub fn endpoint(self) -> &'static str {
        match self {
            Page::Home => "index",
            Page::Privacy => "privacy",
            Page::Terms => "terms",
            Page::Support => "support",
            Page::NotFound => "not_found",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::Privacy => "privacy.html",
            Page::Terms => "terms.html",
            Page::Support => "support.html",
            Page::NotFound => "404.html",
        }
    }

    /// Route served by the live service. The not-found page has none; it is
    /// only reachable through the fallback handler.
    pub fn route(self) -> Option<&'static str> {
        match self {
            Page::Home => Some("/"),
            Page::Privacy => Some("/privacy"),
            Page::Terms => Some("/terms"),
            Page::Support => Some("/support"),
            Page::NotFound => None,
        }
    }

    /// File name written by the static exporter, relative to the output root.
    pub fn output_file(self) -> Option<&'static str> {
        match self {
            Page::NotFound => None,
            page => Some(page.template()),
        }
    }

    pub fn from_endpoint(endpoint: &str) -> Option<Self> {
        ALL_PAGES
            .into_iter()
            .find(|page| page.endpoint() == endpoint)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}
