//! Shared descriptive metadata injected into every rendered page.

use serde::Serialize;

/// Immutable site-wide metadata. Built once from configuration and shared by
/// `Arc` across every render call, live or static.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    /// Social preview image path.
    pub og_image: String,
    pub twitter_card: String,
    pub app_store_url: String,
    /// Canonical domain, also written to the `CNAME` marker on export.
    pub domain: String,
}

impl SiteMetadata {
    pub fn canonical_url(&self) -> String {
        format!("https://{}/", self.domain.trim_end_matches('/'))
    }
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "Linksly - Save Links, Share Smarter".to_string(),
            description: "Save links for later and share them with the right people at the perfect time. Smart link management for iOS with beautiful previews and group messaging.".to_string(),
            keywords: [
                "link sharing",
                "save for later",
                "iOS app",
                "link management",
                "group messaging",
                "smart sharing",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            og_image: "/static/images/og-image.png".to_string(),
            twitter_card: "summary_large_image".to_string(),
            app_store_url: "https://apps.apple.com/app/linksly".to_string(),
            domain: "linksly.app".to_string(),
        }
    }
}
