use std::{collections::HashMap, sync::Arc};

use metrics::counter;
use tera::{Context, Tera, Value};
use thiserror::Error;

use super::links::LinkResolver;
use crate::domain::{
    catalog::{ALL_PAGES, Page},
    site::SiteMetadata,
};

/// Context key under which [`SiteMetadata`] is exposed to every template.
pub const META_KEY: &str = "meta";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render template `{template}`")]
    Template {
        template: &'static str,
        #[source]
        source: tera::Error,
    },
    #[error("failed to parse template `{template}`")]
    Parse {
        template: &'static str,
        #[source]
        source: tera::Error,
    },
    #[error("missing templates: {}", .0.join(", "))]
    MissingTemplates(Vec<&'static str>),
}

/// Renders catalog pages with site metadata injected.
///
/// A renderer is bound to one [`LinkResolver`] for its whole lifetime; the
/// live service and the exporter each build their own from the same
/// templates.
pub struct PageRenderer {
    tera: Tera,
    site: Arc<SiteMetadata>,
    mode: &'static str,
}

impl PageRenderer {
    pub fn new(mut tera: Tera, site: Arc<SiteMetadata>, links: Arc<dyn LinkResolver>) -> Self {
        let mode = links.mode();
        tera.register_function("url_for", UrlFor { links });
        Self { tera, site, mode }
    }

    pub fn site(&self) -> &SiteMetadata {
        &self.site
    }

    pub fn mode(&self) -> &'static str {
        self.mode
    }

    /// Verify that every catalog template, including the not-found page, is
    /// loaded. The live service calls this before accepting connections.
    pub fn ensure_catalog(&self) -> Result<(), RenderError> {
        let loaded: Vec<&str> = self.tera.get_template_names().collect();
        let missing: Vec<&'static str> = ALL_PAGES
            .iter()
            .map(|page| page.template())
            .filter(|template| !loaded.contains(template))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RenderError::MissingTemplates(missing))
        }
    }

    pub fn render(&self, page: Page) -> Result<String, RenderError> {
        self.render_with(&self.tera, page)
    }

    /// Parse `source` as the template for `page` on top of the loaded
    /// layouts, then render it. The loaded set itself is left untouched.
    pub fn render_source(&self, page: Page, source: &str) -> Result<String, RenderError> {
        let mut tera = self.tera.clone();
        if let Err(source) = tera.add_raw_template(page.template(), source) {
            counter!("linksly_page_render_failures_total", "mode" => self.mode).increment(1);
            return Err(RenderError::Parse {
                template: page.template(),
                source,
            });
        }
        self.render_with(&tera, page)
    }

    fn render_with(&self, tera: &Tera, page: Page) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert(META_KEY, self.site.as_ref());

        match tera.render(page.template(), &context) {
            Ok(html) => {
                counter!("linksly_pages_rendered_total", "mode" => self.mode).increment(1);
                Ok(html)
            }
            Err(source) => {
                counter!("linksly_page_render_failures_total", "mode" => self.mode).increment(1);
                Err(RenderError::Template {
                    template: page.template(),
                    source,
                })
            }
        }
    }
}

/// `url_for(endpoint="static", filename="css/style.css")` or
/// `url_for(endpoint="privacy")`.
struct UrlFor {
    links: Arc<dyn LinkResolver>,
}

impl tera::Function for UrlFor {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let endpoint = args
            .get("endpoint")
            .and_then(Value::as_str)
            .ok_or_else(|| tera::Error::msg("url_for requires a string `endpoint` argument"))?;

        let url = if endpoint == "static" {
            let filename = args.get("filename").and_then(Value::as_str).ok_or_else(|| {
                tera::Error::msg("url_for(endpoint=\"static\") requires a string `filename`")
            })?;
            self.links.asset(filename)
        } else {
            let page = Page::from_endpoint(endpoint)
                .ok_or_else(|| tera::Error::msg(format!("unknown endpoint `{endpoint}`")))?;
            self.links.page(page).ok_or_else(|| {
                tera::Error::msg(format!(
                    "endpoint `{endpoint}` is not linkable when rendering {}",
                    self.links.mode()
                ))
            })?
        };

        Ok(Value::String(url))
    }

    fn is_safe(&self) -> bool {
        true
    }
}
