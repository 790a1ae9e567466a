//! Ahead-of-time export of the catalog into a static hosting tree.
//!
//! A run always starts from an empty output directory, so nothing from a
//! previous export survives. Each page template is read and parsed on its
//! own, on top of the shared layouts the renderer already holds. Individual
//! page failures are recorded and the run continues; failures of the
//! surrounding steps (directory setup, asset copy, marker files) abort it.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::{
    application::{error::error_chain, render::PageRenderer},
    domain::catalog::{CONTENT_PAGES, Page},
};

/// Name of the asset subtree inside the output directory.
pub const ASSET_DIR_NAME: &str = "static";
/// Custom-domain marker read by GitHub Pages.
pub const CNAME_FILE: &str = "CNAME";
/// Empty marker that disables Jekyll processing on GitHub Pages.
pub const NOJEKYLL_FILE: &str = ".nojekyll";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to prepare output directory {}", path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy assets from {} to {}", from.display(), to.display())]
    CopyAssets {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write marker file {}", path.display())]
    Marker {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of exporting a single page.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub page: Page,
    pub path: PathBuf,
    /// Failure reason, `None` when the page was written.
    pub error: Option<String>,
}

impl PageOutcome {
    pub fn is_written(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub output_dir: PathBuf,
    pub pages: Vec<PageOutcome>,
    pub assets_copied: bool,
}

impl ExportReport {
    pub fn failures(&self) -> impl Iterator<Item = &PageOutcome> {
        self.pages.iter().filter(|outcome| !outcome.is_written())
    }

    pub fn written(&self) -> impl Iterator<Item = &PageOutcome> {
        self.pages.iter().filter(|outcome| outcome.is_written())
    }
}

pub struct StaticExporter {
    renderer: PageRenderer,
    templates_dir: PathBuf,
    static_dir: PathBuf,
    output_dir: PathBuf,
}

impl StaticExporter {
    /// `renderer` holds the shared layouts only; page templates are read
    /// from `templates_dir` one at a time.
    pub fn new(
        renderer: PageRenderer,
        templates_dir: PathBuf,
        static_dir: PathBuf,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            renderer,
            templates_dir,
            static_dir,
            output_dir,
        }
    }

    /// Rebuild the output tree from scratch. Deletes any previous export
    /// without asking.
    pub fn run(&self) -> Result<ExportReport, ExportError> {
        info!(
            target = "linksly::export",
            output = %self.output_dir.display(),
            "Building static site"
        );

        self.prepare_output_dir()?;

        let pages = CONTENT_PAGES
            .into_iter()
            .map(|page| self.export_page(page))
            .collect();

        let assets_copied = self.copy_assets()?;
        self.write_markers()?;

        let report = ExportReport {
            output_dir: self.output_dir.clone(),
            pages,
            assets_copied,
        };

        let failed = report.failures().count();
        if failed == 0 {
            info!(
                target = "linksly::export",
                pages = report.pages.len(),
                output = %self.output_dir.display(),
                "Static site built"
            );
        } else {
            warn!(
                target = "linksly::export",
                written = report.pages.len() - failed,
                failed,
                output = %self.output_dir.display(),
                "Static site built with page failures"
            );
        }

        Ok(report)
    }

    fn prepare_output_dir(&self) -> Result<(), ExportError> {
        let prepare = || -> io::Result<()> {
            if self.output_dir.exists() {
                fs::remove_dir_all(&self.output_dir)?;
            }
            fs::create_dir_all(&self.output_dir)
        };

        prepare().map_err(|source| ExportError::Prepare {
            path: self.output_dir.clone(),
            source,
        })
    }

    fn export_page(&self, page: Page) -> PageOutcome {
        let file = page.output_file().unwrap_or(page.template());
        let path = self.output_dir.join(file);

        let source = self.templates_dir.join(page.template());
        let result = fs::read_to_string(&source)
            .map_err(|err| format!("failed to read {}: {err}", source.display()))
            .and_then(|template| {
                self.renderer
                    .render_source(page, &template)
                    .map_err(|err| error_chain(&err).join(": "))
            })
            .and_then(|html| {
                fs::write(&path, html).map_err(|err| format!("failed to write: {err}"))
            });

        match result {
            Ok(()) => {
                info!(target = "linksly::export", page = %page, file, "✓ page written");
                PageOutcome {
                    page,
                    path,
                    error: None,
                }
            }
            Err(reason) => {
                warn!(
                    target = "linksly::export",
                    page = %page,
                    template = page.template(),
                    error = %reason,
                    "✗ page failed"
                );
                PageOutcome {
                    page,
                    path,
                    error: Some(reason),
                }
            }
        }
    }

    fn copy_assets(&self) -> Result<bool, ExportError> {
        if !self.static_dir.is_dir() {
            info!(
                target = "linksly::export",
                source = %self.static_dir.display(),
                "asset directory not found, skipping copy"
            );
            return Ok(false);
        }

        let destination = self.output_dir.join(ASSET_DIR_NAME);
        copy_dir(&self.static_dir, &destination).map_err(|source| ExportError::CopyAssets {
            from: self.static_dir.clone(),
            to: destination.clone(),
            source,
        })?;

        info!(
            target = "linksly::export",
            destination = %destination.display(),
            "✓ assets copied"
        );
        Ok(true)
    }

    fn write_markers(&self) -> Result<(), ExportError> {
        let domain = self.renderer.site().domain.as_str();
        write_marker(&self.output_dir.join(CNAME_FILE), domain)?;
        info!(target = "linksly::export", domain, "✓ {CNAME_FILE} written");

        write_marker(&self.output_dir.join(NOJEKYLL_FILE), "")?;
        info!(target = "linksly::export", "✓ {NOJEKYLL_FILE} written");
        Ok(())
    }
}

fn write_marker(path: &Path, contents: &str) -> Result<(), ExportError> {
    fs::write(path, contents).map_err(|source| ExportError::Marker {
        path: path.to_path_buf(),
        source,
    })
}

fn copy_dir(source: &Path, destination: &Path) -> io::Result<()> {
    fs::create_dir_all(destination)?;

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let target_path = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target_path)?;
        }
    }

    Ok(())
}
