//! Page rendering shared by the live service and the static exporter.
//!
//! Both callers go through one [`PageRenderer`]. What differs between them is
//! only how template links are resolved, which is delegated to a
//! [`LinkResolver`]: [`RouteLinks`] for the running server and [`StaticLinks`]
//! for files that are opened straight from a static host.

mod links;
mod renderer;

pub use links::{LinkResolver, RouteLinks, StaticLinks};
pub use renderer::{META_KEY, PageRenderer, RenderError};
