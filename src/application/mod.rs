//! Application services: page rendering, signups, and static export.

pub mod error;
pub mod export;
pub mod render;
pub mod subscribe;
