//! Infrastructure adapters and runtime bootstrap.

pub mod assets;
pub mod error;
pub mod http;
pub mod subscribers;
pub mod telemetry;
pub mod templates;
