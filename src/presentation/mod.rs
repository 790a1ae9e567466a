//! HTML response helpers for rendered pages.

pub mod views;
