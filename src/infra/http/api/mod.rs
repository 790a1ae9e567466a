//! JSON API for the landing page's launch-list form.

pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{Router, routing::post};

use crate::application::subscribe::SubscriptionService;

use super::RouterState;

#[derive(Clone)]
pub struct ApiState {
    pub subscriptions: Arc<SubscriptionService>,
}

pub(super) fn build_api_router() -> Router<RouterState> {
    Router::new().route("/api/subscribe", post(handlers::subscribe))
}
