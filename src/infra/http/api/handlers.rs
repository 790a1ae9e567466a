use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    application::subscribe::SubscribeError,
    domain::error::DomainError,
    infra::http::api::{
        ApiState,
        error::ApiError,
        models::{SubscribeRequest, SubscribeResponse},
    },
};

const SUBSCRIBED_MESSAGE: &str = "Thanks for subscribing!";

pub async fn subscribe(
    State(state): State<ApiState>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<Json<SubscribeResponse>, ApiError> {
    let Json(request) = payload
        .map_err(|rejection| ApiError::bad_request("Invalid JSON body", rejection.body_text()))?;

    state
        .subscriptions
        .subscribe(request.email.as_deref())
        .await
        .map_err(subscribe_to_api)?;

    Ok(Json(SubscribeResponse {
        success: true,
        message: SUBSCRIBED_MESSAGE,
    }))
}

fn subscribe_to_api(err: SubscribeError) -> ApiError {
    match err {
        SubscribeError::Invalid(DomainError::Missing { field }) => {
            ApiError::bad_request("Email required", format!("`{field}` missing or blank"))
        }
        SubscribeError::Invalid(err @ DomainError::Validation { .. }) => {
            ApiError::bad_request("Invalid email", err.to_string())
        }
        SubscribeError::Storage(err) => {
            ApiError::internal("Failed to record subscription", err.to_string())
        }
    }
}
