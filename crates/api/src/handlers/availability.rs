//! # Availability Handlers
//!
//! A psychologist publishes their recurring weekly schedule as one list of
//! slots. Each write replaces the whole schedule atomically; reads are
//! public.

use axum::{extract::State, http::StatusCode, Json};
use konsul_core::models::{AvailabilityResponse, SetAvailabilityRequest, SetAvailabilityResponse};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extractors::{JsonBody, PathParam, QueryParams},
    middleware::{auth::Psychologist, error_handling::AppError},
    ApiState,
};

/// Optional filter for the read endpoint, e.g. `?day=Senin`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub day: Option<String>,
}

/// Replaces the caller's weekly schedule.
///
/// # Errors
///
/// * 400 when the list is empty, a slot is malformed or two slots overlap;
///   nothing is written in that case
/// * 401 / 403 when the caller is not an authenticated psychologist
/// * 500 when storage fails; the previous schedule is kept
#[axum::debug_handler]
pub async fn set_availability(
    State(state): State<Arc<ApiState>>,
    Psychologist(caller): Psychologist,
    JsonBody(payload): JsonBody<SetAvailabilityRequest>,
) -> Result<Json<SetAvailabilityResponse>, AppError> {
    let slots_count = state
        .availability
        .set_availability(caller.id, &payload.slots)
        .await?;

    Ok(Json(SetAvailabilityResponse {
        owner_id: caller.id,
        slots_count,
    }))
}

/// Removes every slot of the caller.
#[axum::debug_handler]
pub async fn clear_availability(
    State(state): State<Arc<ApiState>>,
    Psychologist(caller): Psychologist,
) -> Result<StatusCode, AppError> {
    state.availability.clear_availability(caller.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    PathParam(owner_id): PathParam<Uuid>,
    QueryParams(query): QueryParams<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let slots = match query.day.as_deref() {
        Some(day) => {
            state
                .availability
                .get_availability_by_day(owner_id, day)
                .await?
        }
        None => state.availability.get_availability(owner_id).await?,
    };

    Ok(Json(AvailabilityResponse {
        owner_id,
        slots: slots.into_iter().map(Into::into).collect(),
    }))
}
