use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::NaiveDate;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::availability;
use crate::{entities::room, errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// Check whether a room is free for a stay window
#[utoipa::path(
    get,
    path = "/api/rooms/{id}/availability",
    summary = "Check room availability",
    params(
        ("id" = Uuid, Path, description = "Room id"),
        ("checkIn" = String, Query, description = "Check-in date (ISO)"),
        ("checkOut" = String, Query, description = "Check-out date (ISO)"),
    ),
    responses(
        (status = 200, description = "Availability computed", body = ApiResponse<AvailabilityResponse>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse),
    ),
    tag = "rooms"
)]
pub async fn check_availability(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, ServiceError> {
    if query.check_out <= query.check_in {
        return Err(ServiceError::ValidationError(
            "checkOut must be strictly after checkIn".to_string(),
        ));
    }

    let db = &*state.db;
    room::Entity::find_by_id(room_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Room {} not found", room_id)))?;

    let available =
        availability::is_room_available(db, room_id, query.check_in, query.check_out, None).await?;

    Ok(Json(ApiResponse::success(AvailabilityResponse {
        available,
    })))
}
