use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::booking::BookingStatus;
use crate::services::bookings::{
    BookingListFilter, BookingResponse, CreateBookingOutcome, CreateBookingRequest,
    UpdateBookingRequest,
};
use crate::{errors::ServiceError, ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub status: Option<BookingStatus>,
    pub room_id: Option<Uuid>,
    /// Substring match against guest first or last name
    pub guest: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

/// Create a new booking
#[utoipa::path(
    post,
    path = "/api/bookings",
    summary = "Create booking",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = ApiResponse<CreateBookingOutcome>),
        (status = 400, description = "Invalid dates, party size or fields", body = crate::errors::ErrorResponse),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Room not available for the requested dates", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateBookingOutcome>>), ServiceError> {
    let outcome = state.services.bookings.create_booking(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(outcome))))
}

/// Update a booking
#[utoipa::path(
    put,
    path = "/api/bookings/{id}",
    summary = "Update booking",
    request_body = UpdateBookingRequest,
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking updated", body = ApiResponse<BookingResponse>),
        (status = 400, description = "Invalid dates or status transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "Booking or room not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "New room/dates conflict with another booking", body = crate::errors::ErrorResponse),
    ),
    tag = "bookings"
)]
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, ServiceError> {
    let booking = state.services.bookings.update_booking(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        booking,
        "Booking updated successfully".to_string(),
    )))
}

/// Cancel a booking
#[utoipa::path(
    patch,
    path = "/api/bookings/{id}/cancel",
    summary = "Cancel booking",
    request_body = CancelBookingRequest,
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingResponse>),
        (status = 400, description = "Booking already cancelled or completed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::errors::ErrorResponse),
    ),
    tag = "bookings"
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<CancelBookingRequest>>,
) -> Result<Json<ApiResponse<BookingResponse>>, ServiceError> {
    let reason = payload.and_then(|Json(body)| body.reason);
    let booking = state.services.bookings.cancel_booking(id, reason).await?;
    Ok(Json(ApiResponse::success_with_message(
        booking,
        "Booking cancelled".to_string(),
    )))
}

/// Soft-delete a booking
#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    summary = "Delete booking",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking deleted"),
        (status = 404, description = "Booking not found", body = crate::errors::ErrorResponse),
    ),
    tag = "bookings"
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.services.bookings.delete_booking(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        (),
        "Booking deleted".to_string(),
    )))
}

/// Fetch a single booking
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    summary = "Get booking",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking found", body = ApiResponse<BookingResponse>),
        (status = 404, description = "Booking not found", body = crate::errors::ErrorResponse),
    ),
    tag = "bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, ServiceError> {
    let booking = state
        .services
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Booking {} not found", id)))?;
    Ok(Json(ApiResponse::success(booking)))
}

/// List bookings with pagination and filtering
#[utoipa::path(
    get,
    path = "/api/bookings",
    summary = "List bookings",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("status" = Option<String>, Query, description = "Filter by booking status"),
        ("roomId" = Option<Uuid>, Query, description = "Filter by room"),
        ("guest" = Option<String>, Query, description = "Substring match on guest name"),
        ("from" = Option<String>, Query, description = "Earliest check-in date (ISO)"),
        ("to" = Option<String>, Query, description = "Latest check-out date (ISO)"),
    ),
    responses(
        (status = 200, description = "Bookings retrieved", body = ApiResponse<PaginatedResponse<BookingResponse>>),
    ),
    tag = "bookings"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<BookingResponse>>>, ServiceError> {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, 100);

    let filter = BookingListFilter {
        status: query.status,
        room_id: query.room_id,
        guest: query.guest,
        from: query.from,
        to: query.to,
    };

    let (items, total) = state
        .services
        .bookings
        .list_bookings(filter, page, limit)
        .await?;
    let total_pages = total.div_ceil(limit);

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}
