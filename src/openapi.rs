use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::ErrorResponse;
use crate::handlers;
use crate::services::bookings::{
    BookingResponse, CreateBookingOutcome, CreateBookingRequest, PaymentResponse,
    UpdateBookingRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Innkeeper API",
        version = "0.3.0",
        description = r#"
Property-management backend for hotels.

Covers the booking lifecycle end to end: availability lookup, discount
composition (package, promotion, coupon), tax calculation, transactional
booking creation with optional instant payment, guarded status
transitions, cancellation with payment refund flip, and soft deletion.

All list endpoints are paginated via `page` and `limit` query parameters.
Error responses share one JSON shape with the HTTP status category,
a human-readable message and a timestamp.
"#,
        contact(name = "Innkeeper", email = "support@innkeeper.dev")
    ),
    paths(
        handlers::bookings::create_booking,
        handlers::bookings::update_booking,
        handlers::bookings::cancel_booking,
        handlers::bookings::delete_booking,
        handlers::bookings::get_booking,
        handlers::bookings::list_bookings,
        handlers::rooms::check_availability,
    ),
    components(schemas(
        CreateBookingRequest,
        UpdateBookingRequest,
        BookingResponse,
        PaymentResponse,
        CreateBookingOutcome,
        handlers::bookings::CancelBookingRequest,
        handlers::rooms::AvailabilityResponse,
        ErrorResponse,
    )),
    tags(
        (name = "bookings", description = "Booking lifecycle"),
        (name = "rooms", description = "Room availability")
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
