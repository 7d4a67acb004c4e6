use tracing::{info, warn};

use crate::events::{Event, EventSender};

/// Best-effort side effects after a booking transaction commits. Nothing in
/// here may fail the request: errors are logged and swallowed.
pub async fn booking_created(
    events: Option<&EventSender>,
    booking_id: uuid::Uuid,
    guest_email: &str,
    reference: &str,
) {
    if let Some(events) = events {
        events.send_best_effort(Event::BookingCreated(booking_id)).await;
    }
    send_confirmation_email(guest_email, reference).await;
}

/// Confirmation email stub. The mail integration lives outside this
/// service; this logs what would be sent and never errors.
pub async fn send_confirmation_email(guest_email: &str, reference: &str) {
    // TODO: route through the transactional mail provider once its sender
    // identity is provisioned.
    if guest_email.is_empty() {
        warn!(reference = %reference, "No guest email on booking, skipping confirmation");
        return;
    }
    info!(
        email = %guest_email,
        reference = %reference,
        "Would send booking confirmation email"
    );
}
