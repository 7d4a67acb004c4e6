use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the booking core after a transaction commits.
///
/// Delivery is best-effort: a full or closed channel is logged and
/// swallowed, it never fails the request that produced the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    BookingCreated(Uuid),
    BookingUpdated(Uuid),
    BookingCancelled(Uuid),
    BookingDeleted(Uuid),
    BookingStatusChanged {
        booking_id: Uuid,
        old_status: String,
        new_status: String,
    },
    PaymentRecorded(Uuid),
    PaymentsRefunded {
        booking_id: Uuid,
        count: u64,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging (not propagating) failure. This is the form
    /// the booking path uses post-commit.
    pub async fn send_best_effort(&self, event: Event) {
        if let Err(e) = self.send(event.clone()).await {
            warn!(error = %e, ?event, "Dropping event, channel unavailable");
        }
    }
}

/// Drains the event channel, dispatching each event to its consumers.
///
/// Today the only consumer is the log; front-desk dashboards and channel
/// managers subscribe here when they are wired up.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::BookingCreated(id) => info!(booking_id = %id, "event: booking created"),
            Event::BookingUpdated(id) => info!(booking_id = %id, "event: booking updated"),
            Event::BookingCancelled(id) => info!(booking_id = %id, "event: booking cancelled"),
            Event::BookingDeleted(id) => info!(booking_id = %id, "event: booking deleted"),
            Event::BookingStatusChanged {
                booking_id,
                old_status,
                new_status,
            } => info!(
                booking_id = %booking_id,
                old_status = %old_status,
                new_status = %new_status,
                "event: booking status changed"
            ),
            Event::PaymentRecorded(id) => info!(payment_id = %id, "event: payment recorded"),
            Event::PaymentsRefunded { booking_id, count } => info!(
                booking_id = %booking_id,
                count = count,
                "event: payments refunded"
            ),
        }
    }
    info!("Event channel closed, processor exiting");
}
