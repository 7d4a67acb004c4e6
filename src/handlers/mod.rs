pub mod bookings;
pub mod rooms;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub bookings: Arc<crate::services::bookings::BookingService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let bookings = Arc::new(crate::services::bookings::BookingService::new(
            db_pool,
            Some(event_sender),
        ));
        Self { bookings }
    }
}
