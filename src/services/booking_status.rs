use chrono::NaiveDate;

use crate::{entities::booking::BookingStatus, errors::ServiceError};

/// Validates a booking status transition.
///
/// The state machine, with date-based gating (date-only comparison,
/// time-of-day is ignored):
/// - pending → confirmed: only once the stay has started (today ≥ check_in)
/// - confirmed → confirmed: idempotent re-confirmation, used by front-office
///   workflow completion
/// - confirmed → completed: only once the stay has ended (today ≥ check_out)
/// - pending/confirmed → cancelled: always allowed
/// - cancelled and completed are terminal; nothing leaves them
pub fn validate_transition(
    current: BookingStatus,
    next: BookingStatus,
    check_in: NaiveDate,
    check_out: NaiveDate,
    today: NaiveDate,
) -> Result<(), ServiceError> {
    use BookingStatus::*;

    let allowed = match (current, next) {
        (Pending, Confirmed) => {
            if today < check_in {
                return Err(ServiceError::InvalidTransition(format!(
                    "Cannot confirm before check-in date {}",
                    check_in
                )));
            }
            true
        }
        (Confirmed, Confirmed) => true,
        (Confirmed, Completed) => {
            if today < check_out {
                return Err(ServiceError::InvalidTransition(format!(
                    "Cannot complete before check-out date {}",
                    check_out
                )));
            }
            true
        }
        (Pending, Cancelled) | (Confirmed, Cancelled) => true,
        (Pending, Pending) => true,
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(ServiceError::InvalidTransition(format!(
            "Cannot transition booking from '{}' to '{}'",
            current, next
        )))
    }
}
