use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Iterable, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entities::booking::{self, BookingStatus},
    errors::ServiceError,
};

/// Half-open interval overlap: [a_start, a_end) conflicts with
/// [b_start, b_end) iff each starts before the other ends. Touching at a
/// boundary is NOT a conflict, which is what allows same-day turnover
/// (check-out at 11, check-in at 15).
pub fn intervals_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Returns whether `room_id` is free for the stay [check_in, check_out).
///
/// Only pending and confirmed bookings block a room; cancelled and
/// completed stays do not, and soft-deleted rows are invisible.
/// `exclude_booking_id` skips a booking's own row when re-checking during
/// an update.
///
/// Generic over the connection so the same query serves both the cheap
/// pre-check on the pool and the authoritative re-check inside the booking
/// transaction (where the caller holds the room row lock).
pub async fn is_room_available<C: ConnectionTrait>(
    conn: &C,
    room_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> Result<bool, ServiceError> {
    let mut query = booking::Entity::find()
        .filter(booking::Column::RoomId.eq(room_id))
        .filter(booking::Column::DeletedAt.is_null())
        .filter(
            booking::Column::Status
                .is_in(BookingStatus::iter().filter(BookingStatus::blocks_room)),
        )
        .filter(booking::Column::CheckIn.lt(check_out))
        .filter(booking::Column::CheckOut.gt(check_in));

    if let Some(id) = exclude_booking_id {
        query = query.filter(booking::Column::Id.ne(id));
    }

    let conflicts = query.count(conn).await?;
    Ok(conflicts == 0)
}
