use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    entities::payment::{self, PaymentMethod, PaymentStatus},
    errors::ServiceError,
};

/// Persists a payment row for a booking. Runs on the caller's connection so
/// booking and payment commit or roll back together.
pub async fn record_payment<C: ConnectionTrait>(
    conn: &C,
    booking_id: Uuid,
    method: PaymentMethod,
    amount: Decimal,
    status: PaymentStatus,
) -> Result<payment::Model, ServiceError> {
    let model = payment::ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking_id),
        method: Set(method),
        amount: Set(amount),
        status: Set(status),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    };

    let created = model.insert(conn).await?;
    info!(payment_id = %created.id, booking_id = %booking_id, amount = %amount, "Payment recorded");
    Ok(created)
}

/// Marks every non-refunded payment on the booking as refunded. This is a
/// bookkeeping flip on cancellation, not an actual gateway refund.
pub async fn refund_payments_for_booking<C: ConnectionTrait>(
    conn: &C,
    booking_id: Uuid,
) -> Result<u64, ServiceError> {
    let update = payment::ActiveModel {
        status: Set(PaymentStatus::Refunded),
        updated_at: Set(Some(Utc::now())),
        ..Default::default()
    };

    let result = payment::Entity::update_many()
        .set(update)
        .filter(payment::Column::BookingId.eq(booking_id))
        .filter(payment::Column::Status.ne(PaymentStatus::Refunded))
        .exec(conn)
        .await?;

    if result.rows_affected > 0 {
        info!(booking_id = %booking_id, count = result.rows_affected, "Payments marked refunded");
    }
    Ok(result.rows_affected)
}
