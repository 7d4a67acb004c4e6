use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        booking::{self, BookingStatus},
        booking_note, coupon, guest,
        payment::{self, PaymentMethod, PaymentStatus},
        room,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        availability, booking_status,
        discounts::{self, DiscountSelection},
        guests::{self, GuestInfo},
        notifications, payments, pricing,
    },
};

/// Special requests are kept as audit notes, capped to protect the table
/// from unbounded payloads.
const SPECIAL_REQUEST_MAX_CHARS: usize = 1000;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub room_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,

    #[validate(range(min = 1, message = "At least one adult is required"))]
    pub adults: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Children cannot be negative"))]
    pub children: i32,

    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 5, message = "A phone number is required"))]
    pub phone: String,

    pub package_id: Option<Uuid>,
    pub promotion_id: Option<Uuid>,
    pub coupon_code: Option<String>,

    /// Cash and card confirm the booking immediately and record a completed
    /// payment; gateway methods (khalti, esewa) and omission leave it pending.
    pub payment_method: Option<PaymentMethod>,

    pub special_request: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub room_id: Option<Uuid>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    #[validate(range(min = 1, message = "At least one adult is required"))]
    pub adults: Option<i32>,
    #[validate(range(min = 0, message = "Children cannot be negative"))]
    pub children: Option<i32>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub reference: String,
    pub guest_id: Uuid,
    pub room_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: Option<chrono::DateTime<Utc>>,
}

impl From<booking::Model> for BookingResponse {
    fn from(model: booking::Model) -> Self {
        Self {
            id: model.id,
            reference: model.reference,
            guest_id: model.guest_id,
            room_id: model.room_id,
            check_in: model.check_in,
            check_out: model.check_out,
            adults: model.adults,
            children: model.children,
            total_amount: model.total_amount,
            discount_amount: model.discount_amount,
            package_id: model.package_id,
            promotion_id: model.promotion_id,
            coupon_code: model.coupon_code,
            status: model.status,
            cancellation_reason: model.cancellation_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<payment::Model> for PaymentResponse {
    fn from(model: payment::Model) -> Self {
        Self {
            id: model.id,
            booking_id: model.booking_id,
            method: model.method,
            amount: model.amount,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookingOutcome {
    pub booking: BookingResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentResponse>,
}

/// Filters accepted by the booking list endpoint.
#[derive(Debug, Clone, Default)]
pub struct BookingListFilter {
    pub status: Option<BookingStatus>,
    pub room_id: Option<Uuid>,
    /// Substring match against guest first or last name.
    pub guest: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Service owning the booking lifecycle: transactional create, guarded
/// update, cancellation, soft delete and the read surface.
#[derive(Clone)]
pub struct BookingService {
    db: Arc<DbPool>,
    events: Option<Arc<EventSender>>,
}

impl BookingService {
    pub fn new(db: Arc<DbPool>, events: Option<Arc<EventSender>>) -> Self {
        Self { db, events }
    }

    /// Creates a booking. Everything that must be consistent (guest row,
    /// booking row, coupon counter, payment row, special-request note)
    /// happens inside one transaction; availability is re-checked under an
    /// exclusive lock on the room row so two concurrent requests for the
    /// same room serialize instead of both observing "available".
    #[instrument(skip(self, request), fields(room_id = %request.room_id))]
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<CreateBookingOutcome, ServiceError> {
        request.validate()?;
        validate_dates(request.check_in, request.check_out)?;
        let nights = (request.check_out - request.check_in).num_days();

        let db = &*self.db;

        let room = room::Entity::find_by_id(request.room_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Room {} not found", request.room_id))
            })?;
        validate_capacity(&room, request.adults, request.children)?;

        // Cheap pre-check so plainly conflicting requests fail before we
        // open a transaction. The authoritative check happens under lock.
        if !availability::is_room_available(db, room.id, request.check_in, request.check_out, None)
            .await?
        {
            return Err(date_conflict(&room, request.check_in, request.check_out));
        }

        let today = Utc::now().date_naive();
        let selection = DiscountSelection {
            package_id: request.package_id,
            promotion_id: request.promotion_id,
            coupon_code: request.coupon_code.clone(),
        };

        let txn = db.begin().await?;

        // Returning early anywhere below drops the transaction, which
        // rolls everything back.
        room::Entity::find_by_id(room.id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Room {} not found", room.id)))?;

        if !availability::is_room_available(&txn, room.id, request.check_in, request.check_out, None)
            .await?
        {
            return Err(date_conflict(&room, request.check_in, request.check_out));
        }

        let mut resolved = discounts::resolve(&txn, &selection, room.id, today).await?;

        // A coupon that resolved a moment ago may have been consumed by a
        // concurrent booking; re-read it under lock before counting on it.
        if let Some(found) = resolved.coupon.take() {
            let locked = coupon::Entity::find_by_id(found.id)
                .lock_exclusive()
                .one(&txn)
                .await?;
            resolved.coupon = match locked {
                Some(c) if c.is_valid_on(today) && c.has_remaining_uses() => Some(c),
                _ => {
                    warn!(coupon_code = %found.code, "Coupon exhausted during booking, proceeding without it");
                    None
                }
            };
        }

        let quote = discounts::compose_discount(nights, room.price_per_night, &resolved);
        let price = pricing::finalize_price(quote.discounted_amount);

        let guest = guests::upsert_by_email(
            &txn,
            &GuestInfo {
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                email: request.email.clone(),
                phone: request.phone.clone(),
            },
        )
        .await?;

        let status = match request.payment_method {
            Some(m) if m.is_instant_confirm() => BookingStatus::Confirmed,
            _ => BookingStatus::Pending,
        };

        let booking_id = Uuid::new_v4();
        let now = Utc::now();
        let booking_model = booking::ActiveModel {
            id: Set(booking_id),
            reference: Set(new_reference(booking_id)),
            guest_id: Set(guest.id),
            room_id: Set(room.id),
            check_in: Set(request.check_in),
            check_out: Set(request.check_out),
            adults: Set(request.adults),
            children: Set(request.children),
            total_amount: Set(price.total_amount),
            discount_amount: Set(quote.discount_amount),
            package_id: Set(resolved.package.as_ref().map(|p| p.id)),
            promotion_id: Set(resolved.promotion.as_ref().map(|p| p.id)),
            coupon_code: Set(resolved.coupon.as_ref().map(|c| c.code.clone())),
            status: Set(status),
            cancellation_reason: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&txn)
        .await?;

        if let Some(c) = resolved.coupon {
            let used_count = c.used_count;
            let mut active: coupon::ActiveModel = c.into();
            active.used_count = Set(used_count + 1);
            active.updated_at = Set(Some(now));
            active.update(&txn).await?;
        }

        let payment_row = match request.payment_method {
            Some(m) if m.is_instant_confirm() => Some(
                payments::record_payment(
                    &txn,
                    booking_id,
                    m,
                    price.total_amount,
                    PaymentStatus::Completed,
                )
                .await?,
            ),
            _ => None,
        };

        if let Some(special_request) = request.special_request.as_deref() {
            let trimmed = special_request.trim();
            if !trimmed.is_empty() {
                let note: String = trimmed.chars().take(SPECIAL_REQUEST_MAX_CHARS).collect();
                booking_note::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    booking_id: Set(booking_id),
                    note: Set(note),
                    created_at: Set(now),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;

        info!(
            booking_id = %booking_id,
            reference = %booking_model.reference,
            total = %booking_model.total_amount,
            status = %booking_model.status,
            "Booking created"
        );

        notifications::booking_created(
            self.events.as_deref(),
            booking_id,
            &guest.email,
            &booking_model.reference,
        )
        .await;

        Ok(CreateBookingOutcome {
            booking: booking_model.into(),
            payment: payment_row.map(Into::into),
        })
    }

    /// Partial update of room, dates, party size and status. Availability
    /// is re-checked (excluding this booking) whenever the room or dates
    /// change; status changes go through the transition guard. Amounts are
    /// recomputed from nights x rate minus the stored discount; discount
    /// references are not re-resolved on update.
    #[instrument(skip(self, request), fields(booking_id = %booking_id))]
    pub async fn update_booking(
        &self,
        booking_id: Uuid,
        request: UpdateBookingRequest,
    ) -> Result<BookingResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let txn = db.begin().await?;

        let existing = find_live_booking(&txn, booking_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Booking {} not found", booking_id)))?;

        let new_room_id = request.room_id.unwrap_or(existing.room_id);
        let new_check_in = request.check_in.unwrap_or(existing.check_in);
        let new_check_out = request.check_out.unwrap_or(existing.check_out);
        let new_adults = request.adults.unwrap_or(existing.adults);
        let new_children = request.children.unwrap_or(existing.children);

        validate_dates(new_check_in, new_check_out)?;

        let room_changed = new_room_id != existing.room_id;
        let dates_changed =
            new_check_in != existing.check_in || new_check_out != existing.check_out;

        let mut stay_room: Option<room::Model> = None;
        if room_changed || dates_changed {
            let room = room::Entity::find_by_id(new_room_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Room {} not found", new_room_id))
                })?;

            if !availability::is_room_available(
                &txn,
                new_room_id,
                new_check_in,
                new_check_out,
                Some(booking_id),
            )
            .await?
            {
                return Err(date_conflict(&room, new_check_in, new_check_out));
            }
            stay_room = Some(room);
        } else if request.adults.is_some() || request.children.is_some() {
            stay_room = Some(
                room::Entity::find_by_id(new_room_id)
                    .one(&txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Room {} not found", new_room_id))
                    })?,
            );
        }

        if let Some(room) = &stay_room {
            validate_capacity(room, new_adults, new_children)?;
        }

        let today = Utc::now().date_naive();
        let old_status = existing.status;
        let new_status = request.status.unwrap_or(old_status);
        if let Some(next) = request.status {
            booking_status::validate_transition(
                old_status,
                next,
                new_check_in,
                new_check_out,
                today,
            )?;
        }

        let now = Utc::now();
        let stored_discount = existing.discount_amount;
        let mut active: booking::ActiveModel = existing.into();
        active.room_id = Set(new_room_id);
        active.check_in = Set(new_check_in);
        active.check_out = Set(new_check_out);
        active.adults = Set(new_adults);
        active.children = Set(new_children);
        active.status = Set(new_status);
        active.updated_at = Set(Some(now));

        if room_changed || dates_changed {
            if let Some(room) = &stay_room {
                let nights = (new_check_out - new_check_in).num_days();
                let base = Decimal::from(nights) * room.price_per_night;
                let discounted = (base - stored_discount).max(Decimal::ZERO);
                active.total_amount = Set(pricing::finalize_price(discounted).total_amount);
            }
        }

        if new_status == BookingStatus::Cancelled && old_status != BookingStatus::Cancelled {
            payments::refund_payments_for_booking(&txn, booking_id).await?;
        }

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(booking_id = %booking_id, status = %updated.status, "Booking updated");

        if let Some(events) = self.events.as_deref() {
            if new_status != old_status {
                events
                    .send_best_effort(Event::BookingStatusChanged {
                        booking_id,
                        old_status: old_status.to_string(),
                        new_status: new_status.to_string(),
                    })
                    .await;
            } else {
                events.send_best_effort(Event::BookingUpdated(booking_id)).await;
            }
        }

        Ok(updated.into())
    }

    /// Cancels a booking and flips its payments to refunded in the same
    /// transaction. Terminal states reject with a validation error.
    #[instrument(skip(self), fields(booking_id = %booking_id))]
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        reason: Option<String>,
    ) -> Result<BookingResponse, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await?;

        let existing = find_live_booking(&txn, booking_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Booking {} not found", booking_id)))?;

        let today = Utc::now().date_naive();
        booking_status::validate_transition(
            existing.status,
            BookingStatus::Cancelled,
            existing.check_in,
            existing.check_out,
            today,
        )?;

        let refunded = payments::refund_payments_for_booking(&txn, booking_id).await?;

        let now = Utc::now();
        let mut active: booking::ActiveModel = existing.into();
        active.status = Set(BookingStatus::Cancelled);
        active.cancellation_reason = Set(reason.filter(|r| !r.trim().is_empty()));
        active.updated_at = Set(Some(now));

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(booking_id = %booking_id, refunded_payments = refunded, "Booking cancelled");

        if let Some(events) = self.events.as_deref() {
            events.send_best_effort(Event::BookingCancelled(booking_id)).await;
            if refunded > 0 {
                events
                    .send_best_effort(Event::PaymentsRefunded {
                        booking_id,
                        count: refunded,
                    })
                    .await;
            }
        }

        Ok(updated.into())
    }

    /// Soft-deletes a booking. The row stays for reporting but disappears
    /// from every read and availability query; payments are flipped to
    /// refunded alongside.
    #[instrument(skip(self), fields(booking_id = %booking_id))]
    pub async fn delete_booking(&self, booking_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await?;

        let existing = find_live_booking(&txn, booking_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Booking {} not found", booking_id)))?;

        payments::refund_payments_for_booking(&txn, booking_id).await?;

        let now = Utc::now();
        let mut active: booking::ActiveModel = existing.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(Some(now));
        active.update(&txn).await?;

        txn.commit().await?;

        info!(booking_id = %booking_id, "Booking soft-deleted");

        if let Some(events) = self.events.as_deref() {
            events.send_best_effort(Event::BookingDeleted(booking_id)).await;
        }

        Ok(())
    }

    /// Fetches one live (non-deleted) booking.
    #[instrument(skip(self), fields(booking_id = %booking_id))]
    pub async fn get_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<BookingResponse>, ServiceError> {
        let db = &*self.db;
        let found = find_live_booking(db, booking_id).await?;
        Ok(found.map(Into::into))
    }

    /// Paginated, filterable booking list, newest first.
    #[instrument(skip(self, filter))]
    pub async fn list_bookings(
        &self,
        filter: BookingListFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<BookingResponse>, u64), ServiceError> {
        let db = &*self.db;

        let mut query = booking::Entity::find().filter(booking::Column::DeletedAt.is_null());

        if let Some(status) = filter.status {
            query = query.filter(booking::Column::Status.eq(status));
        }
        if let Some(room_id) = filter.room_id {
            query = query.filter(booking::Column::RoomId.eq(room_id));
        }
        if let Some(name) = filter.guest.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query
                .join(JoinType::InnerJoin, booking::Relation::Guest.def())
                .filter(
                    Condition::any()
                        .add(guest::Column::FirstName.contains(name))
                        .add(guest::Column::LastName.contains(name)),
                );
        }
        if let Some(from) = filter.from {
            query = query.filter(booking::Column::CheckIn.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(booking::Column::CheckOut.lte(to));
        }

        let paginator = query
            .order_by_desc(booking::Column::CreatedAt)
            .paginate(db, per_page.max(1));

        let total = paginator.num_items().await?;
        let page_index = page.max(1) - 1;
        let bookings = paginator.fetch_page(page_index).await?;

        Ok((bookings.into_iter().map(Into::into).collect(), total))
    }
}

/// Loads a booking that has not been soft-deleted, on any connection.
async fn find_live_booking<C: sea_orm::ConnectionTrait>(
    conn: &C,
    booking_id: Uuid,
) -> Result<Option<booking::Model>, ServiceError> {
    booking::Entity::find_by_id(booking_id)
        .filter(booking::Column::DeletedAt.is_null())
        .one(conn)
        .await
        .map_err(ServiceError::from)
}

fn validate_dates(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), ServiceError> {
    if check_out <= check_in {
        return Err(ServiceError::ValidationError(
            "checkOut must be strictly after checkIn".to_string(),
        ));
    }
    Ok(())
}

fn validate_capacity(room: &room::Model, adults: i32, children: i32) -> Result<(), ServiceError> {
    if adults > room.max_adults {
        return Err(ServiceError::ValidationError(format!(
            "Room {} sleeps at most {} adults",
            room.room_number, room.max_adults
        )));
    }
    if children > 0 && !room.allow_children {
        return Err(ServiceError::ValidationError(format!(
            "Room {} does not allow children",
            room.room_number
        )));
    }
    if children > room.max_children {
        return Err(ServiceError::ValidationError(format!(
            "Room {} sleeps at most {} children",
            room.room_number, room.max_children
        )));
    }
    Ok(())
}

fn date_conflict(room: &room::Model, check_in: NaiveDate, check_out: NaiveDate) -> ServiceError {
    ServiceError::Conflict(format!(
        "Room {} is not available from {} to {}",
        room.room_number, check_in, check_out
    ))
}

fn new_reference(booking_id: Uuid) -> String {
    let compact = booking_id.simple().to_string();
    format!("BK-{}", compact[..8].to_uppercase())
}
