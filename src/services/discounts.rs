use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    entities::{coupon, package, promotion, DiscountKind},
    errors::ServiceError,
};

/// The discount references a caller supplied with a booking request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscountSelection {
    pub package_id: Option<Uuid>,
    pub promotion_id: Option<Uuid>,
    pub coupon_code: Option<String>,
}

impl DiscountSelection {
    pub fn is_empty(&self) -> bool {
        self.package_id.is_none() && self.promotion_id.is_none() && self.coupon_code.is_none()
    }
}

/// Discount rows that survived validity filtering. Anything the caller
/// referenced that was missing, inactive, expired, exhausted or not
/// applicable to the room is simply absent here.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDiscounts {
    pub package: Option<package::Model>,
    pub promotion: Option<promotion::Model>,
    pub coupon: Option<coupon::Model>,
}

/// Subtotal produced by the discount pipeline, before tax.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountQuote {
    pub base_amount: Decimal,
    pub discount_amount: Decimal,
    pub discounted_amount: Decimal,
}

/// Loads and filters the referenced discounts. An invalid reference is not
/// an error: the booking proceeds without it and the reference is dropped
/// from what gets persisted.
pub async fn resolve<C: ConnectionTrait>(
    conn: &C,
    selection: &DiscountSelection,
    room_id: Uuid,
    today: NaiveDate,
) -> Result<ResolvedDiscounts, ServiceError> {
    let mut resolved = ResolvedDiscounts::default();

    if let Some(package_id) = selection.package_id {
        match package::Entity::find_by_id(package_id).one(conn).await? {
            Some(p) if p.is_valid_on(today) => resolved.package = Some(p),
            Some(_) => {
                debug!(%package_id, "Package expired or inactive, skipping");
            }
            None => debug!(%package_id, "Package not found, skipping"),
        }
    }

    if let Some(promotion_id) = selection.promotion_id {
        match promotion::Entity::find_by_id(promotion_id).one(conn).await? {
            Some(p) if p.is_valid_on(today) && p.applies_to_room(room_id) => {
                resolved.promotion = Some(p)
            }
            Some(_) => {
                debug!(%promotion_id, "Promotion expired, inactive or not applicable to room, skipping");
            }
            None => debug!(%promotion_id, "Promotion not found, skipping"),
        }
    }

    if let Some(code) = &selection.coupon_code {
        let found = coupon::Entity::find()
            .filter(coupon::Column::Code.eq(code.as_str()))
            .one(conn)
            .await?;
        match found {
            Some(c) if c.is_valid_on(today) && c.has_remaining_uses() => {
                resolved.coupon = Some(c)
            }
            Some(_) => {
                debug!(coupon_code = %code, "Coupon expired, inactive or exhausted, skipping");
            }
            None => debug!(coupon_code = %code, "Coupon not found, skipping"),
        }
    }

    Ok(resolved)
}

/// Applies the resolved discounts to a stay, in a fixed order that is part
/// of the pricing contract: package first (it can replace the base amount
/// outright), then promotion, then coupon. Percent promotions and coupons
/// are computed against the post-package base.
pub fn compose_discount(
    nights: i64,
    price_per_night: Decimal,
    discounts: &ResolvedDiscounts,
) -> DiscountQuote {
    let mut base_amount = Decimal::from(nights) * price_per_night;
    let mut discount_amount = Decimal::ZERO;

    if let Some(p) = &discounts.package {
        base_amount = match p.package_type {
            DiscountKind::Fixed => p.value,
            DiscountKind::Percent => base_amount * (dec!(100) - p.value) / dec!(100),
        };
    }

    if let Some(p) = &discounts.promotion {
        discount_amount += match p.discount_type {
            DiscountKind::Fixed => p.discount_value,
            DiscountKind::Percent => base_amount * p.discount_value / dec!(100),
        };
    }

    if let Some(c) = &discounts.coupon {
        discount_amount += match c.discount_type {
            DiscountKind::Fixed => c.discount_value,
            DiscountKind::Percent => base_amount * c.discount_value / dec!(100),
        };
    }

    let discounted_amount = (base_amount - discount_amount).max(Decimal::ZERO);

    DiscountQuote {
        base_amount,
        discount_amount,
        discounted_amount,
    }
}
