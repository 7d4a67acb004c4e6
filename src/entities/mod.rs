use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub mod booking;
pub mod booking_note;
pub mod coupon;
pub mod guest;
pub mod package;
pub mod payment;
pub mod promotion;
pub mod room;

/// Discount arithmetic shared by packages, promotions and coupons.
///
/// `Fixed` is an absolute amount; `Percent` is a percentage of the amount it
/// is applied against. For packages specifically, `Fixed` replaces the base
/// amount outright instead of being subtracted from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    #[sea_orm(string_value = "fixed")]
    Fixed,
    #[sea_orm(string_value = "percent")]
    Percent,
}
