use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DiscountKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Redemption code, unique. Matched case-sensitively as stored.
    pub code: String,

    pub discount_type: DiscountKind,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub discount_value: Decimal,

    /// NULL means unlimited redemptions. used_count must never exceed
    /// usage_limit when set; the increment happens inside the booking
    /// transaction.
    pub usage_limit: Option<i32>,
    pub used_count: i32,

    pub valid_from: Date,
    pub valid_to: Date,
    pub active: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: Option<ChronoDateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_valid_on(&self, date: Date) -> bool {
        self.active && self.valid_from <= date && date <= self.valid_to
    }

    pub fn has_remaining_uses(&self) -> bool {
        match self.usage_limit {
            Some(limit) => self.used_count < limit,
            None => true,
        }
    }
}
