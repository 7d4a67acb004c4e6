use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::DiscountKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub discount_type: DiscountKind,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub discount_value: Decimal,
    pub valid_from: Date,
    pub valid_to: Date,
    pub active: bool,

    /// JSON array of room ids the promotion is restricted to. NULL means
    /// every room qualifies.
    #[sea_orm(column_type = "Json", nullable)]
    pub applicable_rooms: Option<Json>,

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

    /// Whether this promotion applies to `room_id`. A malformed
    /// `applicable_rooms` payload is treated as "no restriction".
    pub fn applies_to_room(&self, room_id: Uuid) -> bool {
        let Some(raw) = &self.applicable_rooms else {
            return true;
        };
        match serde_json::from_value::<Vec<Uuid>>(raw.clone()) {
            Ok(rooms) => rooms.contains(&room_id),
            Err(e) => {
                warn!(promotion_id = %self.id, error = %e, "Unparseable applicable_rooms on promotion, treating as unrestricted");
                true
            }
        }
    }
}
