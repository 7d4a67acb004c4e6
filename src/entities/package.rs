use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DiscountKind;

/// A stay package. A `Fixed` package replaces the nightly base amount with
/// `value` outright (nights are ignored); a `Percent` package scales the
/// base amount down by `value` percent.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "packages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub package_type: DiscountKind,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub value: Decimal,
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
    /// A package only participates in pricing while active and inside its
    /// validity window.
    pub fn is_valid_on(&self, date: Date) -> bool {
        self.active && self.valid_from <= date && date <= self.valid_to
    }
}
