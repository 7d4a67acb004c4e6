use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::{entities::guest, errors::ServiceError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GuestInfo {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 5, message = "A phone number is required"))]
    pub phone: String,
}

/// Resolves a guest by email, creating one when absent.
///
/// An existing guest with the same email is reused as-is: name and phone
/// from the request are NOT written over the stored record, and no
/// ownership verification happens. Runs on the booking transaction so a
/// rolled-back booking leaves no orphan guest.
pub async fn upsert_by_email<C: ConnectionTrait>(
    conn: &C,
    info: &GuestInfo,
) -> Result<guest::Model, ServiceError> {
    if let Some(existing) = guest::Entity::find()
        .filter(guest::Column::Email.eq(info.email.as_str()))
        .one(conn)
        .await?
    {
        debug!(guest_id = %existing.id, "Reusing existing guest for email");
        return Ok(existing);
    }

    let now = Utc::now();
    let model = guest::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(info.email.clone()),
        phone: Set(info.phone.clone()),
        first_name: Set(info.first_name.clone()),
        last_name: Set(info.last_name.clone()),
        created_at: Set(now),
        updated_at: Set(None),
    };

    let created = model.insert(conn).await?;
    debug!(guest_id = %created.id, "Created new guest");
    Ok(created)
}
