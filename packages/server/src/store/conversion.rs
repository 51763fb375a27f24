use chrono::Utc;
use common::ConversionStatus;
use common::filename::generated_filename;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::StoreError;
use crate::entity::conversion;

/// Fields supplied by the caller when recording a finished conversion.
#[derive(Debug, Clone)]
pub struct NewConversion {
    pub user_id: i32,
    pub pdf_filename: String,
    pub xml_content: String,
    pub file_size: i64,
}

/// Persist a conversion in a single INSERT and return the stored row.
///
/// The id, generated filename, timestamp and status are assigned here.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    new: NewConversion,
) -> Result<conversion::Model, StoreError> {
    let xml_filename = generated_filename(&new.pdf_filename, Uuid::new_v4());

    let model = conversion::ActiveModel {
        pdf_filename: Set(new.pdf_filename),
        xml_filename: Set(xml_filename),
        created_at: Set(Utc::now()),
        file_size: Set(new.file_size),
        status: Set(ConversionStatus::Completed),
        xml_content: Set(new.xml_content),
        user_id: Set(new.user_id),
        ..Default::default()
    };

    let saved = model.insert(db).await?;
    info!(
        conversion_id = saved.id,
        user_id = saved.user_id,
        file_size = saved.file_size,
        "Stored conversion"
    );
    Ok(saved)
}

pub async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<conversion::Model, StoreError> {
    conversion::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound(id))
}

/// All conversions owned by `user_id`, most recent first.
pub async fn list_by_owner<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<conversion::Model>, StoreError> {
    let rows = conversion::Entity::find()
        .filter(conversion::Column::UserId.eq(user_id))
        .order_by_desc(conversion::Column::CreatedAt)
        .order_by_desc(conversion::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

/// Fetch a conversion on behalf of `requester_id`.
///
/// Every user-facing read path goes through here: the ownership check runs
/// before any field leaves the store.
pub async fn get_owned_or_forbidden<C: ConnectionTrait>(
    db: &C,
    id: i32,
    requester_id: i32,
) -> Result<conversion::Model, StoreError> {
    let record = get_by_id(db, id).await?;
    if record.user_id != requester_id {
        debug!(
            conversion_id = id,
            requester_id, "Rejected access to another user's conversion"
        );
        return Err(StoreError::Forbidden(id));
    }
    Ok(record)
}
