use common::ConversionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One completed PDF-to-XML conversion. Rows are written once and never updated.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversion")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Name of the uploaded PDF as supplied by the client.
    pub pdf_filename: String,

    /// `{token}_{stem}.xml`, unique across all rows.
    #[sea_orm(unique)]
    pub xml_filename: String,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,

    /// Size of the uploaded PDF in bytes.
    pub file_size: i64,

    pub status: ConversionStatus,

    #[sea_orm(column_type = "Text")]
    pub xml_content: String,

    #[sea_orm(indexed)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
