use chrono::{DateTime, Utc};
use common::ConversionStatus;
use serde::Serialize;

use crate::entity::conversion;

/// Display format used for `conversion_date`.
pub const CONVERSION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// History entry for a conversion, without the document body.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ConversionSummary {
    /// Conversion ID.
    #[schema(example = 17)]
    pub id: i32,
    /// Name of the uploaded PDF.
    #[schema(example = "quarterly-report.pdf")]
    pub pdf_filename: String,
    /// Unique generated name of the XML document.
    #[schema(example = "3b1f0c8e-2f7d-4c7e-9a0e-4d6f1b2c3d4e_quarterly-report.xml")]
    pub xml_filename: String,
    pub status: ConversionStatus,
    /// Creation time formatted for display (UTC).
    #[schema(example = "2024-03-15 09:30:00")]
    pub conversion_date: String,
    pub created_at: DateTime<Utc>,
    /// Size of the uploaded PDF in bytes.
    #[schema(example = 48213)]
    pub file_size: i64,
}

/// Full conversion, including the generated XML.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ConversionResponse {
    #[serde(flatten)]
    pub summary: ConversionSummary,
    /// The generated XML document.
    pub xml_content: String,
}

/// Response DTO for the conversion history.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ConversionListResponse {
    pub conversions: Vec<ConversionSummary>,
    pub total: u64,
}

impl From<&conversion::Model> for ConversionSummary {
    fn from(model: &conversion::Model) -> Self {
        Self {
            id: model.id,
            pdf_filename: model.pdf_filename.clone(),
            xml_filename: model.xml_filename.clone(),
            status: model.status,
            conversion_date: model.created_at.format(CONVERSION_DATE_FORMAT).to_string(),
            created_at: model.created_at,
            file_size: model.file_size,
        }
    }
}

impl From<conversion::Model> for ConversionResponse {
    fn from(model: conversion::Model) -> Self {
        Self {
            summary: ConversionSummary::from(&model),
            xml_content: model.xml_content,
        }
    }
}
