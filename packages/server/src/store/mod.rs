//! Persistence for conversion records.

pub mod conversion;

use sea_orm::DbErr;
use thiserror::Error;

/// Failures surfaced by the record store. All of them end the current request.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conversion {0} not found")]
    NotFound(i32),
    /// The record exists but belongs to someone else.
    #[error("conversion {0} belongs to another user")]
    Forbidden(i32),
    #[error("failed to persist conversion: {0}")]
    Persistence(#[from] DbErr),
}
