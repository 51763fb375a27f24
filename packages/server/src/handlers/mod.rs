pub mod auth;
pub mod conversion;
