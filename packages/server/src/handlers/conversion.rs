use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, body::Body};
use chrono::Utc;
use common::{DocumentSynthesizer, SynthesisError};
use common::filename::download_filename;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::conversion::{
    ConversionListResponse, ConversionResponse, ConversionSummary,
};
use crate::state::AppState;
use crate::store::conversion::{self as store, NewConversion};
use crate::utils::filename::{content_disposition_value, has_extension, validate_flat_filename};

const XML_CONTENT_TYPE: &str = "application/xml";

#[utoipa::path(
    post,
    path = "/conversions",
    tag = "Conversions",
    operation_id = "createConversion",
    summary = "Convert an uploaded PDF to XML",
    description = "Accepts a multipart upload with a `file` field holding a `.pdf` file. \
        The generated XML is stored and returned together with the new conversion ID.",
    request_body(content_type = "multipart/form-data", description = "PDF upload"),
    responses(
        (status = 201, description = "Conversion created", body = ConversionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 422, description = "Upload could not be converted (CONVERSION_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(
    skip(state, auth_user, multipart),
    fields(user_id = auth_user.user_id, username = %auth_user.username)
)]
pub async fn create_conversion(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max_size = state.config.upload.max_file_size;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue; // Ignore unknown fields.
        }
        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
        let data = read_file_field(field, max_size).await?;
        upload = Some((file_name, data));
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;

    let pdf_filename = validate_flat_filename(&file_name)
        .map_err(|e| AppError::Validation(e.message().into()))?
        .to_string();
    if !has_extension(&pdf_filename, "pdf") {
        return Err(AppError::Validation(
            "Only .pdf files can be converted".into(),
        ));
    }

    let xml_content = state.synthesizer.synthesize(&data, Utc::now())?;

    let record = store::create(
        &state.db,
        NewConversion {
            user_id: auth_user.user_id,
            pdf_filename,
            xml_content,
            file_size: i64::try_from(data.len()).unwrap_or(i64::MAX),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ConversionResponse::from(record))))
}

#[utoipa::path(
    get,
    path = "/conversions",
    tag = "Conversions",
    operation_id = "listConversions",
    summary = "List the caller's conversions",
    description = "Returns the caller's conversion history, most recent first. \
        The XML body is omitted; fetch a single conversion to get it.",
    responses(
        (status = 200, description = "Conversion history", body = ConversionListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_conversions(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ConversionListResponse>, AppError> {
    let records = store::list_by_owner(&state.db, auth_user.user_id).await?;

    let total = records.len() as u64;
    let conversions = records.iter().map(ConversionSummary::from).collect();

    Ok(Json(ConversionListResponse { conversions, total }))
}

#[utoipa::path(
    get,
    path = "/conversions/{id}",
    tag = "Conversions",
    operation_id = "getConversion",
    summary = "Get a conversion",
    description = "Returns every field of a conversion, including the XML. \
        Only the owner may read it.",
    params(("id" = i32, Path, description = "Conversion ID")),
    responses(
        (status = 200, description = "Conversion details", body = ConversionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Owned by another user (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Conversion not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, conversion_id = %id))]
pub async fn get_conversion(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ConversionResponse>, AppError> {
    let record = store::get_owned_or_forbidden(&state.db, id, auth_user.user_id).await?;
    Ok(Json(ConversionResponse::from(record)))
}

#[utoipa::path(
    get,
    path = "/conversions/{id}/download",
    tag = "Conversions",
    operation_id = "downloadConversion",
    summary = "Download the generated XML",
    description = "Sends the stored XML as an `application/xml` attachment named after \
        the uploaded PDF with its extension replaced by `.xml`.",
    params(("id" = i32, Path, description = "Conversion ID")),
    responses(
        (status = 200, description = "XML document", content_type = "application/xml", body = String),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Owned by another user (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Conversion not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, conversion_id = %id))]
pub async fn download_conversion(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let record = store::get_owned_or_forbidden(&state.db, id, auth_user.user_id).await?;

    let filename = download_filename(&record.pdf_filename);
    let body = record.xml_content.into_bytes();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XML_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, body.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&filename),
        )
        .body(Body::from(body))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// Buffer the uploaded file, enforcing the size limit as chunks arrive.
///
/// A stream that breaks mid-read is a synthesis input failure, not a client
/// validation error.
async fn read_file_field(mut field: Field<'_>, max_size: u64) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| SynthesisError::Read(std::io::Error::other(e)))?
    {
        if (data.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}
