//! Image Upload Handler

use axum::{
    Json,
    extract::{Extension, Multipart, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};

use crate::api::AppPath;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::state::AppState;

/// Accepted multipart field names
const FILE_FIELDS: &[&str] = &["image", "file"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
}

/// POST /upload
pub async fn upload(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let mut file: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        if !field.name().is_some_and(|name| FILE_FIELDS.contains(&name)) {
            continue;
        }
        let original_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
        file = Some((original_name, data.to_vec()));
        break;
    }

    let (original_name, data) = file.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::NoFileProvided,
            "No 'image' field found in multipart request",
        )
    })?;
    let original_name = original_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::InvalidFilename))?;

    let stored = state.images.store(&original_name, data).await?;
    audit_log!(current_user.username, "upload", format!("image:{}", stored.filename));

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: stored.url,
            filename: stored.filename,
            size: stored.size,
        }),
    ))
}

/// GET /uploads/{filename}
pub async fn serve(
    State(state): State<AppState>,
    AppPath(filename): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let (bytes, mime) = state.images.read(&filename).await?;
    Ok(([(header::CONTENT_TYPE, mime)], bytes))
}
