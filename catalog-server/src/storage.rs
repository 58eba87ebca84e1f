//! Image storage
//!
//! Uploaded images are validated, re-encoded as JPEG and stored under a
//! content-addressed name (`<sha256>.jpg`), so uploading the same picture
//! twice yields the same URL.

use image::DynamicImage;
use serde::Serialize;
use sha2::{Digest, Sha256};
use shared::error::{AppError, AppResult, ErrorCode};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for product images
const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoredImage {
    pub url: String,
    pub filename: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct ImageStorage {
    dir: PathBuf,
    public_base_url: String,
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Validate image size, extension and content
fn validate_image(data: &[u8], ext: &str) -> AppResult<DynamicImage> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large. Maximum size is {}MB", MAX_FILE_SIZE / 1024 / 1024),
        ));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext_lower,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    image::load_from_memory(data).map_err(|e| {
        AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file ({ext_lower}): {e}"),
        )
    })
}

/// Re-encode as JPEG
fn compress_image(img: &DynamicImage) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
        AppError::with_message(
            ErrorCode::ImageProcessingFailed,
            format!("Failed to compress image: {e}"),
        )
    })?;
    Ok(buffer)
}

/// Reject names that could escape the upload directory
pub fn validate_filename(name: &str) -> AppResult<()> {
    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(AppError::new(ErrorCode::InvalidFilename));
    }
    Ok(())
}

impl ImageStorage {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/uploads/{}", self.public_base_url, filename)
    }

    /// Validate, re-encode and write an uploaded image
    pub async fn store(&self, original_name: &str, data: Vec<u8>) -> AppResult<StoredImage> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::UnsupportedFileFormat,
                    format!("Invalid file extension for: {original_name}"),
                )
            })?;

        let compressed = tokio::task::spawn_blocking(move || {
            let img = validate_image(&data, &ext)?;
            compress_image(&img)
        })
        .await
        .map_err(|e| AppError::internal(format!("Image task failed: {e}")))??;

        let filename = format!("{}.jpg", calculate_hash(&compressed));
        let path = self.dir.join(&filename);

        let storage_err = |e: std::io::Error| {
            AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to save file: {e}"),
            )
        };
        tokio::fs::create_dir_all(&self.dir).await.map_err(storage_err)?;
        if tokio::fs::try_exists(&path).await.map_err(storage_err)? {
            tracing::info!(original_name, file = %filename, "Duplicate image, reusing stored file");
        } else {
            tokio::fs::write(&path, &compressed).await.map_err(storage_err)?;
            tracing::info!(original_name, file = %filename, size = compressed.len(), "Image stored");
        }

        Ok(StoredImage {
            url: self.url_for(&filename),
            size: compressed.len(),
            filename,
        })
    }

    /// Read a stored file with its content type
    pub async fn read(&self, filename: &str) -> AppResult<(Vec<u8>, String)> {
        validate_filename(filename)?;
        let path = self.dir.join(filename);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::not_found(format!("File {filename}")));
            }
            Err(e) => {
                return Err(AppError::with_message(
                    ErrorCode::FileStorageFailed,
                    format!("Failed to read file: {e}"),
                ));
            }
        };
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .to_string();
        Ok((bytes, mime))
    }
}
