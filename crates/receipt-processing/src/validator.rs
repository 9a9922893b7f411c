use std::path::Path;

use receipt_core::{ImageAsset, ReceiptError};

/// Validation errors for captured receipt files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Not an image: {content_type} (only image/* files are accepted)")]
    NotAnImage { content_type: String },

    #[error("Missing content type for {0}")]
    MissingContentType(String),

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for ReceiptError {
    fn from(err: ValidationError) -> Self {
        ReceiptError::InputValidation(err.to_string())
    }
}

/// Receipt file validator
///
/// Mirrors the `accept="image/*"` filter of a file picker: anything whose MIME type
/// is not `image/*` is rejected before the bytes are decoded.
pub struct ImageValidator;

impl ImageValidator {
    /// Validate that a content type denotes an image. Parameters (`; charset=...`) are ignored.
    pub fn validate_content_type(content_type: &str) -> Result<(), ValidationError> {
        let essence = Self::essence(content_type);
        if essence.is_empty() {
            return Err(ValidationError::MissingContentType(
                content_type.to_string(),
            ));
        }

        match essence.split_once('/') {
            Some(("image", subtype)) if !subtype.is_empty() => Ok(()),
            _ => Err(ValidationError::NotAnImage {
                content_type: content_type.to_string(),
            }),
        }
    }

    /// Validate a captured asset: non-empty and of an image MIME type.
    pub fn validate_asset(asset: &ImageAsset) -> Result<(), ValidationError> {
        Self::validate_content_type(&asset.content_type)?;
        if asset.data.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        Ok(())
    }

    /// Content type a file picker would report for this filename.
    pub fn content_type_for_filename(filename: &str) -> Option<&'static str> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())?;

        let content_type = match extension.as_str() {
            "jpg" | "jpeg" | "jfif" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            "tif" | "tiff" => "image/tiff",
            "heic" => "image/heic",
            "pdf" => "application/pdf",
            "txt" => "text/plain",
            "csv" => "text/csv",
            "xls" => "application/vnd.ms-excel",
            "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            _ => {
                tracing::debug!(extension = %extension, "Unknown extension, no content type");
                return None;
            }
        };
        Some(content_type)
    }

    /// Content type for raw bytes, by filename first and magic bytes second.
    pub fn detect_content_type(filename: &str, data: &[u8]) -> String {
        if let Some(content_type) = Self::content_type_for_filename(filename) {
            return content_type.to_string();
        }
        image::guess_format(data)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string())
    }

    fn essence(content_type: &str) -> String {
        content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase()
    }
}
