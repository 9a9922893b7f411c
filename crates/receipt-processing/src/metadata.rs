//! Receipt image metadata

use image::{GenericImageView, ImageReader};
use receipt_core::{ImageAsset, ReceiptError};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::image::ImageOrientation;

/// Image metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub exif_orientation: Option<u8>,
}

impl ImageMetadata {
    /// Decode `asset` and describe it. Decode failures map to `ReceiptError::Decode`.
    pub fn probe(asset: &ImageAsset) -> Result<Self, ReceiptError> {
        let reader = ImageReader::new(Cursor::new(&asset.data[..]))
            .with_guessed_format()
            .map_err(|e| ReceiptError::Decode(e.to_string()))?;
        let format = reader
            .format()
            .map(|f| format!("{:?}", f))
            .unwrap_or_else(|| "unknown".to_string());
        let img = reader
            .decode()
            .map_err(|e| ReceiptError::Decode(e.to_string()))?;
        let (width, height) = img.dimensions();

        let exif_orientation = ImageOrientation::read_exif_orientation(&asset.data);

        Ok(ImageMetadata {
            width,
            height,
            format,
            content_type: asset.content_type.clone(),
            size_bytes: asset.size_bytes() as u64,
            exif_orientation: if exif_orientation != 1 {
                Some(exif_orientation)
            } else {
                None
            },
        })
    }
}
