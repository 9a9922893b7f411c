//! Edit stage - applies the user's rotation and crop to a captured receipt
//!
//! The order matches what the user sees in the edit dialog:
//! 1. EXIF auto-orientation (if enabled)
//! 2. Rotation by the selected quarter turns
//! 3. Centered square crop (if requested)
//! 4. JPEG encoding at a fixed quality
//!
//! No byte-size ceiling is enforced here; that is the compressor's job.

use bytes::Bytes;
use image::{DynamicImage, GenericImageView};
use receipt_core::config::DEFAULT_EDIT_QUALITY;
use receipt_core::{CropMode, EditParameters, ImageAsset, ReceiptError, JPEG_MIME};

use super::codec::ImageCodec;
use super::crop::CropRect;
use super::orientation::ImageOrientation;

#[derive(Debug, Clone, Copy)]
pub struct ImageEditor {
    quality: f32,
    auto_orient: bool,
}

impl Default for ImageEditor {
    fn default() -> Self {
        Self::new(DEFAULT_EDIT_QUALITY, true)
    }
}

impl ImageEditor {
    pub fn new(quality: f32, auto_orient: bool) -> Self {
        Self {
            quality,
            auto_orient,
        }
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Dimensions `apply` will produce for a `width` x `height` source.
    pub fn output_dimensions(width: u32, height: u32, params: &EditParameters) -> (u32, u32) {
        let (rotated_width, rotated_height) =
            ImageOrientation::rotated_bounds(width, height, params.rotation);
        match params.crop_mode {
            CropMode::Original => (rotated_width, rotated_height),
            CropMode::Square => {
                let side = rotated_width.min(rotated_height);
                (side, side)
            }
        }
    }

    /// Rotate then crop a decoded raster.
    pub fn transform(img: DynamicImage, params: &EditParameters) -> DynamicImage {
        let rotated = ImageOrientation::rotate(img, params.rotation);
        match params.crop_mode {
            CropMode::Original => rotated,
            CropMode::Square => {
                let (width, height) = rotated.dimensions();
                CropRect::centered_square(width, height).apply(&rotated)
            }
        }
    }

    /// Run the edit stage on a captured asset and return the edited JPEG asset.
    pub fn apply(
        &self,
        asset: &ImageAsset,
        params: &EditParameters,
    ) -> Result<ImageAsset, ReceiptError> {
        let mut img = ImageCodec::decode(&asset.data)?;
        if self.auto_orient {
            img = ImageOrientation::apply_exif_orientation(img, &asset.data);
        }

        let (source_width, source_height) = img.dimensions();
        let edited = Self::transform(img, params);
        let (width, height) = edited.dimensions();

        tracing::debug!(
            filename = %asset.filename,
            rotation = params.rotation.degrees(),
            crop_mode = ?params.crop_mode,
            source_width,
            source_height,
            width,
            height,
            "Applied receipt edit"
        );

        let data = ImageCodec::encode_jpeg(&edited, self.quality)
            .map_err(|e| ReceiptError::edit_failed(e.to_string()))?;

        Ok(ImageAsset {
            data: Bytes::from(data),
            content_type: JPEG_MIME.to_string(),
            filename: ImageCodec::jpeg_filename(&asset.filename),
        })
    }
}
