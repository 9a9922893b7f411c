use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use receipt_core::{
    CompressionConstraints, CompressionResult, ImageAsset, ReceiptError, JPEG_MIME,
};

use crate::image::{ImageCodec, ImageOrientation};
use crate::validator::ImageValidator;

/// Receipt compressor: bounded downscale followed by a JPEG quality search.
pub struct ImageCompressor;

impl ImageCompressor {
    /// Compress an arbitrary image file into a JPEG that fits `constraints` when possible.
    ///
    /// Non-image content types are rejected before any decoding happens. With
    /// `auto_orient` the EXIF orientation is applied first, since the re-encoded
    /// output carries no metadata.
    pub fn compress(
        asset: &ImageAsset,
        constraints: &CompressionConstraints,
        auto_orient: bool,
    ) -> Result<CompressionResult, ReceiptError> {
        ImageValidator::validate_content_type(&asset.content_type)?;

        let mut img = ImageCodec::decode(&asset.data)?;
        if auto_orient {
            img = ImageOrientation::apply_exif_orientation(img, &asset.data);
        }
        Self::compress_image(&img, &asset.filename, constraints)
    }

    /// Quality search over an already decoded raster.
    ///
    /// Candidates are tried in ladder order and the first one within `max_bytes` wins.
    /// The last candidate is accepted regardless of size, so this never fails on size alone.
    pub fn compress_image(
        img: &DynamicImage,
        filename: &str,
        constraints: &CompressionConstraints,
    ) -> Result<CompressionResult, ReceiptError> {
        constraints.validate()?;

        let resized = Self::downscale(img, constraints.max_dimension);
        let (width, height) = resized.dimensions();
        let filename = ImageCodec::jpeg_filename(filename);
        let steps = constraints.qualities.len();

        for (index, &quality) in constraints.qualities.iter().enumerate() {
            let data = ImageCodec::encode_jpeg(&resized, quality)
                .map_err(|e| ReceiptError::compression_failed(e.to_string()))?;
            let attempts = index + 1;
            let within_limit = data.len() <= constraints.max_bytes;

            tracing::debug!(
                quality = quality,
                attempt = attempts,
                size_bytes = data.len(),
                max_bytes = constraints.max_bytes,
                "Encoded compression candidate"
            );

            if within_limit || attempts == steps {
                if !within_limit {
                    tracing::warn!(
                        filename = %filename,
                        size_bytes = data.len(),
                        max_bytes = constraints.max_bytes,
                        quality = quality,
                        "Quality floor reached above size limit, keeping lowest quality candidate"
                    );
                }

                return Ok(CompressionResult {
                    data: Bytes::from(data),
                    filename,
                    content_type: JPEG_MIME.to_string(),
                    width,
                    height,
                    quality,
                    attempts,
                    within_limit,
                });
            }
        }

        Err(ReceiptError::compression_failed("no quality steps configured"))
    }

    /// Target dimensions: `scale = min(1, max_dimension / max(width, height))`, never upscaled.
    pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
        let max_dimension = max_dimension.max(1);
        let longest = width.max(height);
        if longest <= max_dimension {
            return (width, height);
        }

        let scale = max_dimension as f64 / longest as f64;
        let scaled = |side: u32| -> u32 {
            ((side as f64 * scale).round() as u32).clamp(1, max_dimension)
        };
        (scaled(width), scaled(height))
    }

    /// Proportionally shrink so the longest side is at most `max_dimension`.
    pub fn downscale(img: &DynamicImage, max_dimension: u32) -> DynamicImage {
        let (width, height) = img.dimensions();
        let (new_width, new_height) = Self::fit_within(width, height, max_dimension);
        if (new_width, new_height) == (width, height) {
            return img.clone();
        }

        tracing::debug!(
            width,
            height,
            new_width,
            new_height,
            "Downscaling receipt before compression"
        );

        let filter = Self::select_filter(width, height, new_width, new_height);
        img.resize_exact(new_width, new_height, filter)
    }

    /// Cheaper filters for large reductions, sharper ones for small ones.
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }
}
