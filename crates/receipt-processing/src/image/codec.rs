use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageReader, ImageResult};
use receipt_core::ReceiptError;
use std::io::Cursor;
use std::path::Path;

/// Decoding and JPEG encoding shared by the edit and compression stages.
pub struct ImageCodec;

impl ImageCodec {
    /// Decode any supported raster format, guessing it from the magic bytes.
    pub fn decode(data: &[u8]) -> Result<DynamicImage, ReceiptError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ReceiptError::Decode(e.to_string()))?;
        reader
            .decode()
            .map_err(|e| ReceiptError::Decode(e.to_string()))
    }

    /// Encode as baseline JPEG. `quality` is a fraction in (0, 1].
    ///
    /// JPEG has no alpha channel; transparent pixels keep their color values.
    pub fn encode_jpeg(img: &DynamicImage, quality: f32) -> ImageResult<Vec<u8>> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut buffer = Vec::with_capacity((width as usize * height as usize) / 4);
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, Self::jpeg_quality(quality));
        encoder.encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;
        Ok(buffer)
    }

    /// Map a fractional quality to the encoder's 1-100 scale.
    pub fn jpeg_quality(quality: f32) -> u8 {
        (quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// Replace the extension of `filename` with `.jpg`.
    pub fn jpeg_filename(filename: &str) -> String {
        let path = Path::new(filename);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty());
        match stem {
            Some(stem) => format!("{}.jpg", stem),
            None => "image.jpg".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(ImageCodec::jpeg_quality(0.92), 92);
        assert_eq!(ImageCodec::jpeg_quality(0.6), 60);
        assert_eq!(ImageCodec::jpeg_quality(1.0), 100);
        assert_eq!(ImageCodec::jpeg_quality(0.001), 1);
    }

    #[test]
    fn test_jpeg_filename() {
        assert_eq!(ImageCodec::jpeg_filename("receipt.png"), "receipt.jpg");
        assert_eq!(ImageCodec::jpeg_filename("receipt.JPEG"), "receipt.jpg");
        assert_eq!(ImageCodec::jpeg_filename("scan.2024.heic"), "scan.2024.jpg");
        assert_eq!(ImageCodec::jpeg_filename("camera"), "camera.jpg");
        assert_eq!(ImageCodec::jpeg_filename(""), "image.jpg");
        assert_eq!(ImageCodec::jpeg_filename("dir/photo.webp"), "photo.jpg");
    }

    #[test]
    fn test_encode_then_decode_jpeg() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([200, 10, 10])));
        let data = ImageCodec::encode_jpeg(&img, 0.92).unwrap();
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::Jpeg);

        let decoded = ImageCodec::decode(&data).unwrap();
        assert_eq!(decoded.dimensions(), (40, 30));
    }

    #[test]
    fn test_encode_jpeg_flattens_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 128])));
        assert!(ImageCodec::encode_jpeg(&img, 0.8).is_ok());
    }

    #[test]
    fn test_decode_invalid_data() {
        let err = ImageCodec::decode(b"not an image").unwrap_err();
        assert!(matches!(err, ReceiptError::Decode(_)));
        assert!(err.to_string().starts_with("Failed to read image"));
    }
}
