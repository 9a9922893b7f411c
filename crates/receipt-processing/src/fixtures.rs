//! Test images shared by unit tests.

use image::{DynamicImage, Rgb, RgbImage};

use crate::image::ImageCodec;

/// Baseline JPEG of `width` x `height` carrying an EXIF Orientation tag.
///
/// The APP1 segment is inserted right after SOI, the way cameras write it.
pub(crate) fn jpeg_with_orientation(width: u32, height: u32, orientation: u8) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 120, 150])));
    let jpeg = ImageCodec::encode_jpeg(&img, 0.9).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    // Big-endian TIFF header, one IFD0 entry: Orientation (0x0112), SHORT, count 1
    let mut tiff = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
    tiff.extend_from_slice(&[0x00, 0x01]);
    tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    tiff.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);
    let length = (payload.len() + 2) as u16;

    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}
