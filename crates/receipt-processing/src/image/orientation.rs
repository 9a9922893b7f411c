use image::{imageops, DynamicImage};
use receipt_core::Rotation;

/// Image orientation operations (rotation and flipping)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Bounding box of a `width` x `height` raster after `rotation`.
    pub fn rotated_bounds(width: u32, height: u32, rotation: Rotation) -> (u32, u32) {
        if rotation.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Rotate image clockwise
    pub fn rotate(img: DynamicImage, rotation: Rotation) -> DynamicImage {
        match rotation {
            Rotation::Deg0 => img,
            Rotation::Deg90 => img.rotate90(),
            Rotation::Deg180 => img.rotate180(),
            Rotation::Deg270 => img.rotate270(),
        }
    }

    /// Apply horizontal flip (mirror)
    pub fn apply_flip_horizontal(img: DynamicImage) -> DynamicImage {
        DynamicImage::ImageRgba8(imageops::flip_horizontal(&img.to_rgba8()))
    }

    /// Normalize a decoded photo according to the EXIF orientation stored in `data`.
    pub fn apply_exif_orientation(mut img: DynamicImage, data: &[u8]) -> DynamicImage {
        let orientation = Self::read_exif_orientation(data);
        if orientation == 1 {
            return img;
        }

        let (rotation, flip_h) = Self::orientation_transforms(orientation);

        tracing::debug!(
            orientation = orientation,
            rotate = rotation.degrees(),
            flip_horizontal = flip_h,
            "Applying EXIF orientation"
        );

        // Rotation first, then the mirror
        img = Self::rotate(img, rotation);
        if flip_h {
            img = Self::apply_flip_horizontal(img);
        }
        img
    }

    /// Rotation and horizontal flip that undo an EXIF orientation value.
    /// Returns (rotation, flip_horizontal). Unknown values are treated as normal.
    pub fn orientation_transforms(orientation: u8) -> (Rotation, bool) {
        match orientation {
            1 => (Rotation::Deg0, false),   // Normal
            2 => (Rotation::Deg0, true),    // Mirror horizontal
            3 => (Rotation::Deg180, false), // Rotate 180
            4 => (Rotation::Deg180, true),  // Mirror vertical
            5 => (Rotation::Deg90, true),   // Transpose
            6 => (Rotation::Deg90, false),  // Rotate 90 CW
            7 => (Rotation::Deg270, true),  // Transverse
            8 => (Rotation::Deg270, false), // Rotate 270 CW
            _ => (Rotation::Deg0, false),
        }
    }

    /// Read the EXIF orientation tag (1-8). Returns 1 (normal) when absent or unreadable.
    #[cfg(feature = "exif")]
    pub fn read_exif_orientation(data: &[u8]) -> u8 {
        let mut cursor = std::io::Cursor::new(data);
        let exif = match exif::Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(_) => return 1,
        };

        exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .and_then(|value| u8::try_from(value).ok())
            .filter(|value| (1..=8).contains(value))
            .unwrap_or(1)
    }

    #[cfg(not(feature = "exif"))]
    pub fn read_exif_orientation(_data: &[u8]) -> u8 {
        1
    }
}
