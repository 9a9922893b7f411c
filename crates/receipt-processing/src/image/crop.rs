use image::{DynamicImage, GenericImageView};

/// Region of a raster to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Centered square of side `min(width, height)`.
    pub fn centered_square(width: u32, height: u32) -> Self {
        let side = width.min(height);
        Self {
            x: (width - side) / 2,
            y: (height - side) / 2,
            width: side,
            height: side,
        }
    }

    /// True when the rect covers the whole `width` x `height` raster.
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == width && self.height == height
    }

    pub fn apply(&self, img: &DynamicImage) -> DynamicImage {
        let (width, height) = img.dimensions();
        if self.is_full(width, height) {
            return img.clone();
        }
        img.crop_imm(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_centered_square_portrait() {
        let rect = CropRect::centered_square(600, 800);
        assert_eq!(
            rect,
            CropRect {
                x: 0,
                y: 100,
                width: 600,
                height: 600
            }
        );
    }

    #[test]
    fn test_centered_square_landscape() {
        let rect = CropRect::centered_square(801, 600);
        assert_eq!((rect.x, rect.y), (100, 0));
        assert_eq!((rect.width, rect.height), (600, 600));
    }

    #[test]
    fn test_centered_square_of_square_is_full() {
        let rect = CropRect::centered_square(50, 50);
        assert!(rect.is_full(50, 50));
    }

    #[test]
    fn test_apply_takes_the_center() {
        let mut img = RgbaImage::from_pixel(4, 6, Rgba([0, 0, 0, 255]));
        // Mark the first row that should survive the crop
        for x in 0..4 {
            img.put_pixel(x, 1, Rgba([255, 255, 255, 255]));
        }
        let img = DynamicImage::ImageRgba8(img);

        let cropped = CropRect::centered_square(4, 6).apply(&img);
        assert_eq!(cropped.dimensions(), (4, 4));
        assert_eq!(cropped.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(cropped.get_pixel(0, 1), Rgba([0, 0, 0, 255]));
    }
}
