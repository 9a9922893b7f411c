//! Image module
//!
//! Raster operations used by the receipt pipeline:
//! - Decoding and JPEG encoding (codec)
//! - Rotation, flips and EXIF normalization (orientation)
//! - Centered square cropping (crop)
//! - The edit stage that chains them (editor)

pub mod codec;
pub mod crop;
pub mod editor;
pub mod orientation;

pub use codec::ImageCodec;
pub use crop::CropRect;
pub use editor::ImageEditor;
pub use orientation::ImageOrientation;
