//! Receipt Image Processing Library
//!
//! This crate implements the receipt capture → edit → compress → upload pipeline:
//! validation, metadata probing, the rotate/crop edit stage, the quality-ladder
//! compressor, preview lifetime tracking and the state machine that drives them.

pub mod compression;
pub mod image;
pub mod metadata;
pub mod pipeline;
pub mod preview;
pub mod upload;
pub mod validator;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use compression::ImageCompressor;
pub use crate::image::{CropRect, ImageCodec, ImageEditor, ImageOrientation};
pub use metadata::ImageMetadata;
pub use pipeline::{
    Applied, PipelineState, ProcessJob, ProcessOutcome, ReceiptPipeline, UploadJob,
    UploadOutcome, UploadTarget,
};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use upload::{CaptureSource, FileCaptureSource, ReceiptUploader};
pub use validator::{ImageValidator, ValidationError};
