//! Receipt Core Library
//!
//! This crate provides the domain models, error taxonomy and configuration shared by
//! the receipt capture pipeline, the HTTP client and the command-line front end.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::ReceiptConfig;
pub use error::{EncodeStage, LogLevel, ReceiptError, ReceiptResult};
pub use models::{
    CompressionConstraints, CompressionResult, CropMode, EditParameters, ImageAsset, Rotation,
    UploadRequest, UploadResponse, JPEG_MIME,
};
