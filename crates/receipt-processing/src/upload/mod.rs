//! Collaborators at the edges of the pipeline: capture sources and uploaders.

pub mod file_source;
pub mod traits;

pub use file_source::FileCaptureSource;
pub use traits::{CaptureSource, ReceiptUploader};
