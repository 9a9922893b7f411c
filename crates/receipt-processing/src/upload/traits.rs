//! Traits for the pipeline collaborators.

use async_trait::async_trait;
use receipt_core::{ImageAsset, UploadRequest, UploadResponse};

/// Stores a compressed receipt against an expense or purchase record.
///
/// Called once per successful pipeline run. Errors are surfaced to the user verbatim.
#[async_trait]
pub trait ReceiptUploader: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> anyhow::Result<UploadResponse>;
}

/// Produces a single captured image (file picker, camera dialog).
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// `Ok(None)` when the user closed the source without picking anything.
    async fn capture(&self) -> anyhow::Result<Option<ImageAsset>>;
}
