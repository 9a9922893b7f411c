//! Units of work handed out by the pipeline
//!
//! Each job carries the ticket of the attempt that created it. The pipeline only
//! applies an outcome whose ticket still matches the current attempt.

use receipt_core::{
    CompressionConstraints, CompressionResult, EditParameters, ImageAsset, ReceiptError,
    UploadRequest, UploadResponse,
};

use crate::compression::ImageCompressor;
use crate::image::ImageEditor;
use crate::upload::ReceiptUploader;

/// Result of handing an outcome back to the pipeline.
#[derive(Debug)]
#[must_use]
pub enum Applied<T> {
    /// The outcome was applied and produced the next piece of work or the final value.
    Next(T),
    /// The outcome was applied and the pipeline is now `Failed`.
    Failed(ReceiptError),
    /// The outcome belongs to a cancelled or replaced attempt and was ignored.
    Discarded,
}

impl<T> Applied<T> {
    pub fn is_discarded(&self) -> bool {
        matches!(self, Applied::Discarded)
    }
}

/// Edit followed by compression of the captured asset.
#[derive(Debug, Clone)]
pub struct ProcessJob {
    pub(crate) ticket: u64,
    pub(crate) asset: ImageAsset,
    pub(crate) params: EditParameters,
    pub(crate) editor: ImageEditor,
    pub(crate) constraints: CompressionConstraints,
}

impl ProcessJob {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Run both CPU-bound stages on the current thread.
    pub fn run(self) -> ProcessOutcome {
        let result = self
            .editor
            .apply(&self.asset, &self.params)
            // The edit stage already applied the EXIF orientation
            .and_then(|edited| ImageCompressor::compress(&edited, &self.constraints, false));

        ProcessOutcome {
            ticket: self.ticket,
            result,
        }
    }

    /// Run on the blocking thread pool so the async runtime stays responsive.
    pub async fn run_blocking(self) -> ProcessOutcome {
        let ticket = self.ticket;
        match tokio::task::spawn_blocking(move || self.run()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, ticket, "Receipt processing task failed");
                ProcessOutcome {
                    ticket,
                    result: Err(ReceiptError::compression_failed(format!(
                        "Processing task failed: {}",
                        e
                    ))),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub ticket: u64,
    pub result: Result<CompressionResult, ReceiptError>,
}

/// Upload of a compressed receipt.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub(crate) ticket: u64,
    pub(crate) request: UploadRequest,
}

impl UploadJob {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Hand the request to `uploader`. Its error message is kept verbatim.
    pub async fn run(self, uploader: &dyn ReceiptUploader) -> UploadOutcome {
        let result = uploader
            .upload(self.request)
            .await
            .map_err(|e| ReceiptError::upload(&e));

        UploadOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub ticket: u64,
    pub result: Result<UploadResponse, ReceiptError>,
}
