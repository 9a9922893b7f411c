use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CompressionResult;

/// Request handed to the upload collaborator once a receipt is compressed.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    /// Expense or purchase record the receipt belongs to.
    pub entity_id: String,
    pub date: NaiveDate,
    pub file: CompressionResult,
}

/// Response from the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Server-side path of the stored receipt.
    pub path: String,
}
