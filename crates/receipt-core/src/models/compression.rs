use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::ReceiptError;

/// MIME type of every compressed receipt.
pub const JPEG_MIME: &str = "image/jpeg";

/// Default byte ceiling for an uploaded receipt (2 MiB).
pub const DEFAULT_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Default bound on the longest side of an uploaded receipt.
pub const DEFAULT_MAX_DIMENSION: u32 = 1920;

/// Descending JPEG quality ladder tried by the compressor.
pub const DEFAULT_QUALITY_STEPS: [f32; 5] = [0.92, 0.85, 0.80, 0.70, 0.60];

/// Limits the compression stage works towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionConstraints {
    pub max_bytes: usize,
    pub max_dimension: u32,
    pub qualities: Vec<f32>,
}

impl Default for CompressionConstraints {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_dimension: DEFAULT_MAX_DIMENSION,
            qualities: DEFAULT_QUALITY_STEPS.to_vec(),
        }
    }
}

impl CompressionConstraints {
    pub fn new(max_bytes: usize, max_dimension: u32) -> Self {
        Self {
            max_bytes,
            max_dimension,
            ..Default::default()
        }
    }

    pub fn with_qualities(mut self, qualities: Vec<f32>) -> Self {
        self.qualities = qualities;
        self
    }

    /// Check the ladder is usable: non-empty, every step in (0, 1], strictly descending.
    pub fn validate(&self) -> Result<(), ReceiptError> {
        if self.max_bytes == 0 {
            return Err(ReceiptError::InvalidConfig(
                "max_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_dimension == 0 {
            return Err(ReceiptError::InvalidConfig(
                "max_dimension must be greater than zero".to_string(),
            ));
        }
        if self.qualities.is_empty() {
            return Err(ReceiptError::InvalidConfig(
                "at least one quality step is required".to_string(),
            ));
        }
        if let Some(q) = self
            .qualities
            .iter()
            .find(|q| !(q.is_finite() && **q > 0.0 && **q <= 1.0))
        {
            return Err(ReceiptError::InvalidConfig(format!(
                "quality step {} is outside (0, 1]",
                q
            )));
        }
        if self.qualities.windows(2).any(|pair| pair[1] >= pair[0]) {
            return Err(ReceiptError::InvalidConfig(format!(
                "quality steps must be strictly descending: {:?}",
                self.qualities
            )));
        }
        Ok(())
    }
}

/// Output of the compression stage.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    /// Quality of the accepted candidate.
    pub quality: f32,
    /// Number of encodes performed before a candidate was accepted.
    pub attempts: usize,
    /// False when the quality floor was reached without meeting `max_bytes`.
    pub within_limit: bool,
}

impl CompressionResult {
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}
