//! File picker capture source.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use receipt_core::ImageAsset;

use super::traits::CaptureSource;
use crate::validator::ImageValidator;

/// Reads a receipt from disk, the way a file picker hands over a selected file.
#[derive(Debug, Clone)]
pub struct FileCaptureSource {
    path: PathBuf,
}

impl FileCaptureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CaptureSource for FileCaptureSource {
    async fn capture(&self) -> anyhow::Result<Option<ImageAsset>> {
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read file: {}", self.path.display()))?;

        let filename = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.jpg")
            .to_string();
        let content_type = ImageValidator::detect_content_type(&filename, &data);

        tracing::debug!(
            path = %self.path.display(),
            content_type = %content_type,
            size_bytes = data.len(),
            "Captured receipt from file"
        );

        Ok(Some(ImageAsset::new(data, content_type, filename)))
    }
}
