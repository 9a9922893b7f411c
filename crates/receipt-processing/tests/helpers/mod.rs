#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use receipt_core::{ImageAsset, ReceiptConfig, UploadRequest, UploadResponse};
use receipt_processing::{CaptureSource, ReceiptPipeline, ReceiptUploader, UploadTarget};

pub fn receipt_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

/// Build a configuration from literal `KEY=value` pairs.
pub fn config_with(pairs: &[(&str, &str)]) -> ReceiptConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ReceiptConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn pipeline_with(config: &ReceiptConfig) -> ReceiptPipeline {
    ReceiptPipeline::new(UploadTarget::new("purchase-7", receipt_date()), config)
}

/// Paper-like raster: light background with dark "text" stripes.
pub fn receipt_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        if (y / 8) % 3 == 0 && x % 17 > 3 {
            Rgb([30, 30, 30])
        } else {
            Rgb([245, 242, 235])
        }
    });
    DynamicImage::ImageRgb8(img)
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

pub fn png_asset(width: u32, height: u32, filename: &str) -> ImageAsset {
    let data = encode(&receipt_image(width, height), ImageFormat::Png);
    ImageAsset::new(data, "image/png", filename)
}

/// Uploader that records requests and answers with a storage path.
#[derive(Default)]
pub struct RecordingUploader {
    pub requests: Mutex<Vec<UploadRequest>>,
    pub fail_with: Option<String>,
}

impl RecordingUploader {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<UploadRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ReceiptUploader for RecordingUploader {
    async fn upload(&self, request: UploadRequest) -> anyhow::Result<UploadResponse> {
        let path = format!(
            "receipts/{}/{}/{}",
            request.entity_id, request.date, request.file.filename
        );
        self.requests.lock().unwrap().push(request);
        match &self.fail_with {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(UploadResponse { path }),
        }
    }
}

/// Capture source whose dialog is closed without picking anything.
pub struct DismissedCapture;

#[async_trait]
impl CaptureSource for DismissedCapture {
    async fn capture(&self) -> anyhow::Result<Option<ImageAsset>> {
        Ok(None)
    }
}
