use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use receipt_core::{CompressionResult, CropMode, Rotation};
use serde::Serialize;

/// Summary printed after a file has been written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSummary {
    pub output: PathBuf,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within_limit: Option<bool>,
}

impl OutputSummary {
    pub fn from_compression(output: PathBuf, result: &CompressionResult) -> Self {
        Self {
            output,
            content_type: result.content_type.clone(),
            width: result.width,
            height: result.height,
            size_bytes: result.size_bytes(),
            quality: Some(result.quality),
            attempts: Some(result.attempts),
            within_limit: Some(result.within_limit),
        }
    }
}

/// `clap` value parser for `--rotate`.
pub fn parse_rotation(raw: &str) -> Result<Rotation, String> {
    let degrees: u16 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of degrees", raw))?;
    Rotation::from_degrees(degrees).map_err(|e| e.to_string())
}

/// `clap` value parser for `--crop`.
pub fn parse_crop_mode(raw: &str) -> Result<CropMode, String> {
    CropMode::parse(raw).map_err(|e| e.to_string())
}

/// `clap` value parser for `--date` (YYYY-MM-DD).
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a date in YYYY-MM-DD form", raw))
}

/// `<dir>/<stem>.<suffix>.jpg` next to `input`.
pub fn default_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    input.with_file_name(format!("{}.{}.jpg", stem, suffix))
}

pub fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
