//! Receipt CLI: inspect, edit, compress and upload receipt photos.
//!
//! Pipeline limits come from RECEIPT_* variables (see `ReceiptConfig`). Uploads need
//! RECEIPT_API_KEY and RECEIPT_API_URL (or API_KEY / API_URL).

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use receipt_api_client::ApiClient;
use receipt_cli::{
    default_output, init_tracing, parse_crop_mode, parse_date, parse_rotation, print_json,
    OutputSummary,
};
use receipt_core::{CropMode, EditParameters, ImageAsset, ReceiptConfig, Rotation};
use receipt_processing::{
    CaptureSource, FileCaptureSource, ImageCompressor, ImageEditor, ImageMetadata,
    ReceiptPipeline, UploadTarget,
};

#[derive(Parser)]
#[command(name = "receipt", about = "Receipt capture and upload CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print dimensions, format and EXIF orientation of an image
    Inspect {
        /// Path to the image
        file: PathBuf,
    },
    /// Rotate and optionally square-crop an image
    Edit {
        /// Path to the image
        file: PathBuf,
        /// Clockwise rotation: 0, 90, 180 or 270
        #[arg(long, default_value = "0", value_parser = parse_rotation)]
        rotate: Rotation,
        /// Crop mode: original or square
        #[arg(long, default_value = "original", value_parser = parse_crop_mode)]
        crop: CropMode,
        /// Output path (defaults to <name>.edited.jpg)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Compress an image under the configured size ceiling
    Compress {
        /// Path to the image
        file: PathBuf,
        /// Size ceiling in bytes (overrides RECEIPT_MAX_UPLOAD_BYTES)
        #[arg(long)]
        max_bytes: Option<usize>,
        /// Longest side in pixels (overrides RECEIPT_MAX_DIMENSION)
        #[arg(long)]
        max_dimension: Option<u32>,
        /// Output path (defaults to <name>.compressed.jpg)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Edit, compress and upload a receipt for an expense or purchase
    Upload {
        /// Path to the image
        file: PathBuf,
        /// Expense or purchase id
        #[arg(long)]
        entity: String,
        /// Receipt date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Clockwise rotation: 0, 90, 180 or 270
        #[arg(long, default_value = "0", value_parser = parse_rotation)]
        rotate: Rotation,
        /// Crop mode: original or square
        #[arg(long, default_value = "original", value_parser = parse_crop_mode)]
        crop: CropMode,
    },
}

async fn read_asset(path: &Path) -> anyhow::Result<ImageAsset> {
    FileCaptureSource::new(path)
        .capture()
        .await?
        .with_context(|| format!("No image captured from {}", path.display()))
}

fn write_output(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG may come from .env
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ReceiptConfig::from_env().context("Invalid receipt configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { file } => {
            let asset = read_asset(&file).await?;
            let metadata = ImageMetadata::probe(&asset)?;
            print_json(&metadata)?;
        }
        Commands::Edit {
            file,
            rotate,
            crop,
            output,
        } => {
            let asset = read_asset(&file).await?;
            let editor = ImageEditor::new(config.edit_quality, config.auto_orient);
            let params = EditParameters::new(rotate, crop);
            let edited = tokio::task::spawn_blocking(move || editor.apply(&asset, &params))
                .await
                .context("Edit task failed")??;

            let metadata = ImageMetadata::probe(&edited)?;
            let output = output.unwrap_or_else(|| default_output(&file, "edited"));
            write_output(&output, &edited.data)?;

            print_json(&OutputSummary {
                output,
                content_type: edited.content_type.clone(),
                width: metadata.width,
                height: metadata.height,
                size_bytes: edited.size_bytes(),
                quality: Some(editor.quality()),
                attempts: None,
                within_limit: None,
            })?;
        }
        Commands::Compress {
            file,
            max_bytes,
            max_dimension,
            output,
        } => {
            let asset = read_asset(&file).await?;
            let mut constraints = config.constraints.clone();
            if let Some(max_bytes) = max_bytes {
                constraints.max_bytes = max_bytes;
            }
            if let Some(max_dimension) = max_dimension {
                constraints.max_dimension = max_dimension;
            }

            let auto_orient = config.auto_orient;
            let result = tokio::task::spawn_blocking(move || {
                ImageCompressor::compress(&asset, &constraints, auto_orient)
            })
            .await
            .context("Compression task failed")??;

            let output = output.unwrap_or_else(|| default_output(&file, "compressed"));
            write_output(&output, &result.data)?;
            print_json(&OutputSummary::from_compression(output, &result))?;
        }
        Commands::Upload {
            file,
            entity,
            date,
            rotate,
            crop,
        } => {
            let client = ApiClient::from_env().context(
                "Failed to create API client. Set RECEIPT_API_KEY and RECEIPT_API_URL (or API_URL)",
            )?;

            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let mut pipeline = ReceiptPipeline::new(UploadTarget::new(entity, date), &config);

            pipeline.capture(read_asset(&file).await?)?;
            pipeline.begin_edit()?;
            pipeline.set_rotation(rotate)?;
            pipeline.set_crop_mode(crop)?;

            let response = pipeline.run(&client).await?;
            print_json(&response)?;
        }
    }

    Ok(())
}
