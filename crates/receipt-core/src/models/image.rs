use anyhow::{anyhow, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// An in-memory image (file or camera blob) that has not been persisted yet.
///
/// Assets are never mutated: every stage that transforms an image produces a new
/// `ImageAsset` and the previous one is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub data: Bytes,
    pub content_type: String,
    pub filename: String,
}

impl ImageAsset {
    pub fn new(
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            filename: filename.into(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Clockwise rotation applied in the edit stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn from_degrees(degrees: u16) -> Result<Self> {
        match degrees {
            0 | 360 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            _ => Err(anyhow!(
                "Invalid rotation: {} (allowed: 0, 90, 180, 270)",
                degrees
            )),
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Next rotation when turning the image a quarter turn to the right.
    pub fn clockwise(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    pub fn counter_clockwise(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg270,
            Rotation::Deg90 => Rotation::Deg0,
            Rotation::Deg180 => Rotation::Deg90,
            Rotation::Deg270 => Rotation::Deg180,
        }
    }

    /// Quarter turns swap width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = anyhow::Error;

    fn try_from(degrees: u16) -> Result<Self> {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Crop applied after rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    #[default]
    Original,
    Square,
}

impl CropMode {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "original" | "none" => Ok(CropMode::Original),
            "square" => Ok(CropMode::Square),
            _ => Err(anyhow!("Invalid crop mode: {}", s)),
        }
    }
}

/// User-controlled edit settings. Reset whenever a new asset enters the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditParameters {
    pub rotation: Rotation,
    pub crop_mode: CropMode,
}

impl EditParameters {
    pub fn new(rotation: Rotation, crop_mode: CropMode) -> Self {
        Self {
            rotation,
            crop_mode,
        }
    }
}
