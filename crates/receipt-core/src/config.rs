//! Configuration module
//!
//! Receipt pipeline settings are read from the environment. Binaries load `.env`
//! before calling [`ReceiptConfig::from_env`]. Every value has a default, so an empty
//! environment yields a working setup.

use std::env;

use anyhow::{anyhow, Context, Result};

use crate::models::{
    CompressionConstraints, DEFAULT_MAX_BYTES, DEFAULT_MAX_DIMENSION, DEFAULT_QUALITY_STEPS,
};

/// Quality used when the edit stage encodes its output.
pub const DEFAULT_EDIT_QUALITY: f32 = 0.92;

/// Pipeline configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiptConfig {
    pub constraints: CompressionConstraints,
    pub edit_quality: f32,
    /// Normalize EXIF orientation before the user's rotation is applied.
    pub auto_orient: bool,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            constraints: CompressionConstraints::default(),
            edit_quality: DEFAULT_EDIT_QUALITY,
            auto_orient: true,
        }
    }
}

impl ReceiptConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_bytes = match lookup("RECEIPT_MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow!("RECEIPT_MAX_UPLOAD_BYTES must be a valid number"))?,
            None => DEFAULT_MAX_BYTES,
        };

        let max_dimension = match lookup("RECEIPT_MAX_DIMENSION") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("RECEIPT_MAX_DIMENSION must be a valid number"))?,
            None => DEFAULT_MAX_DIMENSION,
        };

        let qualities = match lookup("RECEIPT_QUALITY_STEPS") {
            Some(raw) => parse_quality_steps(&raw).context("Invalid RECEIPT_QUALITY_STEPS")?,
            None => DEFAULT_QUALITY_STEPS.to_vec(),
        };

        let edit_quality = match lookup("RECEIPT_EDIT_QUALITY") {
            Some(raw) => parse_quality(&raw).context("Invalid RECEIPT_EDIT_QUALITY")?,
            None => DEFAULT_EDIT_QUALITY,
        };

        let auto_orient = lookup("RECEIPT_AUTO_ORIENT")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);

        let constraints = CompressionConstraints {
            max_bytes,
            max_dimension,
            qualities,
        };
        constraints.validate()?;

        Ok(Self {
            constraints,
            edit_quality,
            auto_orient,
        })
    }
}

/// Parse a comma separated quality ladder such as `"0.92,0.85,0.8"`.
pub fn parse_quality_steps(raw: &str) -> Result<Vec<f32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_quality)
        .collect()
}

fn parse_quality(raw: &str) -> Result<f32> {
    let value = raw
        .trim()
        .parse::<f32>()
        .map_err(|_| anyhow!("'{}' is not a number", raw.trim()))?;
    if !(value > 0.0 && value <= 1.0) {
        return Err(anyhow!("quality {} is outside (0, 1]", value));
    }
    Ok(value)
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ReceiptConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReceiptConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ReceiptConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("RECEIPT_MAX_UPLOAD_BYTES", "500000"),
            ("RECEIPT_MAX_DIMENSION", "1024"),
            ("RECEIPT_QUALITY_STEPS", "0.9, 0.7,0.5"),
            ("RECEIPT_EDIT_QUALITY", "0.95"),
            ("RECEIPT_AUTO_ORIENT", "false"),
        ])
        .unwrap();

        assert_eq!(config.constraints.max_bytes, 500_000);
        assert_eq!(config.constraints.max_dimension, 1024);
        assert_eq!(config.constraints.qualities, vec![0.9, 0.7, 0.5]);
        assert_eq!(config.edit_quality, 0.95);
        assert!(!config.auto_orient);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert!(config_from(&[("RECEIPT_MAX_UPLOAD_BYTES", "lots")]).is_err());
        assert!(config_from(&[("RECEIPT_MAX_DIMENSION", "-1")]).is_err());
        assert!(config_from(&[("RECEIPT_EDIT_QUALITY", "92")]).is_err());
    }

    #[test]
    fn test_quality_ladder_must_descend() {
        let err = config_from(&[("RECEIPT_QUALITY_STEPS", "0.6,0.8")]).unwrap_err();
        assert!(err.to_string().contains("strictly descending"));
    }

    #[test]
    fn test_parse_quality_steps() {
        assert_eq!(parse_quality_steps("0.92,0.85").unwrap(), vec![0.92, 0.85]);
        assert_eq!(parse_quality_steps("0.5,").unwrap(), vec![0.5]);
        assert!(parse_quality_steps("0.5,abc").is_err());
        assert!(parse_quality_steps("1.2").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool(" 1 "));
        assert!(!parse_bool("off"));
        assert!(!parse_bool(""));
    }
}
