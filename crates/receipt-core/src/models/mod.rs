//! Data models for the receipt pipeline
//!
//! Each sub-module covers one stage of the capture → edit → compress → upload flow.

mod compression;
mod image;
mod upload;

pub use compression::*;
pub use image::*;
pub use upload::*;
