//! Error types for palette loading and quantization

use thiserror::Error;

/// Failure to obtain the reference color table as a whole.
///
/// Individual malformed hex entries are not load errors, they degrade to black.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Color table unreachable: {0}")]
    Unreachable(#[from] std::io::Error),

    #[error("Color table malformed: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Palette queried before the color table was loaded")]
    NotLoaded,

    #[error("Cannot quantize against an empty palette")]
    EmptyPalette,

    #[error("Pixel buffer has {len} bytes, expected {width}x{height}x4")]
    DimensionMismatch { width: u32, height: u32, len: usize },

    #[error("Pattern dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unknown preset {0:?}")]
    UnknownPreset(String),

    #[error("Selection storage error: {0}")]
    Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
