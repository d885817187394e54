use std::path::PathBuf;

use thiserror::Error;

/// Raised when raw samples cannot form a valid pixel buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("unsupported channel count {0} (expected 1 or 3)")]
    UnsupportedChannels(usize),

    #[error("sample count {actual} does not match {width}x{height}x{channels}")]
    LengthMismatch {
        width: usize,
        height: usize,
        channels: usize,
        actual: usize,
    },
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a decodable image: {0}")]
    Undecodable(String),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("no image format for extension of {0}")]
    UnknownFormat(PathBuf),

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Failures of individual edit stages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Saturation needs a hue-saturation-value decomposition, which a
    /// single-channel buffer does not have.
    #[error("saturation needs a 3-channel buffer, got {channels} channel(s)")]
    NotColor { channels: usize },

    #[error("resize to {percent}% of {width}x{height} leaves an empty image")]
    EmptyResize {
        percent: i32,
        width: usize,
        height: usize,
    },

    #[error("resize to {percent}% of {width}x{height} exceeds {max_pixels} pixels")]
    TooLarge {
        percent: i32,
        width: usize,
        height: usize,
        max_pixels: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    #[error("image {width}x{height} is smaller than the {window}x{window} similarity window")]
    TooSmall {
        width: usize,
        height: usize,
        window: usize,
    },

    #[error("similarity score is not finite")]
    NonFinite,

    #[error("cannot align an empty image")]
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("no comparison results to rank yet")]
    Empty,
}
