//! Image decoding into `PixelBuffer`s.
//!
//! Decoding tries three modes in a fixed order and keeps the first that
//! succeeds:
//! 1. `Color`: format from the file extension, forced to 3 channels
//! 2. `Unchanged`: format sniffed from the content, channel layout kept
//!    (gray stays gray, alpha is dropped)
//! 3. `Grayscale`: format sniffed from the content, forced to 1 channel

use std::io::Cursor;
use std::path::Path;

use image::io::Reader;
use image::{DynamicImage, ImageError, ImageResult};
use tracing::debug;

use crate::buffer::pixel_buffer::PixelBuffer;
use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    Color,
    Unchanged,
    Grayscale,
}

pub const DECODE_ORDER: [DecodeMode; 3] =
    [DecodeMode::Color, DecodeMode::Unchanged, DecodeMode::Grayscale];

/// Decodes the image stored at `path`.
pub fn decode_file(path: impl AsRef<Path>) -> Result<PixelBuffer, DecodeError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DecodeError::NotFound(path.to_path_buf()));
    }
    let meta = std::fs::metadata(path)
        .map_err(|source| DecodeError::Io { path: path.to_path_buf(), source })?;
    if !meta.is_file() {
        return Err(DecodeError::Undecodable(format!("{} is not a regular file", path.display())));
    }

    run_chain(&path.display().to_string(), |mode| match mode {
        DecodeMode::Color => image::open(path).map(|img| convert(&img, mode)),
        DecodeMode::Unchanged | DecodeMode::Grayscale => Reader::open(path)
            .map_err(ImageError::IoError)?
            .with_guessed_format()
            .map_err(ImageError::IoError)?
            .decode()
            .map(|img| convert(&img, mode)),
    })
}

/// Decodes an in-memory encoded image (the format is always sniffed).
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Undecodable("empty input".into()));
    }
    run_chain("<memory>", |mode| {
        Reader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(ImageError::IoError)?
            .decode()
            .map(|img| convert(&img, mode))
    })
}

fn convert(img: &DynamicImage, mode: DecodeMode) -> PixelBuffer {
    match mode {
        DecodeMode::Color => PixelBuffer::from_rgb_image(&img.to_rgb8()),
        DecodeMode::Unchanged => PixelBuffer::from_dynamic(img),
        DecodeMode::Grayscale => PixelBuffer::from_gray_image(&img.to_luma8()),
    }
}

fn run_chain<F>(source: &str, mut attempt: F) -> Result<PixelBuffer, DecodeError>
where
    F: FnMut(DecodeMode) -> ImageResult<PixelBuffer>,
{
    let mut last_error = String::from("no decode attempted");
    for mode in DECODE_ORDER {
        match attempt(mode) {
            Ok(buf) => {
                debug!(
                    source,
                    ?mode,
                    width = buf.width(),
                    height = buf.height(),
                    channels = buf.channels(),
                    "decoded image"
                );
                return Ok(buf);
            }
            Err(e) => {
                debug!(source, ?mode, error = %e, "decode attempt failed");
                last_error = e.to_string();
            }
        }
    }
    Err(DecodeError::Undecodable(last_error))
}
