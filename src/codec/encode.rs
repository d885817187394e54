use std::path::Path;

use image::ImageFormat;
use tracing::debug;

use crate::buffer::pixel_buffer::PixelBuffer;
use crate::error::EncodeError;

/// Writes `buffer` to `path`, picking the format from the path's extension.
/// Gray buffers are written as Luma, color buffers as RGB.
pub fn encode_file(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)
        .map_err(|_| EncodeError::UnknownFormat(path.to_path_buf()))?;

    buffer
        .to_dynamic()
        .save_with_format(path, format)
        .map_err(|source| EncodeError::Write { path: path.to_path_buf(), source })?;

    debug!(
        path = %path.display(),
        ?format,
        width = buffer.width(),
        height = buffer.height(),
        "encoded image"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode::decode_file;

    #[test]
    fn png_write_then_read_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let buf = PixelBuffer::from_fn(4, 3, 3, |x, y, c| (x * 40 + y * 7 + c) as u8);
        encode_file(&buf, &path).unwrap();
        assert_eq!(decode_file(&path).unwrap(), buf);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.nothing");
        let buf = PixelBuffer::zeros(2, 2, 1);
        assert!(matches!(encode_file(&buf, &path), Err(EncodeError::UnknownFormat(_))));
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let buf = PixelBuffer::zeros(2, 2, 3);
        assert!(matches!(encode_file(&buf, &path), Err(EncodeError::Write { .. })));
    }
}
