pub mod compare;
pub mod preview;
pub mod export;
pub mod static_files;

use std::path::{Path, PathBuf};

use tiny_http::Request;
use tracing::warn;

use crate::error::ApiError;
use crate::routes::{content_type, read_body};
use crate::state::AppState;
use crate::util::upload::UploadForm;

/// Reads and validates a multipart upload under the configured size limit.
pub fn read_upload(request: &mut Request, state: &AppState) -> Result<UploadForm, ApiError> {
    let content_type = content_type(request);
    let body = read_body(request, state.config.max_upload_bytes)?;
    UploadForm::parse(&content_type, &body)
}

/// Files written while handling one request. Unless `keep` is called they
/// are removed again on drop, so a failed request leaves nothing behind.
#[derive(Debug, Default)]
pub struct Outputs {
    paths: Vec<PathBuf>,
    kept: bool,
}

impl Outputs {
    /// Runs `write` against `path`, tracking the path first so a partial
    /// file is cleaned up too.
    pub fn write<F>(&mut self, path: PathBuf, write: F) -> Result<(), ApiError>
    where
        F: FnOnce(&Path) -> Result<(), ApiError>,
    {
        self.paths.push(path);
        let path = &self.paths[self.paths.len() - 1];
        write(path)
    }

    pub fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for Outputs {
    fn drop(&mut self) {
        if self.kept {
            return;
        }
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "could not remove partial output"),
            }
        }
    }
}

/// Per-test static root, so handler tests never share files.
#[cfg(test)]
pub fn test_state() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let config = crate::config::ServerConfig {
        static_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let state = AppState::new(config);
    state.ensure_dirs().unwrap();
    (dir, state)
}

/// Encodes a small neutral-toned color image as PNG bytes. Neutral pixels
/// survive the saturation round trip exactly.
#[cfg(test)]
pub fn png_upload(width: usize, height: usize) -> Vec<u8> {
    let img = image_comparator::PixelBuffer::from_fn(width, height, 3, |x, y, _| {
        (x * 11 + y * 5) as u8
    });
    let mut out = std::io::Cursor::new(Vec::new());
    img.to_dynamic()
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}
