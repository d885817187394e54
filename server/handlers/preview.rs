use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use tiny_http::{Request, StatusCode};
use tracing::debug;

use image_comparator::{apply_edits, decode_bytes, encode_file};

use crate::error::ApiError;
use super::Outputs;
use crate::routes::{json_response, respond_with, HttpResponse};
use crate::state::{AppState, StaticDir};
use crate::util::upload::UploadForm;

const PREVIEW_ID_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewResponse {
    pub edited_url: String,
}

// ---------------------------------------------------------------------------
// POST /api/preview
// ---------------------------------------------------------------------------

pub fn handle(request: &mut Request, state: &AppState) -> HttpResponse {
    respond_with(
        super::read_upload(request, state)
            .and_then(|form| run(state, &form))
            .and_then(|body| {
                serde_json::to_string(&body).map_err(|e| ApiError::Io(e.to_string()))
            })
            .map(|json| json_response(StatusCode(200), json)),
    )
}

/// Applies the edits and stores the result under a fresh name. Nothing is
/// compared or recorded.
///
/// Both preview files are kept for the life of the static directory; every
/// call adds a new pair and nothing here removes old ones, so deployments
/// must clear `preview_*` files from `static/` themselves.
pub fn run(state: &AppState, form: &UploadForm) -> Result<PreviewResponse, ApiError> {
    let original = decode_bytes(&form.bytes)?;
    let edited = apply_edits(original, &form.params)?;

    let id = preview_id();
    let original_name = format!("preview_original_{}.png", id);
    let edited_name = format!("preview_editada_{}.png", id);

    let mut outputs = Outputs::default();
    outputs.write(state.file_path(StaticDir::Results, &edited_name), |p| {
        Ok(encode_file(&edited, p)?)
    })?;
    outputs.write(state.file_path(StaticDir::Uploads, &original_name), |p| {
        Ok(std::fs::write(p, &form.bytes)?)
    })?;
    outputs.keep();
    debug!(%id, width = edited.width(), height = edited.height(), "preview written");

    Ok(PreviewResponse { edited_url: state.file_url(StaticDir::Results, &edited_name) })
}

fn preview_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PREVIEW_ID_LEN)
        .map(char::from)
        .collect()
}
