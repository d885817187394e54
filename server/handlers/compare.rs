use serde::Serialize;
use tiny_http::{Request, StatusCode};
use tracing::{debug, info};

use image_comparator::edit::resize_percent;
use image_comparator::{apply_edits, compare_all, decode_bytes, encode_file, ComparisonRecord};

use crate::error::ApiError;
use super::Outputs;
use crate::routes::{json_response, respond_with, HttpResponse};
use crate::state::{AppState, StaticDir};
use crate::util::upload::UploadForm;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareResponse {
    pub ssim_score: f64,
    pub diferenca_media: f64,
    pub original_url: String,
    pub edited_url: String,
    pub diff_map_url: String,
}

// ---------------------------------------------------------------------------
// POST /api/compare
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

/// Edits the upload, scores it against the original, stores the three images
/// and records the result.
///
/// The original is resized by the same percentage before scoring so both
/// sides share a scale.
pub fn run(state: &AppState, form: &UploadForm) -> Result<CompareResponse, ApiError> {
    let original = decode_bytes(&form.bytes)?;
    let edited = apply_edits(original.clone(), &form.params)?;
    let reference = resize_percent(original, form.params.resize_percent)?;
    let comparison = compare_all(&reference, &edited);

    let name = form.safe_name();
    let edited_name = format!("editada_resultado_{}", name);
    let map_name = format!("mapa_resultado_{}", name);

    // The raw upload goes last: it is the only write that cannot fail on
    // format, and nothing stays on disk unless all three land.
    let mut outputs = Outputs::default();
    outputs.write(state.file_path(StaticDir::Results, &edited_name), |p| {
        Ok(encode_file(&edited, p)?)
    })?;
    outputs.write(state.file_path(StaticDir::Results, &map_name), |p| {
        Ok(encode_file(&comparison.diff_map, p)?)
    })?;
    outputs.write(state.file_path(StaticDir::Uploads, &name), |p| {
        Ok(std::fs::write(p, &form.bytes)?)
    })?;
    outputs.keep();
    debug!(%name, "comparison images written");

    state.ledger.record(ComparisonRecord::new(
        form.filename.as_str(),
        comparison.ssim,
        comparison.mean_abs_diff,
        &form.params,
    ));
    info!(
        file = %form.filename,
        ssim = comparison.ssim,
        mean_abs_diff = comparison.mean_abs_diff,
        recorded = state.ledger.len(),
        "comparison recorded"
    );

    Ok(CompareResponse {
        ssim_score: comparison.ssim,
        diferenca_media: comparison.mean_abs_diff,
        original_url: state.file_url(StaticDir::Uploads, &name),
        edited_url: state.file_url(StaticDir::Results, &edited_name),
        diff_map_url: state.file_url(StaticDir::Results, &map_name),
    })
}
