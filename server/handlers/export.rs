use tracing::{error, info};

use image_comparator::ledger::to_csv;

use crate::error::ApiError;
use crate::routes::{download_response, respond_with, HttpResponse};
use crate::state::{AppState, StaticDir};

pub const DOWNLOAD_NAME: &str = "Ranking_Comparacoes.csv";
/// Copy of the latest export kept next to the result images.
pub const SAVED_NAME: &str = "ranking_resultados.csv";

// ---------------------------------------------------------------------------
// GET /api/get_csv
// ---------------------------------------------------------------------------

pub fn handle(state: &AppState) -> HttpResponse {
    respond_with(
        render(state).map(|csv| download_response(csv.into_bytes(), "text/csv", DOWNLOAD_NAME)),
    )
}

/// Ranks the ledger and renders it as CSV. The saved copy is best effort;
/// failing to write it does not fail the download.
pub fn render(state: &AppState) -> Result<String, ApiError> {
    let ranked = state.ledger.export_ranked()?;
    let csv = to_csv(&ranked);

    let saved = state.file_path(StaticDir::Results, SAVED_NAME);
    if let Err(e) = std::fs::write(&saved, &csv) {
        error!(path = %saved.display(), error = %e, "could not save ranking copy");
    }
    info!(rows = ranked.len(), "ranking exported");
    Ok(csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_comparator::{ComparisonRecord, EditParams};

    #[test]
    fn empty_ledger_is_rejected() {
        let (_dir, state) = crate::handlers::test_state();
        assert!(matches!(render(&state), Err(ApiError::EmptyLedger)));
        assert_eq!(handle(&state).status_code().0, 400);
    }

    #[test]
    fn rows_come_out_ranked_and_a_copy_is_saved() {
        let (_dir, state) = crate::handlers::test_state();
        for (name, score) in [("a.png", 0.2), ("b.png", 0.9), ("c.png", 0.5)] {
            state.ledger.record(ComparisonRecord::new(name, score, 1.0, &EditParams::default()));
        }
        let csv = render(&state).unwrap();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert!(rows[0].starts_with("b.png;0,9;"));
        assert!(rows[0].ends_with(";1"));
        assert!(rows[1].starts_with("c.png;0,5;"));
        assert!(rows[2].starts_with("a.png;0,2;"));
        assert!(rows[2].ends_with(";3"));

        let saved = std::fs::read_to_string(state.file_path(StaticDir::Results, SAVED_NAME)).unwrap();
        assert_eq!(saved, csv);
    }
}
