use tracing::debug;

use crate::routes::{file_response, not_found, HttpResponse};
use crate::state::{AppState, StaticDir};

// ---------------------------------------------------------------------------
// GET /static/{uploads|results}/{file}
// ---------------------------------------------------------------------------

/// Serves a stored image. `rest` is the path after `/static/`.
pub fn handle(rest: &str, state: &AppState) -> HttpResponse {
    let Some((dir, name)) = resolve(rest) else {
        return not_found();
    };
    let path = state.file_path(dir, name);
    match std::fs::read(&path) {
        Ok(bytes) => file_response(bytes, content_type_for(name)),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "static file not served");
            not_found()
        }
    }
}

/// Splits `uploads/cat.png` into its directory and file name. Unknown
/// directories, nested paths and traversal attempts resolve to nothing.
fn resolve(rest: &str) -> Option<(StaticDir, &str)> {
    let (dir, name) = rest.split_once('/')?;
    let dir = StaticDir::parse(dir)?;
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return None;
    }
    Some((dir, name))
}

pub fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state;

    #[test]
    fn traversal_and_unknown_dirs_are_refused() {
        assert_eq!(resolve("uploads/cat.png"), Some((StaticDir::Uploads, "cat.png")));
        assert!(resolve("uploads/../secret.png").is_none());
        assert!(resolve("results/a/b.png").is_none());
        assert!(resolve("elsewhere/cat.png").is_none());
        assert!(resolve("uploads/").is_none());
        assert!(resolve("uploads").is_none());
    }

    #[test]
    fn stored_files_are_served_with_their_type() {
        let (_dir, state) = test_state();
        std::fs::write(state.file_path(StaticDir::Results, "map.png"), b"png-bytes").unwrap();

        let resp = handle("results/map.png", &state);
        assert_eq!(resp.status_code().0, 200);
        let ct = resp.headers().iter().find(|h| h.field.equiv("Content-Type")).unwrap();
        assert_eq!(ct.value.as_str(), "image/png");

        assert_eq!(handle("results/missing.png", &state).status_code().0, 404);
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
