/// image-comparator server
///
/// JSON API for editing an uploaded image and scoring the edit against the
/// original. Served by a synchronous tiny_http server.
///
/// Run with:
///   cargo run --bin server --release
///
/// Endpoints:
///   POST /api/compare   edit, score, store and record one upload
///   POST /api/preview   edit and store one upload
///   GET  /api/get_csv   ranking of all recorded comparisons
///   GET  /static/...    stored uploads and results

mod config;
mod error;
mod handlers;
mod routes;
mod state;
mod util;

use tiny_http::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use state::AppState;

const DEFAULT_LOG_FILTER: &str = "image_comparator=info,server=info";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    let state = AppState::shared(config);
    if let Err(e) = state.ensure_dirs() {
        error!(dir = %state.config.static_dir.display(), error = %e, "could not create static directories");
        std::process::exit(1);
    }

    let server = match Server::http(state.config.addr.as_str()) {
        Ok(s) => s,
        Err(e) => {
            error!(addr = %state.config.addr, error = %e, "could not bind HTTP server");
            std::process::exit(1);
        }
    };
    info!(
        addr = %state.config.addr,
        public_url = %state.config.public_url,
        static_dir = %state.config.static_dir.display(),
        max_upload_bytes = state.config.max_upload_bytes,
        "image-comparator listening"
    );

    // One thread per request; the ledger's mutex serializes recording.
    for request in server.incoming_requests() {
        let state = state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state);
        });
    }
}
