use std::path::PathBuf;
use std::sync::Arc;

use image_comparator::ResultLedger;

use crate::config::ServerConfig;

/// Process-wide state handed to every request thread.
#[derive(Debug, Default)]
pub struct AppState {
    pub config: ServerConfig,
    /// Comparison results collected since startup.
    pub ledger: ResultLedger,
}

pub type SharedState = Arc<AppState>;

/// Subdirectories of the static root that hold served files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticDir {
    Uploads,
    Results,
}

impl StaticDir {
    pub fn as_str(self) -> &'static str {
        match self {
            StaticDir::Uploads => "uploads",
            StaticDir::Results => "results",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uploads" => Some(StaticDir::Uploads),
            "results" => Some(StaticDir::Results),
            _ => None,
        }
    }
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        AppState { config, ledger: ResultLedger::new() }
    }

    pub fn shared(config: ServerConfig) -> SharedState {
        Arc::new(Self::new(config))
    }

    /// On-disk location of `name` inside `dir`.
    pub fn file_path(&self, dir: StaticDir, name: &str) -> PathBuf {
        self.config.static_dir.join(dir.as_str()).join(name)
    }

    /// Public URL under which `name` in `dir` is served.
    pub fn file_url(&self, dir: StaticDir, name: &str) -> String {
        format!("{}/static/{}/{}", self.config.public_url, dir.as_str(), name)
    }

    /// Creates the upload and result directories if missing.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.config.uploads_dir())?;
        std::fs::create_dir_all(self.config.results_dir())
    }
}
