use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:5000";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive byte count, got {value:?}")]
    InvalidByteCount { var: &'static str, value: String },
}

/// Server settings. Every field has a default and can be overridden from
/// the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to (`IMGCMP_ADDR`).
    pub addr: String,
    /// Base URL used when building file links in responses
    /// (`IMGCMP_PUBLIC_URL`).
    pub public_url: String,
    /// Root holding the `uploads/` and `results/` directories
    /// (`IMGCMP_STATIC_DIR`).
    pub static_dir: PathBuf,
    /// Upper bound on a request body (`IMGCMP_MAX_UPLOAD_BYTES`).
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: DEFAULT_ADDR.to_owned(),
            public_url: DEFAULT_PUBLIC_URL.to_owned(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset or blank
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let mut cfg = ServerConfig::default();

        if let Some(addr) = get("IMGCMP_ADDR") {
            cfg.addr = addr;
        }
        if let Some(url) = get("IMGCMP_PUBLIC_URL") {
            cfg.public_url = url.trim_end_matches('/').to_owned();
        }
        if let Some(dir) = get("IMGCMP_STATIC_DIR") {
            cfg.static_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get("IMGCMP_MAX_UPLOAD_BYTES") {
            cfg.max_upload_bytes = raw
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or(ConfigError::InvalidByteCount { var: "IMGCMP_MAX_UPLOAD_BYTES", value: raw })?;
        }
        Ok(cfg)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.static_dir.join("results")
    }
}
