// Configuration module entry point
// Layered configuration loading and startup-time path resolution

mod state;
mod types;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig};

impl Config {
    /// Load configuration from `config.toml` (if present), environment
    /// variables, and built-in defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("STATICD").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("routes.root_dir", "")?
            .set_default("routes.static_prefix", "/static")?;

        // DIST_DIR and PORT are also honored without the STATICD prefix
        if let Ok(dir) = std::env::var("DIST_DIR") {
            builder = builder.set_override("routes.root_dir", dir)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Resolve the directory to serve.
///
/// An explicitly configured directory wins. Otherwise probe `dist` next to
/// the working directory (container layout) and fall back to `../dist`
/// (local development layout).
pub fn resolve_root_dir(configured: &str) -> PathBuf {
    resolve_root_dir_from(Path::new("."), configured)
}

fn resolve_root_dir_from(base: &Path, configured: &str) -> PathBuf {
    if !configured.is_empty() {
        return PathBuf::from(configured);
    }

    let local = base.join("dist");
    if local.is_dir() {
        local
    } else {
        base.join("../dist")
    }
}
