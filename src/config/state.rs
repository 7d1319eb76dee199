// Runtime application state
// Built once at startup, immutable for the process lifetime

use std::path::PathBuf;

use super::{resolve_root_dir, Config};

/// Shared application state: the loaded configuration plus the resolved
/// root directory.
pub struct AppState {
    pub config: Config,
    pub root_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let root_dir = resolve_root_dir(&config.routes.root_dir);
        Self {
            config: config.clone(),
            root_dir,
        }
    }
}
