// Application state module
// Immutable process-wide state shared by all in-flight requests

use std::io;
use std::path::Path;

use super::types::Config;
use crate::handler::resolve::ServeRoots;

/// Application state
///
/// Built once at startup and shared read-only behind an `Arc`. The two
/// allowed roots are canonicalized here and never change for the lifetime
/// of the process, so concurrent reads need no locking.
pub struct AppState {
    pub config: Config,
    pub roots: ServeRoots,
}

impl AppState {
    /// Create `AppState` from loaded configuration.
    ///
    /// Fails if either configured root directory does not exist; a server
    /// sandboxed against directories it cannot canonicalize is useless.
    pub fn new(config: Config) -> io::Result<Self> {
        let roots = ServeRoots::new(
            Path::new(&config.serve.frontend_dir),
            Path::new(&config.serve.node_modules_dir),
            &config.serve.index_file,
        )?;
        Ok(Self { config, roots })
    }
}
