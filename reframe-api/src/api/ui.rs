//! UI serving routes
//!
//! Serves a prebuilt web client from a directory on disk. Unknown paths fall
//! back to `index.html` so client-side routes survive a reload.

use axum::Router;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

/// Attach the static client as the router's fallback
///
/// Leaves the router unchanged when `dir` does not exist.
pub fn attach_static_assets(router: Router, dir: &Path) -> Router {
    if !dir.is_dir() {
        warn!("Static assets directory not found, UI disabled: {}", dir.display());
        return router;
    }

    info!("Serving static assets from {}", dir.display());

    let index = dir.join("index.html");
    router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
}
