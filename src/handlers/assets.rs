//! Static ad files.
//!
//! `ServeDir` resolves paths component by component and answers 404 for any
//! `..` segment (raw or percent-encoded), so nothing outside the root is
//! reachable.

use std::path::Path;
use tower_http::services::ServeDir;

use crate::config::AssetsConfig;

/// Service serving `config.root`; mounted under `config.prefix`.
pub fn asset_service(config: &AssetsConfig) -> ServeDir {
    let root = Path::new(&config.root);
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "Asset root is not a directory; every asset will 404");
    }
    ServeDir::new(root)
}
