//! Block documents in the local cache.
//!
//! `cache://<host>/<path>` resolves to `<cache root>/<host>/<path>`. When
//! that path is a directory, the block document is `block.json` inside it.
//!
//! ```text
//! <cache root>/
//! └── blocks.pavedroad.io/
//!     └── go/
//!         └── loggers/
//!             ├── block.json      ← document
//!             └── logger.tpl      ← fragments, relative to base-directory
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument};

use paver_core::{
    application::{ApplicationError, ports::BlockStore},
    domain::Block,
    error::PaverResult,
};

use crate::filesystem::map_io_error;

/// File name used when a block path is a directory.
pub const DEFAULT_BLOCK_FILE: &str = "block.json";

#[derive(Debug, Clone)]
pub struct CacheBlockStore {
    root: PathBuf,
}

impl CacheBlockStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Document path for `host`/`path`; `None` if a segment escapes the root.
    pub fn document_path(&self, host: &str, path: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for segment in [host, path] {
            for component in Path::new(segment.trim_start_matches('/')).components() {
                match component {
                    Component::Normal(part) => resolved.push(part),
                    Component::CurDir => {}
                    _ => return None,
                }
            }
        }
        if resolved.is_dir() {
            resolved.push(DEFAULT_BLOCK_FILE);
        }
        Some(resolved)
    }
}

impl BlockStore for CacheBlockStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load(&self, host: &str, path: &str) -> PaverResult<Block> {
        let id = format!("cache://{host}/{path}");
        let document = self
            .document_path(host, path)
            .ok_or_else(|| ApplicationError::BlockParse {
                id: id.clone(),
                reason: "path escapes the cache directory".into(),
            })?;

        if !document.is_file() {
            return Err(ApplicationError::BlockNotFound {
                id,
                location: document,
            }
            .into());
        }

        let raw = fs::read_to_string(&document).map_err(|e| map_io_error(&document, e, "read block"))?;
        let block: Block = serde_json::from_str(&raw).map_err(|e| ApplicationError::BlockParse {
            id: id.clone(),
            reason: e.to_string(),
        })?;

        debug!(document = %document.display(), block = %block.id, "Block document loaded");
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paver_core::error::PaverError;
    use tempfile::TempDir;

    const LOGGER: &str = r#"{
        "id": "io.pavedroad.core.loggers",
        "family": "loggers",
        "language": "go",
        "base-directory": "blocks.pavedroad.io/go/loggers",
        "imports": ["log"],
        "http-mappings": [
            { "http-methods": ["GET"], "template": { "file-name": "get.tpl", "function-set": { "named": "stringFunctionMap()" } } }
        ]
    }"#;

    fn cache_with_logger() -> TempDir {
        let dir = TempDir::new().unwrap();
        let block_dir = dir.path().join("blocks.pavedroad.io/go/loggers");
        fs::create_dir_all(&block_dir).unwrap();
        fs::write(block_dir.join(DEFAULT_BLOCK_FILE), LOGGER).unwrap();
        dir
    }

    #[test]
    fn directory_paths_use_default_document() {
        let dir = cache_with_logger();
        let store = CacheBlockStore::new(dir.path());
        let block = store.load("blocks.pavedroad.io", "go/loggers").unwrap();
        assert_eq!(block.family, "loggers");
        assert_eq!(block.imports, vec!["log"]);
        assert_eq!(block.http_mappings[0].triggers[0].as_str(), "GET");
    }

    #[test]
    fn explicit_file_paths_are_read_directly() {
        let dir = cache_with_logger();
        let store = CacheBlockStore::new(dir.path());
        let block = store
            .load("blocks.pavedroad.io", "go/loggers/block.json")
            .unwrap();
        assert_eq!(block.language, "go");
    }

    #[test]
    fn missing_document_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = CacheBlockStore::new(dir.path())
            .load("nowhere", "x")
            .unwrap_err();
        assert!(matches!(
            err,
            PaverError::Application(ApplicationError::BlockNotFound { .. })
        ));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("h/p")).unwrap();
        fs::write(dir.path().join("h/p/block.json"), "{ not json").unwrap();
        let err = CacheBlockStore::new(dir.path()).load("h", "p").unwrap_err();
        assert!(matches!(
            err,
            PaverError::Application(ApplicationError::BlockParse { .. })
        ));
    }

    #[test]
    fn parent_segments_are_rejected() {
        let store = CacheBlockStore::new("/cache");
        assert!(store.document_path("host", "../../etc/passwd").is_none());
    }
}
