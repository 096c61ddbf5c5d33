//! Subcommand handlers.
//!
//! Each handler translates parsed arguments into calls on the core services,
//! wiring the adapters it needs, and reports results through
//! [`crate::output::OutputManager`]. No business logic lives here.

pub mod block;
pub mod completions;
pub mod generate;
pub mod init;
pub mod list;
pub mod validate;

use tracing::debug;

use paver_adapters::{CacheBlockStore, CacheDirectory, builtin_blocks};
use paver_core::application::BlockRegistry;

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Resolve the block cache and make sure it exists.
pub(crate) fn cache_directory(global: &GlobalArgs, config: &AppConfig) -> CliResult<CacheDirectory> {
    let cache = CacheDirectory::resolve(global.cache_dir.as_deref(), config.cache.dir.as_deref())?;
    if !cache.exists() {
        return Err(CliError::CacheMissing {
            path: cache.root().to_path_buf(),
            source_name: cache.source(),
        });
    }
    debug!(root = %cache.root().display(), source = %cache.source(), "Using block cache");
    Ok(cache)
}

/// Registry over the cache plus the built-in blocks.
pub(crate) fn block_registry(cache: &CacheDirectory) -> BlockRegistry {
    BlockRegistry::new(Box::new(CacheBlockStore::new(cache.root()))).with_builtins(builtin_blocks())
}
