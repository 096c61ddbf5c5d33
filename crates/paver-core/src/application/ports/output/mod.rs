//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `paver-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{Block, FunctionSet, GenerationContext, Permissions};
use crate::error::PaverResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `paver_adapters::filesystem::LocalFilesystem` (production)
/// - `paver_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PaverResult<()>;

    /// Write content to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &str) -> PaverResult<()>;

    /// Apply a permission class to a written file.
    fn set_permissions(&self, path: &Path, permissions: Permissions) -> PaverResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for reading block documents from the local cache.
///
/// Implemented by `paver_adapters::CacheBlockStore`.
#[cfg_attr(test, mockall::automock)]
pub trait BlockStore: Send + Sync {
    /// Load the block document at `host`/`path` under the cache root.
    ///
    /// When that path is a directory the store reads its default block
    /// file instead.
    fn load(&self, host: &str, path: &str) -> PaverResult<Block>;
}

/// Per-call values rendered next to the shared context.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderLocals {
    /// Trigger that selected the fragment.
    pub trigger: Option<String>,
    /// Endpoint being generated.
    pub endpoint: Option<String>,
}

/// Port for template rendering.
///
/// Implemented by `paver_adapters::renderer::MiniJinjaRenderer`.
#[cfg_attr(test, mockall::automock)]
pub trait FragmentRenderer: Send + Sync {
    /// Render the template at `template` (relative to the cache root).
    ///
    /// Compiled templates are cached for the lifetime of the renderer.
    fn render(
        &self,
        template: &str,
        functions: Option<FunctionSet>,
        context: &GenerationContext,
        locals: &RenderLocals,
    ) -> PaverResult<String>;
}

/// One template file inside a blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintFile {
    /// Template path relative to the cache root.
    pub template: String,
    /// Output directory relative to the output root; may contain tokens.
    pub directory: String,
    pub file_name: String,
    pub executable: bool,
}

/// Port for blueprint discovery.
///
/// Implemented by `paver_adapters::DirectoryBlueprintStore`.
#[cfg_attr(test, mockall::automock)]
pub trait BlueprintStore: Send + Sync {
    /// All template files of the named blueprint.
    ///
    /// `name` is either a bare blueprint name, which must be unique across
    /// the cache, or a qualified `<tld>/<stage>/<name>` path.
    fn files(&self, name: &str) -> PaverResult<Vec<BlueprintFile>>;

    /// Qualified names (`<tld>/<stage>/<name>`) of all available blueprints.
    fn list(&self) -> PaverResult<Vec<String>>;
}
