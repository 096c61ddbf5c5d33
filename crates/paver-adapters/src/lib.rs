//! Infrastructure adapters for Paver.
//!
//! This crate implements the ports defined in `paver-core::application::ports`
//! against the local machine: the block cache directory, blueprint trees,
//! MiniJinja rendering and the real filesystem. It also carries the
//! built-in block documents and the YAML definition loader.

pub mod block_store;
pub mod blueprint_store;
pub mod builtin_blocks;
pub mod cache;
pub mod definition_loader;
pub mod filesystem;
pub mod renderer;

// Re-export commonly used adapters
pub use block_store::CacheBlockStore;
pub use blueprint_store::DirectoryBlueprintStore;
pub use builtin_blocks::builtin_blocks;
pub use cache::{CacheDirectory, CacheSource};
pub use definition_loader::{load_definition, parse_definition};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::MiniJinjaRenderer;
