//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `paver-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `BlockStore`: Block documents in the local cache
//!   - `FragmentRenderer`: Template compilation and rendering
//!   - `BlueprintStore`: Blueprint directories in the local cache
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    BlockStore, BlueprintFile, BlueprintStore, Filesystem, FragmentRenderer, RenderLocals,
};

#[cfg(test)]
pub use output::{MockBlockStore, MockBlueprintStore, MockFragmentRenderer};
