//! Paver Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Paver
//! service generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            paver-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerateService, BlockRegistry, ...)   │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (BlockStore, FragmentRenderer, ...)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     paver-adapters (Infrastructure)     │
//! │ (CacheBlockStore, MiniJinjaRenderer)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (Definition, TableNode, Block, schema)  │
//! │           No I/O of any kind            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use paver_core::application::{
//!     BlockComposer, BlockRegistry, GenerateRequest, GenerateService, Materializer,
//! };
//!
//! // Adapters come from paver-adapters.
//! let service = GenerateService::new(
//!     BlockRegistry::new(block_store).with_builtins(builtin_blocks),
//!     BlockComposer::new(renderer),
//!     blueprint_store,
//!     Materializer::new(filesystem, "./billing"),
//! );
//! let report = service.generate(GenerateRequest::new(definition)).unwrap();
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BlockComposer, BlockRegistry, GenerateRequest, GenerateService, GenerationReport,
        Materializer, SaveOutcome,
        ports::{BlockStore, BlueprintFile, BlueprintStore, Filesystem, FragmentRenderer},
    };
    pub use crate::domain::{
        Block, BlockId, Definition, DefinitionValidator, GenerationContext, TableNode, Trigger,
        ValidationReport, build_hierarchy,
    };
    pub use crate::error::{PaverError, PaverResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
