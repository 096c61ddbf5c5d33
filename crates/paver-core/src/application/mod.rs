//! Application layer for Paver.
//!
//! This layer contains:
//! - **Services**: block loading, composition, materialization and the
//!   `GenerateService` orchestrator
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    BlockComposer, BlockRegistry, Composition, EndpointBlocks, GenerateRequest, GenerateService,
    GenerationReport, Materializer, SaveOutcome,
};

pub use ports::{
    BlockStore, BlueprintFile, BlueprintStore, Filesystem, FragmentRenderer, RenderLocals,
};

pub use error::ApplicationError;
