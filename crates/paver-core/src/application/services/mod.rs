//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports: loading block trees,
//! composing fragments, writing files and driving a full generation run.

pub mod block_registry;
pub mod composer;
pub mod generate_service;
pub mod materializer;

pub use block_registry::BlockRegistry;
pub use composer::{BlockComposer, Composition};
pub use generate_service::{EndpointBlocks, GenerateRequest, GenerateService, GenerationReport};
pub use materializer::{Materializer, SaveOutcome};
