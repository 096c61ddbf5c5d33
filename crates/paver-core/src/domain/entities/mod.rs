pub mod block;
pub mod context;
pub mod definition;
pub mod hierarchy;
pub mod output;

pub use crate::domain::DomainError;
pub use block::{Block, BlockId, BlockLocator, FunctionSet, TemplateFragment, TriggerMapping};
pub use context::GenerationContext;
pub use definition::{Column, Definition, Table};
pub use hierarchy::{TableNode, build_hierarchy};
pub use output::{OutputTarget, PathTokens, Permissions, RenderedFile};
