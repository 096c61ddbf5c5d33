//! Application layer errors.
//!
//! These errors represent failures in orchestration: loading blocks,
//! rendering fragments, touching the filesystem. Bad input data is a
//! `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{ErrorCategory, PaverError};

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No document or built-in exists for a block identifier.
    #[error("Block '{id}' not found at {}", .location.display())]
    BlockNotFound { id: String, location: PathBuf },

    /// A block document exists but cannot be parsed.
    #[error("Block '{id}' could not be parsed: {reason}")]
    BlockParse { id: String, reason: String },

    /// Block imports form a cycle.
    #[error("Block import cycle: {}", .chain.join(" -> "))]
    BlockImportCycle { chain: Vec<String> },

    /// An imported block failed to generate; wraps the first failure.
    #[error("Generating block '{block}' failed: {source}")]
    BlockGenerationFailed {
        block: String,
        #[source]
        source: Box<PaverError>,
    },

    /// Template source missing from the cache.
    #[error("Template '{template}' not found")]
    TemplateNotFound { template: String },

    /// Template failed to compile or execute.
    #[error("Template '{template}'{} failed: {reason}", .line.map(|l| format!(" line {l}")).unwrap_or_default())]
    RenderingFailed {
        template: String,
        line: Option<usize>,
        reason: String,
    },

    /// No blueprint directory with this name.
    #[error("Blueprint '{name}' not found")]
    BlueprintNotFound { name: String },

    /// More than one blueprint directory with this name.
    #[error("Blueprint '{name}' is not unique: {} matches", .candidates.len())]
    AmbiguousBlueprint {
        name: String,
        candidates: Vec<PathBuf>,
    },

    /// Definition document could not be read or parsed.
    #[error("Failed to load definition {}: {reason}", .path.display())]
    DefinitionLoad { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", .path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// Serializing generated data failed.
    #[error("Serialization failed: {reason}")]
    Serialization { reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Store lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::BlockNotFound { location, .. } => vec![
                format!("Expected a block document at: {}", location.display()),
                "Check the cache directory (--cache-dir or PAVER_CACHE_DIR)".into(),
                "Built-in blocks are addressed without a scheme".into(),
            ],
            Self::BlockParse { .. } => vec!["Check the block document's JSON syntax".into()],
            Self::BlockImportCycle { chain } => vec![
                format!("Remove one of the imports in: {}", chain.join(" -> ")),
            ],
            Self::BlockGenerationFailed { source, .. } => source.suggestions(),
            Self::TemplateNotFound { template } => vec![
                format!("Expected template file: {template}"),
                "Template paths are relative to the cache directory".into(),
            ],
            Self::RenderingFailed { template, .. } => vec![
                format!("Fix the template syntax in {template}"),
                "Variables come from the generation context (name, organization, ...)".into(),
            ],
            Self::BlueprintNotFound { .. } => vec!["Try: paver list".into()],
            Self::AmbiguousBlueprint { candidates, .. } => candidates
                .iter()
                .map(|c| format!("Candidate: {}", c.display()))
                .collect(),
            Self::DefinitionLoad { path, .. } => vec![
                format!("Check that {} exists and is valid YAML", path.display()),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BlockNotFound { .. }
            | Self::TemplateNotFound { .. }
            | Self::BlueprintNotFound { .. } => ErrorCategory::NotFound,
            Self::BlockImportCycle { .. } | Self::AmbiguousBlueprint { .. } => {
                ErrorCategory::Resolution
            }
            Self::BlockParse { .. } | Self::DefinitionLoad { .. } => ErrorCategory::Validation,
            Self::BlockGenerationFailed { source, .. } => source.category(),
            Self::RenderingFailed { .. } => ErrorCategory::Rendering,
            Self::FilesystemError { .. } => ErrorCategory::Io,
            Self::Serialization { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
