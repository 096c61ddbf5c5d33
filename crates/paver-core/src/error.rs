//! Root error type for Paver Core.
//!
//! Wraps domain and application errors so callers match on one type, and
//! collapses their categories into the single [`ErrorCategory`] that the CLI
//! maps to exit codes.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

#[derive(Debug, Error, Clone)]
pub enum PaverError {
    /// Bad definitions, table trees and block documents.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Loading, rendering and writing.
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Environment the run depends on is unusable (no cache directory, ...).
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl PaverError {
    /// Hints for the user, most specific first.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Pass --cache-dir or set PAVER_CACHE_DIR".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        use crate::domain::ErrorCategory as Domain;

        match self {
            Self::Domain(e) => match e.category() {
                Domain::Validation => ErrorCategory::Validation,
                Domain::Resolution => ErrorCategory::Resolution,
                Domain::NotFound => ErrorCategory::NotFound,
                Domain::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }
}

/// Error categories for UI display.
///
/// Every category is fatal for the run; nothing in the core retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Resolution,
    NotFound,
    Rendering,
    Io,
    Configuration,
    Internal,
}

pub type PaverResult<T> = Result<T, PaverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err = PaverError::from(DomainError::NoRootTable);
        assert_eq!(err.to_string(), DomainError::NoRootTable.to_string());
        assert_eq!(err.category(), ErrorCategory::Resolution);
    }

    #[test]
    fn application_categories_pass_through() {
        let err = PaverError::from(ApplicationError::BlueprintNotFound {
            name: "datamgr".into(),
        });
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn configuration_errors_point_at_the_cache() {
        let err = PaverError::Configuration {
            message: "no cache directory".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.suggestions().iter().any(|s| s.contains("PAVER_CACHE_DIR")));
    }
}
