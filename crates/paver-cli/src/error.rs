//! Error handling for the Paver CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error as _;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use paver_adapters::CacheSource;
use paver_core::error::{ErrorCategory as CoreCategory, PaverError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// `paver validate` found blocking issues.
    #[error("Definition '{}' has {errors} error(s)", .path.display())]
    ValidationFailed { path: PathBuf, errors: usize },

    /// The block cache directory is missing.
    #[error("Block cache not found at {} (from {source_name})", .path.display())]
    CacheMissing {
        path: PathBuf,
        source_name: CacheSource,
    },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `paver-core` or an adapter.
    #[error("{0}")]
    Core(#[from] PaverError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Machine-readable output could not be produced.
    #[error("Failed to serialise output: {message}")]
    Serialization { message: String },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization {
            message: err.to_string(),
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::ValidationFailed { path, .. } => vec![
                format!("Fix the issues listed above in {}", path.display()),
                format!("Re-check with: paver validate {}", path.display()),
            ],

            Self::CacheMissing { path, .. } => vec![
                format!("Populate the block cache at {}", path.display()),
                "Point paver at an existing cache with --cache-dir <DIR>".into(),
                format!("Or set {}", paver_adapters::cache::CACHE_DIR_ENV),
                "Or set cache.dir in the config file (see: paver init)".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Check your config file (default location shown by --help)".into(),
                "Use 'paver init' to create a default config".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
                "Check available disk space".into(),
            ],

            Self::Serialization { .. } => vec!["This appears to be a bug in Paver".into()],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::ValidationFailed { .. } => ErrorCategory::UserError,
            Self::CacheMissing { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Resolution => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Io => ErrorCategory::Io,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Rendering | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Io,
            Self::Serialization { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category        | Code |
    /// |-----------------|------|
    /// | User error      |  2   |
    /// | Not found       |  3   |
    /// | I/O or config   |  4   |
    /// | Internal        |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Io | ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Io => tracing::error!("I/O error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Filesystem failure.
    Io,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paver_core::application::ApplicationError;
    use paver_core::domain::{DomainError, ValidationReport};
    use std::io;

    #[test]
    fn cache_missing_suggests_flag_and_env() {
        let err = CliError::CacheMissing {
            path: PathBuf::from("/tmp/none"),
            source_name: CacheSource::Default,
        };
        let suggestions = err.suggestions();
        assert!(suggestions.iter().any(|s| s.contains("--cache-dir")));
        assert!(suggestions.iter().any(|s| s.contains("PAVER_CACHE_DIR")));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn core_suggestions_pass_through() {
        let core = PaverError::from(ApplicationError::BlueprintNotFound {
            name: "datamgr".into(),
        });
        let expected = core.suggestions();
        assert_eq!(CliError::from(core).suggestions(), expected);
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        assert_eq!(
            CliError::ValidationFailed {
                path: PathBuf::from("d.yaml"),
                errors: 2
            }
            .exit_code(),
            2
        );
        let invalid = PaverError::from(DomainError::InvalidDefinition(ValidationReport::default()));
        assert_eq!(CliError::from(invalid).exit_code(), 2);
        let cycle = PaverError::from(ApplicationError::BlockImportCycle {
            chain: vec!["a".into(), "b".into(), "a".into()],
        });
        assert_eq!(CliError::from(cycle).exit_code(), 2);
    }

    #[test]
    fn exit_code_not_found() {
        let err = PaverError::from(ApplicationError::BlueprintNotFound { name: "x".into() });
        assert_eq!(CliError::from(err).exit_code(), 3);
    }

    #[test]
    fn exit_code_io() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            4
        );
        let err = PaverError::from(ApplicationError::FilesystemError {
            path: PathBuf::from("/out"),
            reason: "denied".into(),
        });
        assert_eq!(CliError::from(err).exit_code(), 4);
    }

    #[test]
    fn exit_code_internal() {
        let err = PaverError::from(ApplicationError::RenderingFailed {
            template: "t.tpl".into(),
            line: Some(3),
            reason: "bad".into(),
        });
        assert_eq!(CliError::from(err).exit_code(), 1);
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::ValidationFailed {
            path: PathBuf::from("billing.yaml"),
            errors: 1,
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error: Definition 'billing.yaml' has 1 error(s)"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause() {
        let err = CliError::IoError {
            message: "writing output".into(),
            source: io::Error::other("disk full"),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: disk full"));
        assert!(!s.contains("Use -v"));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading config");
        assert!(matches!(cli, Err(CliError::IoError { ref message, .. }) if message == "reading config"));
    }
}
