// ============================================================================
// domain/error.rs - DEFINITION, HIERARCHY AND BLOCK ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::validation::ValidationReport;

/// Root domain error type.
///
/// Domain errors describe bad input data: a definition that fails
/// validation, a table list that does not form a tree, or a block that is
/// structurally unusable. They never carry I/O details.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Definition validation
    // ========================================================================
    #[error("Definition has {} error(s)", .0.error_count())]
    InvalidDefinition(ValidationReport),

    #[error("Column '{column}' in table '{table}' has unknown type '{type_name}'")]
    UnknownColumnType {
        table: String,
        column: String,
        type_name: String,
    },

    // ========================================================================
    // Table hierarchy
    // ========================================================================
    #[error("No root table found: exactly one table must have no parent")]
    NoRootTable,

    #[error("More than one root table found: {}", .names.join(", "))]
    MultipleRootTables { names: Vec<String> },

    #[error("Table '{table}' is its own ancestor")]
    HierarchyCycle { table: String },

    #[error("Tables not reachable from the root: {}", .names.join(", "))]
    UnreachableTables { names: Vec<String> },

    // ========================================================================
    // Blocks
    // ========================================================================
    #[error("Invalid block '{id}': {reason}")]
    InvalidBlock { id: String, reason: String },

    #[error("Block '{block}' maps trigger '{trigger}' more than once")]
    OverlappingTriggers { block: String, trigger: String },

    #[error("Unknown function set '{name}'")]
    UnknownFunctionSet { name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidDefinition(report) => {
                let mut out: Vec<String> = report.issues().iter().map(|i| i.to_string()).collect();
                out.push("Fix the definition and run `paver validate` again".into());
                out
            }
            Self::UnknownColumnType { type_name, .. } => vec![
                format!("'{type_name}' is not a known column type"),
                "Run `paver validate` to list every invalid column".into(),
            ],
            Self::NoRootTable => vec![
                "Leave `parent-tables` empty on exactly one table".into(),
                "Check for tables that name each other as parents".into(),
            ],
            Self::MultipleRootTables { names } => vec![
                format!("These tables have no parent: {}", names.join(", ")),
                "Set `parent-tables` on all but one of them".into(),
            ],
            Self::HierarchyCycle { table } => vec![
                format!("Table names must be unique; '{table}' appears more than once"),
            ],
            Self::UnreachableTables { names } => vec![
                format!("Check the `parent-tables` chain of: {}", names.join(", ")),
                "Every table must lead back to the root".into(),
            ],
            Self::InvalidBlock { .. } => vec!["Check the block document".into()],
            Self::OverlappingTriggers { trigger, .. } => vec![
                format!("Map '{trigger}' in exactly one http/event mapping"),
            ],
            Self::UnknownFunctionSet { .. } => vec![
                "Known function sets: strings (alias: stringFunctionMap())".into(),
            ],
        }
    }

    /// Get error category for display purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDefinition(_) | Self::UnknownColumnType { .. } => {
                ErrorCategory::Validation
            }
            Self::NoRootTable
            | Self::MultipleRootTables { .. }
            | Self::HierarchyCycle { .. }
            | Self::UnreachableTables { .. } => ErrorCategory::Resolution,
            Self::InvalidBlock { .. }
            | Self::OverlappingTriggers { .. }
            | Self::UnknownFunctionSet { .. } => ErrorCategory::Validation,
        }
    }
}

/// Error categories for domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Resolution,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_errors_are_resolution() {
        assert_eq!(DomainError::NoRootTable.category(), ErrorCategory::Resolution);
        assert_eq!(
            DomainError::HierarchyCycle { table: "a".into() }.category(),
            ErrorCategory::Resolution
        );
    }

    #[test]
    fn multiple_roots_lists_names() {
        let err = DomainError::MultipleRootTables {
            names: vec!["a".into(), "b".into()],
        };
        assert!(err.to_string().contains("a, b"));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn invalid_definition_counts_only_errors() {
        use crate::domain::{Column, Definition, DefinitionValidator, Table};

        let mut def = Definition::default();
        def.info.name = "yourMicroserviceName".into();
        def.info.organization = "acme-demo".into();
        def.tables = vec![
            Table::new("order", "JSONB").with_column(Column::new("total", "money").mapped("total")),
        ];
        let report = DefinitionValidator::validate(&def);
        assert_eq!(report.issues().len(), 2);

        let err = DomainError::InvalidDefinition(report);
        assert_eq!(err.to_string(), "Definition has 1 error(s)");
    }
}
