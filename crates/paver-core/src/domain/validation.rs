//! Definition validation.
//!
//! Validation never stops at the first defect. Every table and column is
//! checked and each problem becomes one [`DefinitionIssue`] in the returned
//! [`ValidationReport`]. The caller decides what to do with the report; the
//! orchestrator refuses to generate anything while
//! [`ValidationReport::error_count`] is non-zero.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::definition::{Column, Definition, Table};
use crate::domain::value_objects::{LogicalType, TableType};

/// Longest accepted table name.
pub const MAX_TABLE_NAME_LEN: usize = 60;

/// Service name shipped in sample definitions.
pub const DEFAULT_SERVICE_NAME: &str = "yourMicroserviceName";

/// Organization used by the sample definitions' CI account.
pub const DEMO_ORGANIZATION: &str = "acme-demo";

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]*$").expect("name pattern is valid"));

// ============================================================================
// Issues
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    InvalidTableName,
    DuplicateTableName,
    InvalidTableType,
    NoParent,
    InvalidColumnName,
    InvalidColumnType,
    NoMappedName,
    InvalidServiceName,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidTableName => "INVALID_TABLE_NAME",
            Self::DuplicateTableName => "DUPLICATE_TABLE_NAME",
            Self::InvalidTableType => "INVALID_TABLE_TYPE",
            Self::NoParent => "NO_PARENT",
            Self::InvalidColumnName => "INVALID_COLUMN_NAME",
            Self::InvalidColumnType => "INVALID_COLUMN_TYPE",
            Self::NoMappedName => "NO_MAPPED_NAME",
            Self::InvalidServiceName => "INVALID_SERVICE_NAME",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::NoMappedName | Self::InvalidServiceName => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether the issue blocks generation. A missing mapped name is a
    /// warning but still counts; the service-name notice does not.
    pub fn counts_toward_total(self) -> bool {
        !matches!(self, Self::InvalidServiceName)
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One problem found in a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionIssue {
    pub code: IssueCode,
    pub message: String,
    /// Table the issue belongs to; empty for definition-level issues.
    pub table: String,
}

impl DefinitionIssue {
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DefinitionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.table.is_empty() {
            write!(f, "[{}] {}", self.code, self.message)
        } else {
            write!(f, "[{}] table '{}': {}", self.code, self.table, self.message)
        }
    }
}

/// Every issue found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<DefinitionIssue>,
}

impl ValidationReport {
    fn push(&mut self, code: IssueCode, message: impl Into<String>, table: impl Into<String>) {
        self.issues.push(DefinitionIssue {
            code,
            message: message.into(),
            table: table.into(),
        });
    }

    pub fn issues(&self) -> &[DefinitionIssue] {
        &self.issues
    }

    /// Number of issues that block generation.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.code.counts_toward_total())
            .count()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn with_code(&self, code: IssueCode) -> impl Iterator<Item = &DefinitionIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Checks a [`Definition`] and collects all of its problems.
pub struct DefinitionValidator;

impl DefinitionValidator {
    pub fn validate(definition: &Definition) -> ValidationReport {
        let mut report = ValidationReport::default();

        if definition.info.name == DEFAULT_SERVICE_NAME
            && definition.info.organization == DEMO_ORGANIZATION
        {
            report.push(
                IssueCode::InvalidServiceName,
                "rename the sample service before publishing CI results",
                "",
            );
        }

        // Names are compared case-insensitively; generated type names differ
        // only in case and would collide.
        let mut seen = HashSet::new();
        for table in &definition.tables {
            if !table.name.is_empty() && !seen.insert(table.name.to_lowercase()) {
                report.push(
                    IssueCode::DuplicateTableName,
                    format!("table name [{}] is declared more than once", table.name),
                    &table.name,
                );
            }
            Self::validate_table(definition, table, &mut report);
            for column in &table.columns {
                Self::validate_column(table, column, &mut report);
            }
        }

        report
    }

    fn validate_table(definition: &Definition, table: &Table, report: &mut ValidationReport) {
        if table.name.is_empty() {
            report.push(IssueCode::InvalidTableName, "missing table name", "");
        } else {
            if table.name.len() > MAX_TABLE_NAME_LEN {
                report.push(
                    IssueCode::InvalidTableName,
                    format!("table name longer than {MAX_TABLE_NAME_LEN} characters"),
                    &table.name,
                );
            }
            if !NAME_PATTERN.is_match(&table.name) {
                report.push(
                    IssueCode::InvalidTableName,
                    format!("bad table name [{}]", table.name),
                    &table.name,
                );
            }
        }

        if table.is_root() {
            if TableType::parse(&table.table_type).is_none() {
                report.push(
                    IssueCode::InvalidTableType,
                    format!(
                        "bad table type [{}], expected JSONB, OBJECT or LIST",
                        table.table_type
                    ),
                    &table.name,
                );
            }
        } else if definition.table(&table.parent).is_none() {
            report.push(
                IssueCode::NoParent,
                format!("parent table not found [{}]", table.parent),
                &table.name,
            );
        }
    }

    fn validate_column(table: &Table, column: &Column, report: &mut ValidationReport) {
        if column.name.is_empty() {
            report.push(IssueCode::InvalidColumnName, "missing column name", &table.name);
        } else if !NAME_PATTERN.is_match(&column.name) {
            report.push(
                IssueCode::InvalidColumnName,
                format!("bad column name [{}]", column.name),
                &table.name,
            );
        }

        if LogicalType::parse(&column.column_type).is_none() {
            report.push(
                IssueCode::InvalidColumnType,
                format!("invalid column type [{}]", column.column_type),
                &table.name,
            );
        }

        if column.mapped_name.trim().is_empty() {
            report.push(
                IssueCode::NoMappedName,
                format!(
                    "column [{}] has no mapped name, using [{}]",
                    column.name,
                    column.external_name()
                ),
                &table.name,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::definition::{Column, Table};

    fn valid_definition() -> Definition {
        let mut def = Definition::default();
        def.info.name = "billing".into();
        def.info.organization = "acme".into();
        def.tables = vec![
            Table::new("order", "JSONB").with_column(Column::new("id", "string").mapped("id")),
            Table::new("items", "LIST")
                .with_parent("order")
                .with_column(Column::new("qty", "integer").mapped("qty")),
        ];
        def
    }

    #[test]
    fn clean_definition_has_no_issues() {
        let report = DefinitionValidator::validate(&valid_definition());
        assert!(report.is_empty(), "{:?}", report.issues());
        assert!(report.is_valid());
    }

    #[test]
    fn reports_every_defect() {
        let mut def = valid_definition();
        def.tables.push(Table::new("bad name!", "LIST").with_parent("order"));
        def.tables.push(Table::new("bad$name", "LIST").with_parent("order"));
        def.tables[0].columns.push(Column::new("a", "varchar").mapped("a"));
        def.tables[0].columns.push(Column::new("b", "decimal").mapped("b"));
        def.tables[1].columns.push(Column::new("c", "blob").mapped("c"));

        let report = DefinitionValidator::validate(&def);
        assert!(report.error_count() >= 5);
        assert_eq!(report.with_code(IssueCode::InvalidTableName).count(), 2);
        assert_eq!(report.with_code(IssueCode::InvalidColumnType).count(), 3);
    }

    #[test]
    fn root_table_needs_known_type() {
        let mut def = valid_definition();
        def.tables[0].table_type = "TABLE".into();
        let report = DefinitionValidator::validate(&def);
        assert_eq!(report.with_code(IssueCode::InvalidTableType).count(), 1);
    }

    #[test]
    fn child_type_is_not_checked() {
        let mut def = valid_definition();
        def.tables[1].table_type = String::new();
        assert!(DefinitionValidator::validate(&def).is_valid());
    }

    #[test]
    fn missing_parent() {
        let mut def = valid_definition();
        def.tables[1].parent = "orders".into();
        let report = DefinitionValidator::validate(&def);
        let issue = report.with_code(IssueCode::NoParent).next().unwrap();
        assert_eq!(issue.table, "items");
        assert!(issue.message.contains("orders"));
    }

    #[test]
    fn long_table_name() {
        let mut def = valid_definition();
        def.tables[0].name = "x".repeat(MAX_TABLE_NAME_LEN + 1);
        def.tables[1].parent = def.tables[0].name.clone();
        let report = DefinitionValidator::validate(&def);
        assert_eq!(report.with_code(IssueCode::InvalidTableName).count(), 1);
    }

    #[test]
    fn missing_mapped_name_is_a_counted_warning() {
        let mut def = valid_definition();
        def.tables[0].columns[0].mapped_name = String::new();
        let report = DefinitionValidator::validate(&def);
        let issue = report.with_code(IssueCode::NoMappedName).next().unwrap();
        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(report.error_count(), 1);
        assert!(!report.is_valid());
    }

    #[test]
    fn sample_service_name_is_reported_but_not_counted() {
        let mut def = valid_definition();
        def.info.name = DEFAULT_SERVICE_NAME.into();
        def.info.organization = DEMO_ORGANIZATION.into();
        let report = DefinitionValidator::validate(&def);
        assert_eq!(report.len(), 1);
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn missing_names() {
        let mut def = valid_definition();
        def.tables[1].columns.push(Column::new("", "string").mapped("x"));
        def.tables.push(Table::new("", "JSONB"));
        let report = DefinitionValidator::validate(&def);
        assert_eq!(report.with_code(IssueCode::InvalidColumnName).count(), 1);
        assert_eq!(report.with_code(IssueCode::InvalidTableName).count(), 1);
    }

    #[test]
    fn duplicate_table_names_are_errors() {
        let mut def = valid_definition();
        def.tables.push(
            Table::new("Items", "OBJECT")
                .with_parent("order")
                .with_column(Column::new("sku", "string").mapped("sku")),
        );
        let report = DefinitionValidator::validate(&def);
        let dupes: Vec<_> = report.with_code(IssueCode::DuplicateTableName).collect();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].table, "Items");
        assert_eq!(dupes[0].severity(), Severity::Error);
        assert_eq!(report.error_count(), 1);
    }
}
