//! Implementation of the `paver validate` command.
//!
//! Runs every definition check and, when those pass, builds the table
//! hierarchy, so anything `paver generate` would reject before rendering is
//! reported here first.

use serde::Serialize;
use tracing::instrument;

use paver_adapters::load_definition;
use paver_core::domain::{
    DefinitionIssue, DefinitionValidator, Severity, TableNode, build_hierarchy,
};

use crate::{
    cli::ValidateArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct IssueView<'a> {
    code: &'static str,
    severity: &'static str,
    table: &'a str,
    message: &'a str,
}

impl<'a> From<&'a DefinitionIssue> for IssueView<'a> {
    fn from(issue: &'a DefinitionIssue) -> Self {
        Self {
            code: issue.code.as_str(),
            severity: severity_name(issue.severity()),
            table: &issue.table,
            message: &issue.message,
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationView<'a> {
    definition: String,
    valid: bool,
    error_count: usize,
    issues: Vec<IssueView<'a>>,
    tables: Vec<&'a str>,
}

#[instrument(skip_all, fields(definition = %args.definition.display()))]
pub fn execute(args: ValidateArgs, output: OutputManager) -> CliResult<()> {
    let definition = load_definition(&args.definition)?;
    let report = DefinitionValidator::validate(&definition);

    let tree = if report.is_valid() {
        Some(build_hierarchy(&definition.tables).map_err(paver_core::error::PaverError::from)?)
    } else {
        None
    };

    if output.is_json() {
        output.json(&ValidationView {
            definition: args.definition.display().to_string(),
            valid: report.is_valid(),
            error_count: report.error_count(),
            issues: report.issues().iter().map(IssueView::from).collect(),
            tables: tree.as_ref().map(TableNode::names).unwrap_or_default(),
        })?;
    } else {
        for issue in report.issues() {
            match issue.severity() {
                Severity::Error => output.error(&issue.to_string())?,
                Severity::Warning => output.warning(&issue.to_string())?,
            }
        }
        if let Some(tree) = &tree {
            output.header("Table hierarchy:")?;
            for line in tree_lines(tree) {
                output.print(&line)?;
            }
            output.success(&format!(
                "{} is valid ({} table(s))",
                args.definition.display(),
                tree.count()
            ))?;
        }
    }

    if report.is_valid() {
        Ok(())
    } else {
        Err(CliError::ValidationFailed {
            path: args.definition,
            errors: report.error_count(),
        })
    }
}

fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

/// Indented tree, one table per line; list children are marked `[]`.
fn tree_lines(root: &TableNode) -> Vec<String> {
    fn walk(node: &TableNode, depth: usize, out: &mut Vec<String>) {
        let marker = if node.is_list { "[]" } else { "" };
        out.push(format!("{}{}{marker}", "  ".repeat(depth + 1), node.name));
        for child in &node.children {
            walk(child, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_lines_indent_children() {
        let tree = TableNode {
            name: "invoice".into(),
            root: true,
            is_list: false,
            children: vec![TableNode {
                name: "lines".into(),
                root: false,
                is_list: true,
                children: Vec::new(),
            }],
        };
        assert_eq!(tree_lines(&tree), vec!["  invoice", "    lines[]"]);
    }
}
