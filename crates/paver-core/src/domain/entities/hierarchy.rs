//! Table hierarchy reconstruction.
//!
//! Definitions list tables flat, each naming its parent. Code generation
//! needs the tree: one root, children in declaration order, each child
//! embedded as an object or a list.

use crate::domain::entities::definition::Table;
use crate::domain::error::DomainError;

/// A node in the table tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNode {
    pub name: String,
    pub root: bool,
    pub is_list: bool,
    pub children: Vec<TableNode>,
}

impl TableNode {
    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TableNode::count).sum::<usize>()
    }

    /// Pre-order traversal of node names.
    pub fn names(&self) -> Vec<&str> {
        let mut out = vec![self.name.as_str()];
        for child in &self.children {
            out.extend(child.names());
        }
        out
    }

    pub fn find(&self, name: &str) -> Option<&TableNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// Build the table tree from a flat declaration list.
///
/// Exactly one table may have an empty parent. Siblings keep declaration
/// order. A table reachable from itself (possible only through duplicate
/// names) is reported instead of recursing, as are tables that no path from
/// the root reaches.
pub fn build_hierarchy(tables: &[Table]) -> Result<TableNode, DomainError> {
    let roots: Vec<&Table> = tables.iter().filter(|t| t.is_root()).collect();

    let root = match roots.as_slice() {
        [] => return Err(DomainError::NoRootTable),
        [only] => *only,
        many => {
            return Err(DomainError::MultipleRootTables {
                names: many.iter().map(|t| t.name.clone()).collect(),
            });
        }
    };

    let mut path = Vec::new();
    let tree = attach(tables, root, true, &mut path)?;

    if tree.count() != tables.len() {
        let reached = tree.names();
        let missing: Vec<String> = tables
            .iter()
            .filter(|t| !reached.contains(&t.name.as_str()))
            .map(|t| t.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::UnreachableTables { names: missing });
        }
    }

    Ok(tree)
}

fn attach<'a>(
    tables: &'a [Table],
    table: &'a Table,
    root: bool,
    path: &mut Vec<&'a str>,
) -> Result<TableNode, DomainError> {
    path.push(table.name.as_str());

    let mut children = Vec::new();
    for child in tables.iter().filter(|t| !t.is_root() && t.parent == table.name) {
        if path.contains(&child.name.as_str()) {
            return Err(DomainError::HierarchyCycle {
                table: child.name.clone(),
            });
        }
        children.push(attach(tables, child, false, path)?);
    }

    path.pop();

    Ok(TableNode {
        name: table.name.clone(),
        root,
        is_list: table.is_list(),
        children,
    })
}
