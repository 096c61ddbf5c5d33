//! In-memory model of a project definition.
//!
//! A definition describes one microservice: its identity (`info`), the
//! surrounding project metadata and integrations (`project`), and a flat list
//! of data tables linked by parent-name references (`tables`).
//!
//! The model is deliberately permissive. Names and types are plain strings
//! so that [`DefinitionValidator`](crate::domain::DefinitionValidator) can
//! report every defect at once instead of the parser failing on the first
//! unknown type. Documents are read by an adapter and are immutable once
//! loaded.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{LogicalType, TableType, Trigger};

/// A complete project definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Definition {
    pub tables: Vec<Table>,
    pub info: Info,
    pub project: Project,

    /// Path the definition was read from; set by the loader, not the document.
    #[serde(skip)]
    pub definition_file: Option<String>,
}

impl Definition {
    /// Integration entry by name (case-insensitive).
    pub fn integration(&self, name: &str) -> Option<&Integration> {
        self.project
            .integrations
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// `true` if an integration with this name is present and enabled.
    pub fn integration_enabled(&self, name: &str) -> bool {
        self.integration(name).is_some_and(|i| i.enable)
    }

    /// Table declaration by exact name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Tables with no parent reference.
    pub fn root_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|t| t.is_root())
    }
}

// ============================================================================
// Tables and columns
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(rename = "table-name", default)]
    pub name: String,

    #[serde(rename = "table-type", default)]
    pub table_type: String,

    /// Name of the parent table; empty for the root.
    #[serde(rename = "parent-tables", default)]
    pub parent: String,

    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, table_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_type: table_type.into(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.trim().is_empty()
    }

    pub fn kind(&self) -> Option<TableType> {
        TableType::parse(&self.table_type)
    }

    /// List-typed tables embed as arrays in their parent.
    pub fn is_list(&self) -> bool {
        self.kind() == Some(TableType::List)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub column_type: String,

    /// Marshalling modifiers, e.g. `omitempty`.
    #[serde(default)]
    pub modifiers: String,

    #[serde(rename = "mapped-name", default)]
    pub mapped_name: String,

    /// Validation constraints, copied into the field annotation.
    #[serde(default)]
    pub constraints: String,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            ..Self::default()
        }
    }

    pub fn mapped(mut self, mapped_name: impl Into<String>) -> Self {
        self.mapped_name = mapped_name.into();
        self
    }

    pub fn with_modifiers(mut self, modifiers: impl Into<String>) -> Self {
        self.modifiers = modifiers.into();
        self
    }

    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = constraints.into();
        self
    }

    pub fn logical_type(&self) -> Option<LogicalType> {
        LogicalType::parse(&self.column_type)
    }

    /// External name: the mapped name, or the lower-cased column name.
    pub fn external_name(&self) -> String {
        if self.mapped_name.trim().is_empty() {
            self.name.to_lowercase()
        } else {
            self.mapped_name.clone()
        }
    }
}

// ============================================================================
// Service identity
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Info {
    pub api_version: String,
    /// Blueprint the service is generated from.
    pub id: String,
    pub name: String,
    pub organization: String,
    pub release_status: String,
    pub version: String,
}

// ============================================================================
// Project metadata
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub top_level_domain: String,
    pub description: String,
    pub license: String,
    pub scheduler_name: String,
    pub maintainer: Maintainer,
    pub integrations: Vec<Integration>,
    pub kubernetes: KubeConfig,
    pub endpoints: Vec<Endpoint>,
    pub loggers: Vec<BlockReference>,
    pub blocks: Vec<BlockReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Maintainer {
    pub name: String,
    pub email: String,
    pub slack: String,
    pub web: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Integration {
    pub name: String,
    pub enable: bool,
    pub shields: Vec<String>,
    pub sonar_cloud_config: Option<SonarCloudConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonarCloudConfig {
    pub login: String,
    pub key: String,
    pub options: SonarOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SonarOptions {
    pub coverage: ReportToggle,
    pub go_sec: ReportToggle,
    pub lint: ReportToggle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportToggle {
    pub enable: bool,
    pub report: String,
}

/// Kubernetes probe and management endpoint names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubeConfig {
    pub namespace: String,
    pub liveness: String,
    pub readiness: String,
    pub metrics: String,
    pub management: String,
    pub explain: String,
}

/// An HTTP endpoint and the methods it serves. Methods double as triggers
/// for the route and handler blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    pub name: String,
    pub methods: Vec<EndpointMethod>,
}

impl Endpoint {
    pub fn triggers(&self) -> Vec<Trigger> {
        self.methods.iter().map(|m| Trigger::new(&m.method)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointMethod {
    pub method: String,
    #[serde(rename = "qp")]
    pub query_parameters: Vec<QueryParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParameter {
    pub name: String,
    pub datatype: String,
    pub description: String,
}

/// Reference from a definition to a block (logger or generic block).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockReference {
    pub id: String,
    pub name: String,
    pub labels: Vec<String>,
}
