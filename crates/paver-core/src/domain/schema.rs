//! Type definitions and sample documents from a table tree.
//!
//! The emitter walks a [`TableNode`] tree depth-first. For each node it
//! writes one type block whose fields are, in order:
//!
//! 1. the synthetic identifier (root only), e.g. `OrderUUID string`
//! 2. one embedded field per child, singular or list by the child's flag
//! 3. one field per column, typed through [`LogicalType::marshal_type`]
//!
//! Child blocks are written before their parent's block, so every type is
//! declared before it is embedded. Sample documents follow the same shape:
//!
//! ```text
//! {
//! 	"orderuuid": "4c7e…",
//! 	"id": "k3J9sQ0aBv7LmZp",
//! 	"items": [ { "qty": 17 } ]
//! }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::entities::definition::Table;
use crate::domain::entities::hierarchy::TableNode;
use crate::domain::error::DomainError;
use crate::domain::naming::to_pascal_case;
use crate::domain::sample::SampleValueProvider;
use crate::domain::value_objects::LogicalType;

/// Everything the emitter produces for one tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaArtifacts {
    pub type_text: String,
    pub create_sample: Value,
    pub update_sample: Value,
    /// Imports the type text needs (e.g. `time`), deduplicated.
    pub imports: Vec<String>,
}

/// Name of the synthetic identifier field on the root document.
pub fn identifier_field(root: &str) -> String {
    format!("{}uuid", root.to_lowercase())
}

/// Emit type text and both sample documents.
pub fn emit(
    root: &TableNode,
    tables: &[Table],
    samples: &mut dyn SampleValueProvider,
) -> Result<SchemaArtifacts, DomainError> {
    let mut imports = Vec::new();
    let type_text = type_definitions(root, tables, &mut imports)?;
    let create_sample = sample_document(root, tables, samples)?;
    let update_sample = update_document(&create_sample, root, tables, samples)?;

    Ok(SchemaArtifacts {
        type_text,
        create_sample,
        update_sample,
        imports,
    })
}

/// Generate a fresh document and carry over the root identifier of
/// `previous`. Every other value is regenerated.
pub fn update_document(
    previous: &Value,
    root: &TableNode,
    tables: &[Table],
    samples: &mut dyn SampleValueProvider,
) -> Result<Value, DomainError> {
    let mut next = sample_document(root, tables, samples)?;
    let key = identifier_field(&root.name);
    if let (Some(id), Value::Object(fields)) = (previous.get(&key), &mut next) {
        fields.insert(key, id.clone());
    }
    Ok(next)
}

/// Build one sample document for the tree rooted at `root`.
pub fn sample_document(
    root: &TableNode,
    tables: &[Table],
    samples: &mut dyn SampleValueProvider,
) -> Result<Value, DomainError> {
    let mut fields = Map::new();
    if root.root {
        fields.insert(
            identifier_field(&root.name),
            samples.sample(LogicalType::Uuid),
        );
    }

    let table = lookup(tables, &root.name)?;
    for column in &table.columns {
        let ty = column
            .logical_type()
            .ok_or_else(|| unknown_type(table, &column.name, &column.column_type))?;
        fields.insert(column.external_name(), samples.sample(ty));
    }

    for child in &root.children {
        let nested = sample_document(child, tables, samples)?;
        let value = if child.is_list {
            Value::Array(vec![nested])
        } else {
            nested
        };
        fields.insert(child.name.to_lowercase(), value);
    }

    Ok(Value::Object(fields))
}

/// Type text for the whole tree, children first.
pub fn type_definitions(
    root: &TableNode,
    tables: &[Table],
    imports: &mut Vec<String>,
) -> Result<String, DomainError> {
    let mut out = String::new();
    for child in &root.children {
        out.push_str(&type_definitions(child, tables, imports)?);
    }

    let table = lookup(tables, &root.name)?;
    let exported = to_pascal_case(&root.name);

    out.push_str(&format!("// swagger:response {}\n", root.name));
    out.push_str(&format!("type {} struct {{\n", root.name));

    if root.root {
        out.push_str(&format!("\t// {exported}UUID into JSONB\n"));
        out.push_str(&format!(
            "\t{exported}UUID string `json:\"{}\"`\n",
            identifier_field(&root.name)
        ));
    }

    for child in &root.children {
        let field = to_pascal_case(&child.name);
        let list = if child.is_list { "[]" } else { "" };
        out.push_str(&format!("\t// {field} embedded\n"));
        out.push_str(&format!(
            "\t{field} {list}{} `json:\"{}\"`\n",
            child.name,
            child.name.to_lowercase()
        ));
    }

    for column in &table.columns {
        let ty = column
            .logical_type()
            .ok_or_else(|| unknown_type(table, &column.name, &column.column_type))?;
        if let Some(import) = ty.required_import() {
            if !imports.iter().any(|i| i == import) {
                imports.push(import.to_string());
            }
        }

        let field = to_pascal_case(&column.name);
        let mut tag = column.external_name();
        for extra in [&column.modifiers, &column.constraints] {
            if !extra.trim().is_empty() {
                tag.push(',');
                tag.push_str(extra.trim());
            }
        }
        out.push_str(&format!("\t// {field}\n"));
        out.push_str(&format!(
            "\t{field} {} `json:\"{tag}\"`\n",
            ty.marshal_type()
        ));
    }

    out.push_str("}\n\n");
    Ok(out)
}

/// Serialize a sample document with tab indentation.
pub fn pretty_json(value: &Value) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn lookup<'a>(tables: &'a [Table], name: &str) -> Result<&'a Table, DomainError> {
    tables
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| DomainError::UnreachableTables {
            names: vec![name.to_string()],
        })
}

fn unknown_type(table: &Table, column: &str, type_name: &str) -> DomainError {
    DomainError::UnknownColumnType {
        table: table.name.clone(),
        column: column.to_string(),
        type_name: type_name.to_string(),
    }
}
