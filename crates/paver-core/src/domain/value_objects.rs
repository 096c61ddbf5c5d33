//! Small closed vocabularies used by definitions and blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Logical column types
// ============================================================================

/// Column type as written in a definition.
///
/// Each logical type maps to exactly one marshalling type (the type that
/// appears in generated source) and one sample category (quoted or bare in
/// sample documents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    String,
    Boolean,
    Number,
    Int,
    Integer,
    Uint,
    Byte,
    Rune,
    Float,
    Float32,
    Float64,
    Uuid,
    Time,
    Timestamp,
}

impl LogicalType {
    pub const ALL: &'static [LogicalType] = &[
        Self::String,
        Self::Boolean,
        Self::Number,
        Self::Int,
        Self::Integer,
        Self::Uint,
        Self::Byte,
        Self::Rune,
        Self::Float,
        Self::Float32,
        Self::Float64,
        Self::Uuid,
        Self::Time,
        Self::Timestamp,
    ];

    /// Case-insensitive lookup.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Int => "int",
            Self::Integer => "integer",
            Self::Uint => "uint",
            Self::Byte => "byte",
            Self::Rune => "rune",
            Self::Float => "float",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Uuid => "uuid",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
        }
    }

    /// Type used for the field in generated type definitions.
    pub fn marshal_type(self) -> &'static str {
        match self {
            Self::String | Self::Uuid => "string",
            Self::Boolean => "bool",
            Self::Number | Self::Int | Self::Integer => "int",
            Self::Uint => "uint",
            Self::Byte | Self::Rune => "byte",
            Self::Float | Self::Float64 => "float64",
            Self::Float32 => "float32",
            Self::Time | Self::Timestamp => "time.Time",
        }
    }

    /// Whether sample values of this type are written as JSON strings.
    pub fn is_quoted(self) -> bool {
        matches!(
            self,
            Self::String | Self::Byte | Self::Rune | Self::Uuid | Self::Time | Self::Timestamp
        )
    }

    /// Import the generated source needs for this type, if any.
    pub fn required_import(self) -> Option<&'static str> {
        match self {
            Self::Time | Self::Timestamp => Some("time"),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Table types
// ============================================================================

/// Storage shape of a table. Root tables must declare one; children use it
/// only to pick list versus object embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableType {
    Jsonb,
    Object,
    List,
}

impl TableType {
    /// Case-insensitive lookup.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "JSONB" => Some(Self::Jsonb),
            "OBJECT" => Some(Self::Object),
            "LIST" => Some(Self::List),
            _ => None,
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Jsonb => "JSONB",
            Self::Object => "OBJECT",
            Self::List => "LIST",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Triggers
// ============================================================================

const HTTP_VERBS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "TRACE", "CONNECT", "LIST",
];

/// Selection key for a block's template mappings: an HTTP verb or an event
/// name.
///
/// HTTP verbs (plus the pseudo-verb `LIST` for collection reads) are
/// normalised to upper case; event names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Trigger(String);

impl Trigger {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        let upper = raw.to_ascii_uppercase();
        if HTTP_VERBS.contains(&upper.as_str()) {
            Self(upper)
        } else {
            Self(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_http_verb(&self) -> bool {
        HTTP_VERBS.contains(&self.0.as_str())
    }
}

impl From<String> for Trigger {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Trigger {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Trigger> for String {
    fn from(t: Trigger) -> Self {
        t.0
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_type_lookup() {
        assert_eq!(LogicalType::parse("integer"), Some(LogicalType::Integer));
        assert_eq!(LogicalType::parse("Integer"), Some(LogicalType::Integer));
        assert_eq!(LogicalType::parse("varchar"), None);
    }

    #[test]
    fn marshal_and_quoting() {
        assert_eq!(LogicalType::Integer.marshal_type(), "int");
        assert!(!LogicalType::Integer.is_quoted());
        assert_eq!(LogicalType::Timestamp.marshal_type(), "time.Time");
        assert!(LogicalType::Timestamp.is_quoted());
        assert!(LogicalType::Uuid.is_quoted());
        assert!(!LogicalType::Boolean.is_quoted());
    }

    #[test]
    fn table_type_is_case_insensitive() {
        assert_eq!(TableType::parse("jsonb"), Some(TableType::Jsonb));
        assert_eq!(TableType::parse("List"), Some(TableType::List));
        assert_eq!(TableType::parse("array"), None);
    }

    #[test]
    fn http_triggers_are_upper_cased() {
        assert_eq!(Trigger::new("get").as_str(), "GET");
        assert!(Trigger::new("get").is_http_verb());
        assert_eq!(Trigger::new("order.created").as_str(), "order.created");
        assert!(!Trigger::new("order.created").is_http_verb());
    }
}
