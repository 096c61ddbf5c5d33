//! Blocks: named bundles of template fragments.
//!
//! A block is addressed by an inverted-namespace identifier
//! (`io.pavedroad.http.routers.gorilla`). Its fragments are selected either
//! by trigger (an HTTP verb or event name, see [`Trigger`]) or listed flat
//! in `template-map` when they produce whole files.
//!
//! Blocks may import other blocks. Imports are declared by identifier and
//! replaced by owned copies when the registry loads the block, so a fully
//! loaded block is a self-contained tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::naming;
use crate::domain::value_objects::Trigger;

// ============================================================================
// Identity
// ============================================================================

/// Globally unique block identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

/// Where a block identifier points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLocator<'a> {
    /// `cache://host/path`: a document in the local cache directory.
    Cache { host: &'a str, path: &'a str },
    /// Any other `scheme://` identifier.
    Remote { scheme: &'a str, location: &'a str },
    /// Unscoped identifier: one of the built-in blocks.
    Builtin,
}

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn locator(&self) -> BlockLocator<'_> {
        match self.0.split_once("://") {
            Some(("cache", rest)) => {
                let rest = rest.trim_start_matches('/');
                let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
                BlockLocator::Cache { host, path }
            }
            Some((scheme, location)) => BlockLocator::Remote { scheme, location },
            None => BlockLocator::Builtin,
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// Function-extension sets
// ============================================================================

/// Closed registry of helper-function sets a fragment can render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionSet {
    /// Case conversion helpers.
    Strings,
}

impl FunctionSet {
    /// Resolve a symbolic set name. Accepts the legacy `stringFunctionMap()`
    /// spelling used by older block documents.
    pub fn lookup(name: &str) -> Option<Self> {
        match name.trim() {
            "strings" | "stringFunctionMap()" | "stringFunctionMap" => Some(Self::Strings),
            _ => None,
        }
    }

    /// Function names in this set.
    pub fn functions(self) -> &'static [&'static str] {
        match self {
            Self::Strings => &["ToUpper", "ToLower", "ToCamel", "ToSnake", "ToKebab"],
        }
    }

    /// Apply one function of this set to a string argument.
    pub fn apply(self, function: &str, input: &str) -> Option<String> {
        match (self, function) {
            (Self::Strings, "ToUpper") => Some(input.to_uppercase()),
            (Self::Strings, "ToLower") => Some(input.to_lowercase()),
            (Self::Strings, "ToCamel") => Some(naming::to_pascal_case(input)),
            (Self::Strings, "ToSnake") => Some(naming::to_snake_case(input)),
            (Self::Strings, "ToKebab") => Some(naming::to_kebab_case(input)),
            _ => None,
        }
    }
}

/// A fragment's function set as written in a block document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionSetRef {
    Direct(FunctionSet),
    Named(String),
}

impl FunctionSetRef {
    pub fn resolve(&self) -> Result<FunctionSet, DomainError> {
        match self {
            Self::Direct(set) => Ok(*set),
            Self::Named(name) => {
                FunctionSet::lookup(name).ok_or_else(|| DomainError::UnknownFunctionSet {
                    name: name.clone(),
                })
            }
        }
    }
}

// ============================================================================
// Fragments and mappings
// ============================================================================

/// How a fragment's output is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputType {
    /// Appended to the composition buffer.
    #[default]
    Bytes,
    /// Written to its own file.
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TemplateFragment {
    /// Template source, relative to the block's base directory.
    pub file_name: String,
    pub output_file_name: String,
    pub output_type: OutputType,
    pub executable: bool,
    pub function_set: Option<FunctionSetRef>,
    pub description: String,
}

impl TemplateFragment {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn with_functions(mut self, set: FunctionSet) -> Self {
        self.function_set = Some(FunctionSetRef::Direct(set));
        self
    }

    pub fn producing_file(mut self, output_file_name: impl Into<String>) -> Self {
        self.output_file_name = output_file_name.into();
        self.output_type = OutputType::File;
        self
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }

    /// Resolved function set, if any.
    pub fn functions(&self) -> Result<Option<FunctionSet>, DomainError> {
        self.function_set.as_ref().map(FunctionSetRef::resolve).transpose()
    }

    pub fn produces_file(&self) -> bool {
        self.output_type == OutputType::File && !self.output_file_name.is_empty()
    }
}

/// A set of triggers that select one fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerMapping {
    #[serde(alias = "http-methods", alias = "events", default)]
    pub triggers: Vec<Trigger>,
    pub template: TemplateFragment,
}

impl TriggerMapping {
    pub fn new<I, T>(triggers: I, template: TemplateFragment) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Trigger>,
    {
        Self {
            triggers: triggers.into_iter().map(Into::into).collect(),
            template,
        }
    }

    pub fn matches(&self, trigger: &Trigger) -> bool {
        self.triggers.contains(trigger)
    }
}

// ============================================================================
// Metadata
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockMetadata {
    pub labels: Vec<String>,
    pub tags: Vec<String>,
    pub information: BlockInformation,
}

impl BlockMetadata {
    /// Append labels that are not already present, keeping order.
    pub fn merge_labels<'a>(&mut self, labels: impl IntoIterator<Item = &'a String>) {
        for label in labels {
            if !self.labels.contains(label) {
                self.labels.push(label.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockInformation {
    pub title: String,
    pub description: String,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub author: String,
    pub organization: String,
    pub email: String,
    pub website: String,
    pub support: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UsageRights {
    pub terms_of_service: String,
    pub licenses: String,
    pub contribute_link: String,
    pub access_token: String,
}

// ============================================================================
// Block
// ============================================================================

/// Reference to an imported block; `block` is filled in at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedBlock {
    pub id: BlockId,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(skip)]
    pub block: Option<Box<Block>>,
}

impl ImportedBlock {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(id),
            labels: Vec::new(),
            block: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Block {
    pub id: BlockId,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub language: String,
    /// Root of this block's template files, relative to the cache directory.
    #[serde(default)]
    pub base_directory: String,
    /// Output directory for file-producing fragments.
    #[serde(default)]
    pub home_directory: String,
    #[serde(default)]
    pub home_filename: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub metadata: BlockMetadata,
    #[serde(default)]
    pub usage_rights: UsageRights,
    /// Import statements generated code needs when this block is used.
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<ImportedBlock>,
    #[serde(default)]
    pub http_mappings: Vec<TriggerMapping>,
    #[serde(default)]
    pub event_mappings: Vec<TriggerMapping>,
    #[serde(default)]
    pub template_map: Vec<TemplateFragment>,
}

impl Block {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(id),
            api_version: "v1".into(),
            kind: String::new(),
            family: String::new(),
            language: String::new(),
            base_directory: String::new(),
            home_directory: String::new(),
            home_filename: String::new(),
            environment: String::new(),
            metadata: BlockMetadata::default(),
            usage_rights: UsageRights::default(),
            imports: Vec::new(),
            blocks: Vec::new(),
            http_mappings: Vec::new(),
            event_mappings: Vec::new(),
            template_map: Vec::new(),
        }
    }

    /// First fragment mapped to `trigger`. HTTP mappings are searched before
    /// event mappings.
    pub fn fragment_for(&self, trigger: &Trigger) -> Option<&TemplateFragment> {
        self.http_mappings
            .iter()
            .chain(&self.event_mappings)
            .find(|m| m.matches(trigger))
            .map(|m| &m.template)
    }

    /// Template path of a fragment, relative to the cache root.
    pub fn template_path(&self, fragment: &TemplateFragment) -> String {
        let base = self.base_directory.trim_matches('/');
        let file = fragment.file_name.trim_start_matches('/');
        if base.is_empty() {
            file.to_string()
        } else {
            format!("{base}/{file}")
        }
    }

    /// Every fragment in the block, mapped or flat.
    pub fn fragments(&self) -> impl Iterator<Item = &TemplateFragment> {
        self.http_mappings
            .iter()
            .chain(&self.event_mappings)
            .map(|m| &m.template)
            .chain(&self.template_map)
    }

    /// Resolved imported blocks, in declaration order.
    pub fn imported(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter_map(|b| b.block.as_deref())
    }

    /// Import statements of this block and all resolved imports, depth-first.
    pub fn all_imports(&self) -> Vec<String> {
        let mut out = self.imports.clone();
        for child in self.imported() {
            out.extend(child.all_imports());
        }
        out
    }

    /// Check structural rules a block must satisfy before use.
    ///
    /// - the identifier is not empty
    /// - no trigger appears in more than one mapping
    /// - every named function set resolves
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::InvalidBlock {
                id: String::new(),
                reason: "block id is empty".into(),
            });
        }

        let mut seen: Vec<&Trigger> = Vec::new();
        for mapping in self.http_mappings.iter().chain(&self.event_mappings) {
            if mapping.template.file_name.trim().is_empty() {
                return Err(DomainError::InvalidBlock {
                    id: self.id.to_string(),
                    reason: "mapping has no template file".into(),
                });
            }
            for trigger in &mapping.triggers {
                if seen.contains(&trigger) {
                    return Err(DomainError::OverlappingTriggers {
                        block: self.id.to_string(),
                        trigger: trigger.to_string(),
                    });
                }
                seen.push(trigger);
            }
        }

        for fragment in self.fragments() {
            fragment.functions()?;
        }

        Ok(())
    }

    /// Replace every named function set with its resolved form.
    pub fn resolve_function_sets(&mut self) -> Result<(), DomainError> {
        let fragments = self
            .http_mappings
            .iter_mut()
            .chain(self.event_mappings.iter_mut())
            .map(|m| &mut m.template)
            .chain(self.template_map.iter_mut());
        for fragment in fragments {
            if let Some(set) = fragment.functions()? {
                fragment.function_set = Some(FunctionSetRef::Direct(set));
            }
        }
        Ok(())
    }
}
