// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Paver.
//!
//! Pure data and algorithms: the definition model and its validator, table
//! hierarchy reconstruction, schema emission, block structure and the
//! generation context. Reading files, rendering templates and writing
//! output all happen behind ports in the application layer.
//!
//! - **No I/O**: nothing here touches the filesystem
//! - **Errors as values**: validation returns a report, resolution returns
//!   `Result`
//! - **Owned trees**: table nodes and imported blocks own their children
pub mod entities;
pub mod error;
pub mod naming;
pub mod sample;
pub mod schema;
pub mod validation;
pub mod value_objects;

pub use entities::{
    block::{
        Block, BlockId, BlockInformation, BlockLocator, BlockMetadata, Contact, FunctionSet,
        FunctionSetRef, ImportedBlock, OutputType, TemplateFragment, TriggerMapping, UsageRights,
    },
    context::{GenerationContext, flatten_unique},
    definition::{
        BlockReference, Column, Definition, Endpoint, EndpointMethod, Info, Integration,
        Maintainer, Project, Table,
    },
    hierarchy::{TableNode, build_hierarchy},
    output::{
        ORGANIZATION_TOKEN, OutputTarget, PROJECT_TOKEN, PathTokens, Permissions, RenderedFile,
    },
};

pub use error::{DomainError, ErrorCategory};
pub use sample::{RandomSamples, SampleValueProvider};
pub use schema::{SchemaArtifacts, identifier_field, pretty_json};
pub use validation::{DefinitionIssue, DefinitionValidator, IssueCode, Severity, ValidationReport};
pub use value_objects::{LogicalType, TableType, Trigger};
