//! Generate Service - main application orchestrator.
//!
//! This service drives one generation run:
//! 1. Validate the definition (all issues, not just the first)
//! 2. Build the table hierarchy
//! 3. Emit type definitions and sample documents
//! 4. Build the generation context
//! 5. Compose endpoint code from the route, handler and hook blocks
//! 6. Load logger and project blocks, collecting their imports
//! 7. Render blueprint and block files
//! 8. Materialize everything under the output root
//!
//! Nothing is written unless steps 1-7 succeed.

use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::BlueprintStore,
        services::{BlockComposer, BlockRegistry, Materializer, SaveOutcome},
    },
    domain::{
        Block, BlockId, Definition, DefinitionValidator, DomainError, GenerationContext,
        OutputTarget, RandomSamples, RenderedFile, Severity,
        ValidationReport, build_hierarchy, flatten_unique, pretty_json, schema,
    },
    error::{PaverError, PaverResult},
};

/// Directory sample documents are written to.
pub const SAMPLE_DIRECTORY: &str = "dev";
/// Create-sample file name before token substitution.
pub const POST_SAMPLE_FILE: &str = "template-post.json";
/// Update-sample file name before token substitution.
pub const PUT_SAMPLE_FILE: &str = "template-put.json";

/// Blocks that turn endpoint declarations into code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointBlocks {
    pub routes: BlockId,
    pub handlers: BlockId,
    pub hooks: BlockId,
}

impl Default for EndpointBlocks {
    fn default() -> Self {
        Self {
            routes: BlockId::new("io.pavedroad.http.routers.gorilla"),
            handlers: BlockId::new("io.pavedroad.http.methods.gorilla"),
            hooks: BlockId::new("io.pavedroad.http.hooks.gorilla"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub definition: Definition,
    /// Overrides `info.id` as the blueprint name.
    pub blueprint: Option<String>,
    /// Seed for reproducible sample documents.
    pub seed: Option<u64>,
}

impl GenerateRequest {
    pub fn new(definition: Definition) -> Self {
        Self {
            definition,
            blueprint: None,
            seed: None,
        }
    }

    pub fn with_blueprint(mut self, blueprint: impl Into<String>) -> Self {
        self.blueprint = Some(blueprint.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Summary of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    /// Hook files that already existed and were left alone.
    pub preserved: Vec<PathBuf>,
    /// Deduplicated import statements, in first-seen order.
    pub imports: Vec<String>,
    /// Warnings found during validation.
    pub validation: ValidationReport,
}

impl GenerationReport {
    pub fn file_count(&self) -> usize {
        self.written.len() + self.preserved.len()
    }
}

/// Main generation service.
pub struct GenerateService {
    registry: BlockRegistry,
    composer: BlockComposer,
    blueprints: Box<dyn BlueprintStore>,
    materializer: Materializer,
    endpoint_blocks: EndpointBlocks,
}

impl GenerateService {
    pub fn new(
        registry: BlockRegistry,
        composer: BlockComposer,
        blueprints: Box<dyn BlueprintStore>,
        materializer: Materializer,
    ) -> Self {
        Self {
            registry,
            composer,
            blueprints,
            materializer,
            endpoint_blocks: EndpointBlocks::default(),
        }
    }

    pub fn with_endpoint_blocks(mut self, blocks: EndpointBlocks) -> Self {
        self.endpoint_blocks = blocks;
        self
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Validate a definition without generating anything.
    pub fn validate(&self, definition: &Definition) -> ValidationReport {
        DefinitionValidator::validate(definition)
    }

    /// Run the whole pipeline for one definition.
    #[instrument(
        skip_all,
        fields(
            service = %request.definition.info.name,
            tables = request.definition.tables.len(),
            output = %self.materializer.root().display()
        )
    )]
    pub fn generate(&self, request: GenerateRequest) -> PaverResult<GenerationReport> {
        let definition = &request.definition;

        // 1. Validate
        let report = self.validate(definition);
        for issue in report.issues().iter().filter(|i| i.severity() == Severity::Warning) {
            warn!(code = issue.code.as_str(), "{}", issue.message);
        }
        if !report.is_valid() {
            return Err(DomainError::InvalidDefinition(report).into());
        }

        // 2. Hierarchy
        let tree = build_hierarchy(&definition.tables)?;
        info!(root = %tree.name, nodes = tree.count(), "Table hierarchy built");

        // 3. Schema artifacts
        let mut samples = match request.seed {
            Some(seed) => RandomSamples::seeded(seed),
            None => RandomSamples::new(),
        };
        let artifacts = schema::emit(&tree, &definition.tables, &mut samples)?;

        // 4. Context
        let mut context = GenerationContext::from_definition(definition);
        if let Some(blueprint) = &request.blueprint {
            context.blueprint = blueprint.clone();
        }
        context.generated_types = artifacts.type_text;
        context.post_json = to_json(&artifacts.create_sample)?;
        context.put_json = to_json(&artifacts.update_sample)?;

        let mut imports = artifacts.imports;

        // 5. Endpoints
        self.compose_endpoints(definition, &mut context, &mut imports)?;

        // 6. Loggers and project blocks
        for logger in &definition.project.loggers {
            let block = self.registry.load_block(&BlockId::new(&logger.id), &logger.labels)?;
            imports.extend(block.all_imports());
        }
        let mut project_blocks: Vec<Block> = Vec::with_capacity(definition.project.blocks.len());
        for reference in &definition.project.blocks {
            let block = self
                .registry
                .load_block(&BlockId::new(&reference.id), &reference.labels)?;
            imports.extend(block.all_imports());
            project_blocks.push(block);
        }
        context.set_imports(&imports);

        // 7. Render
        let mut files = self.render_blueprint(&context)?;
        for block in &project_blocks {
            files.extend(self.composer.render_files(block, &context)?);
        }
        files.push(RenderedFile::new(
            OutputTarget::new(SAMPLE_DIRECTORY, POST_SAMPLE_FILE),
            context.post_json.clone(),
        ));
        files.push(RenderedFile::new(
            OutputTarget::new(SAMPLE_DIRECTORY, PUT_SAMPLE_FILE),
            context.put_json.clone(),
        ));

        // 8. Materialize
        let mut generation = GenerationReport {
            imports: flatten_unique(&imports),
            validation: report,
            ..GenerationReport::default()
        };
        for file in &files {
            match self.materializer.save(&file.content, &file.target, &context)? {
                SaveOutcome::Written(path) => generation.written.push(path),
                SaveOutcome::Preserved(path) => generation.preserved.push(path),
            }
        }

        info!(
            written = generation.written.len(),
            preserved = generation.preserved.len(),
            "Generation completed"
        );
        Ok(generation)
    }

    // ------------------------------------------------------------------------
    // Internal Helpers
    // ------------------------------------------------------------------------

    fn compose_endpoints(
        &self,
        definition: &Definition,
        context: &mut GenerationContext,
        imports: &mut Vec<String>,
    ) -> PaverResult<()> {
        let endpoints = &definition.project.endpoints;
        if endpoints.is_empty() {
            return Ok(());
        }

        let routes = self.registry.load_block(&self.endpoint_blocks.routes, &[])?;
        let handlers = self.registry.load_block(&self.endpoint_blocks.handlers, &[])?;
        let hooks = self.registry.load_block(&self.endpoint_blocks.hooks, &[])?;

        let (mut route_code, mut handler_code, mut hook_code) =
            (String::new(), String::new(), String::new());
        for endpoint in endpoints {
            let triggers = endpoint.triggers();
            let name = Some(endpoint.name.as_str());
            for (block, out) in [
                (&routes, &mut route_code),
                (&handlers, &mut handler_code),
                (&hooks, &mut hook_code),
            ] {
                let composition = self.composer.generate(&triggers, block, context, name)?;
                out.push_str(&composition.output);
                imports.extend(composition.imports);
            }
            info!(endpoint = %endpoint.name, methods = triggers.len(), "Endpoint composed");
        }

        context.endpoint_routes = route_code;
        context.endpoint_handlers = handler_code;
        context.endpoint_hooks = hook_code;
        Ok(())
    }

    fn render_blueprint(&self, context: &GenerationContext) -> PaverResult<Vec<RenderedFile>> {
        let name = context.blueprint.trim();
        if name.is_empty() {
            warn!("No blueprint named; only block files and samples are generated");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for file in self.blueprints.files(name)? {
            let content = self.composer.render_template(&file.template, context)?;
            let target = OutputTarget::new(file.directory, file.file_name).executable(file.executable);
            files.push(RenderedFile::new(target, content));
        }
        info!(blueprint = name, files = files.len(), "Blueprint rendered");
        Ok(files)
    }
}

fn to_json(value: &serde_json::Value) -> PaverResult<String> {
    pretty_json(value).map_err(|e| {
        PaverError::from(ApplicationError::Serialization {
            reason: e.to_string(),
        })
    })
}
