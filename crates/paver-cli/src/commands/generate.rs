//! Implementation of the `paver generate` command.
//!
//! Responsibility: resolve the definition, cache and output locations, wire
//! the adapters into a `GenerateService`, and display results.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use paver_adapters::{DirectoryBlueprintStore, LocalFilesystem, MiniJinjaRenderer, load_definition};
use paver_core::application::{
    BlockComposer, GenerateRequest, GenerateService, GenerationReport, Materializer,
};

use crate::{
    cli::{GenerateArgs, global::GlobalArgs},
    commands::{block_registry, cache_directory},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Machine-readable summary of a run.
#[derive(Debug, Serialize)]
struct GenerateSummary<'a> {
    output: &'a Path,
    written: &'a [PathBuf],
    preserved: &'a [PathBuf],
    imports: &'a [String],
    warnings: Vec<String>,
}

/// Execute the `paver generate` command.
///
/// 1. Load the definition
/// 2. Resolve the cache, output directory, blueprint and seed
/// 3. Run the generation pipeline
/// 4. Report written and preserved files
#[instrument(skip_all, fields(definition = %args.definition.display()))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Definition
    let definition = load_definition(&args.definition)?;

    // 2. Locations and overrides (flag, then config)
    let cache = cache_directory(&global, &config)?;
    let output_dir = args
        .output
        .unwrap_or_else(|| config.generation.output_dir.clone());
    let blueprint = args.blueprint.or_else(|| config.generation.blueprint.clone());
    let seed = args.seed.or(config.generation.seed);

    let mut request = GenerateRequest::new(definition);
    if let Some(blueprint) = blueprint {
        request = request.with_blueprint(blueprint);
    }
    if let Some(seed) = seed {
        request = request.with_seed(seed);
    }

    // 3. Wire adapters and generate
    let service = GenerateService::new(
        block_registry(&cache),
        BlockComposer::new(Box::new(MiniJinjaRenderer::new(cache.root()))),
        Box::new(DirectoryBlueprintStore::new(cache.root())),
        Materializer::new(Box::new(LocalFilesystem::new()), &output_dir),
    );

    let spinner = output.spinner(&format!("Generating into {}", output_dir.display()));
    let result = service.generate(request);
    spinner.finish_and_clear();
    let report = result?;

    info!(
        output = %output_dir.display(),
        files = report.file_count(),
        "Generation finished"
    );

    // 4. Report
    print_report(&report, &output_dir, &output)
}

fn print_report(report: &GenerationReport, output_dir: &Path, output: &OutputManager) -> CliResult<()> {
    let warnings: Vec<String> = report
        .validation
        .issues()
        .iter()
        .map(ToString::to_string)
        .collect();

    if output.is_json() {
        return output.json(&GenerateSummary {
            output: output_dir,
            written: &report.written,
            preserved: &report.preserved,
            imports: &report.imports,
            warnings,
        });
    }

    for warning in &warnings {
        output.warning(warning)?;
    }
    for path in &report.written {
        output.print(&format!("  created   {}", display_relative(path, output_dir)))?;
    }
    for path in &report.preserved {
        output.print(&format!("  kept      {}", display_relative(path, output_dir)))?;
    }
    output.success(&format!(
        "Generated {} file(s) in {}",
        report.written.len(),
        output_dir.display()
    ))?;
    if !report.preserved.is_empty() {
        output.info(&format!(
            "{} existing hook file(s) left unchanged",
            report.preserved.len()
        ))?;
    }
    Ok(())
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
