//! Implementation of the `paver block` command.
//!
//! Loads one block through the registry (so imports, function sets and
//! labels are resolved exactly as during generation) and describes the
//! resulting tree.

use serde::Serialize;
use tracing::instrument;

use paver_core::domain::{Block, BlockId};

use crate::{
    cli::{BlockArgs, global::GlobalArgs},
    commands::{block_registry, cache_directory},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct MappingView {
    triggers: Vec<String>,
    template: String,
}

#[derive(Debug, Serialize)]
struct FileView {
    template: String,
    output: String,
    executable: bool,
}

/// Resolved block as shown to the user.
#[derive(Debug, Serialize)]
struct BlockView {
    id: String,
    kind: String,
    family: String,
    language: String,
    labels: Vec<String>,
    imports: Vec<String>,
    mappings: Vec<MappingView>,
    files: Vec<FileView>,
    blocks: Vec<BlockView>,
}

impl From<&Block> for BlockView {
    fn from(block: &Block) -> Self {
        let mappings = block
            .http_mappings
            .iter()
            .chain(&block.event_mappings)
            .map(|m| MappingView {
                triggers: m.triggers.iter().map(ToString::to_string).collect(),
                template: block.template_path(&m.template),
            })
            .collect();
        let files = block
            .template_map
            .iter()
            .filter(|f| f.produces_file())
            .map(|f| FileView {
                template: block.template_path(f),
                output: join_output(&block.home_directory, &f.output_file_name),
                executable: f.executable,
            })
            .collect();

        Self {
            id: block.id.to_string(),
            kind: block.kind.clone(),
            family: block.family.clone(),
            language: block.language.clone(),
            labels: block.metadata.labels.clone(),
            imports: block.imports.clone(),
            mappings,
            files,
            blocks: block.imported().map(BlockView::from).collect(),
        }
    }
}

#[instrument(skip_all, fields(block = %args.id))]
pub fn execute(
    args: BlockArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let id = args.id.trim();
    if id.is_empty() {
        return Err(CliError::InvalidInput {
            message: "block identifier is empty".into(),
            source: None,
        });
    }

    let cache = cache_directory(&global, &config)?;
    let block = block_registry(&cache).load_block(&BlockId::new(id), &args.labels)?;
    let view = BlockView::from(&block);

    if output.is_json() {
        return output.json(&view);
    }
    for line in describe(&view, 0) {
        output.print(&line)?;
    }
    Ok(())
}

fn join_output(directory: &str, file: &str) -> String {
    let directory = directory.trim_matches('/');
    if directory.is_empty() {
        file.to_string()
    } else {
        format!("{directory}/{file}")
    }
}

fn describe(view: &BlockView, depth: usize) -> Vec<String> {
    let pad = "  ".repeat(depth);
    let mut lines = Vec::new();

    let details: Vec<&str> = [&view.kind, &view.family, &view.language]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if details.is_empty() {
        lines.push(format!("{pad}{}", view.id));
    } else {
        lines.push(format!("{pad}{} ({})", view.id, details.join(", ")));
    }

    if !view.labels.is_empty() {
        lines.push(format!("{pad}  labels:  {}", view.labels.join(", ")));
    }
    if !view.imports.is_empty() {
        lines.push(format!("{pad}  imports: {}", view.imports.join(", ")));
    }
    for mapping in &view.mappings {
        lines.push(format!(
            "{pad}  {} -> {}",
            mapping.triggers.join(", "),
            mapping.template
        ));
    }
    for file in &view.files {
        let mode = if file.executable { " (executable)" } else { "" };
        lines.push(format!("{pad}  {} <- {}{mode}", file.output, file.template));
    }
    for child in &view.blocks {
        lines.extend(describe(child, depth + 1));
    }
    lines
}
