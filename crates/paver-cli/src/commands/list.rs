//! Implementation of the `paver list` command.

use serde::Serialize;

use paver_adapters::{DirectoryBlueprintStore, builtin_blocks};
use paver_core::application::BlueprintStore;

use crate::{
    cli::{ListArgs, global::GlobalArgs},
    commands::cache_directory,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct BuiltinView {
    id: String,
    kind: String,
    title: String,
}

#[derive(Debug, Serialize)]
struct ListView {
    cache: String,
    blueprints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocks: Option<Vec<BuiltinView>>,
}

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let cache = cache_directory(&global, &config)?;
    let blueprints = DirectoryBlueprintStore::new(cache.root()).list()?;

    let blocks = args.blocks.then(|| {
        builtin_blocks()
            .into_iter()
            .map(|b| BuiltinView {
                id: b.id.to_string(),
                kind: b.kind,
                title: b.metadata.information.title,
            })
            .collect::<Vec<_>>()
    });

    if output.is_json() {
        return output.json(&ListView {
            cache: cache.root().display().to_string(),
            blueprints,
            blocks,
        });
    }

    if blueprints.is_empty() {
        output.warning(&format!("No blueprints found in {}", cache.root().display()))?;
    } else {
        output.header("Blueprints:")?;
        for name in &blueprints {
            output.print(&format!("  {name}"))?;
        }
    }

    if let Some(blocks) = blocks {
        output.header("Built-in blocks:")?;
        for block in &blocks {
            output.print(&format!("  {:<42} {}", block.id, block.kind))?;
        }
    }
    Ok(())
}
