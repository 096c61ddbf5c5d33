//! Block Registry - loads blocks by identifier and resolves their imports.
//!
//! Identifiers dispatch on their scheme:
//!
//! | Identifier | Source |
//! |------------|--------|
//! | `cache://host/path` | [`BlockStore`] (local cache directory) |
//! | `https://…`, `git://…` | not fetched; an empty declaration is returned |
//! | `io.pavedroad.http.routers.gorilla` | built-in table |
//!
//! Imports are resolved eagerly and depth-first. A block that is already
//! being resolved further up the chain is an import cycle; a block that was
//! already resolved in this call is reused, so diamond imports load once.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::{
    application::{ApplicationError, ports::BlockStore},
    domain::{Block, BlockId, BlockLocator},
    error::{PaverError, PaverResult},
};

pub struct BlockRegistry {
    store: Box<dyn BlockStore>,
    builtins: HashMap<BlockId, Block>,
}

impl BlockRegistry {
    pub fn new(store: Box<dyn BlockStore>) -> Self {
        Self {
            store,
            builtins: HashMap::new(),
        }
    }

    /// Register built-in blocks, replacing any with the same identifier.
    pub fn with_builtins(mut self, blocks: impl IntoIterator<Item = Block>) -> Self {
        for block in blocks {
            self.builtins.insert(block.id.clone(), block);
        }
        self
    }

    pub fn builtin(&self, id: &BlockId) -> Option<&Block> {
        self.builtins.get(id)
    }

    /// Built-in identifiers, sorted.
    pub fn builtin_ids(&self) -> Vec<&BlockId> {
        let mut ids: Vec<&BlockId> = self.builtins.keys().collect();
        ids.sort();
        ids
    }

    /// Load a block and every block it imports.
    ///
    /// `labels` are merged into the returned block's metadata.
    #[instrument(skip(self, labels), fields(id = %id))]
    pub fn load_block(&self, id: &BlockId, labels: &[String]) -> PaverResult<Block> {
        let mut in_progress = Vec::new();
        let mut resolved = HashMap::new();
        self.resolve(id, labels, &mut in_progress, &mut resolved)
    }

    // ------------------------------------------------------------------------
    // Internal Helpers
    // ------------------------------------------------------------------------

    fn resolve(
        &self,
        id: &BlockId,
        labels: &[String],
        in_progress: &mut Vec<BlockId>,
        resolved: &mut HashMap<BlockId, Block>,
    ) -> PaverResult<Block> {
        if in_progress.contains(id) {
            let mut chain: Vec<String> = in_progress.iter().map(ToString::to_string).collect();
            chain.push(id.to_string());
            return Err(ApplicationError::BlockImportCycle { chain }.into());
        }

        if let Some(block) = resolved.get(id) {
            debug!(id = %id, "Reusing resolved block");
            let mut block = block.clone();
            block.metadata.merge_labels(labels);
            return Ok(block);
        }

        let mut block = self.fetch(id)?;
        block.resolve_function_sets()?;
        block.validate()?;

        in_progress.push(id.clone());
        for import in &mut block.blocks {
            let child = self.resolve(&import.id, &import.labels, in_progress, resolved)?;
            import.block = Some(Box::new(child));
        }
        in_progress.pop();

        debug!(id = %id, imports = block.blocks.len(), "Block resolved");
        resolved.insert(id.clone(), block.clone());
        block.metadata.merge_labels(labels);
        Ok(block)
    }

    fn fetch(&self, id: &BlockId) -> PaverResult<Block> {
        match id.locator() {
            BlockLocator::Cache { host, path } => {
                let mut block = self.store.load(host, path)?;
                // the document may omit its id or use a shorter alias
                block.id = id.clone();
                Ok(block)
            }
            BlockLocator::Remote { scheme, .. } => {
                warn!(id = %id, scheme, "Remote block sources are not fetched; using declaration");
                Ok(Block::new(id.as_str()))
            }
            BlockLocator::Builtin => self.builtins.get(id).cloned().ok_or_else(|| {
                PaverError::from(ApplicationError::BlockNotFound {
                    id: id.to_string(),
                    location: "built-in blocks".into(),
                })
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockBlockStore;
    use crate::domain::{
        DomainError, FunctionSet, FunctionSetRef, ImportedBlock, TemplateFragment, TriggerMapping,
    };

    fn block(id: &str, imports: &[&str]) -> Block {
        let mut b = Block::new(id);
        b.blocks = imports.iter().map(|i| ImportedBlock::new(*i)).collect();
        b
    }

    fn registry_with(blocks: Vec<Block>) -> BlockRegistry {
        BlockRegistry::new(Box::new(MockBlockStore::new())).with_builtins(blocks)
    }

    #[test]
    fn unscoped_ids_use_builtins() {
        let registry = registry_with(vec![block("core.logger", &[])]);
        let loaded = registry.load_block(&"core.logger".into(), &[]).unwrap();
        assert_eq!(loaded.id.as_str(), "core.logger");
    }

    #[test]
    fn unknown_builtin_is_not_found() {
        let registry = registry_with(vec![]);
        let err = registry.load_block(&"missing".into(), &[]).unwrap_err();
        assert!(matches!(
            err,
            PaverError::Application(ApplicationError::BlockNotFound { .. })
        ));
    }

    #[test]
    fn cache_ids_go_to_the_store() {
        let mut store = MockBlockStore::new();
        store
            .expect_load()
            .withf(|host, path| host == "blocks" && path == "go/logger")
            .times(1)
            .returning(|_, _| Ok(Block::new("logger")));
        let registry = BlockRegistry::new(Box::new(store));

        let id = BlockId::new("cache://blocks/go/logger");
        let loaded = registry.load_block(&id, &[]).unwrap();
        assert_eq!(loaded.id, id);
    }

    #[test]
    fn remote_ids_return_the_declaration() {
        let registry = registry_with(vec![]);
        let id = BlockId::new("https://example.com/blocks/logger.json");
        let loaded = registry.load_block(&id, &[]).unwrap();
        assert_eq!(loaded.id, id);
        assert!(loaded.http_mappings.is_empty());
    }

    #[test]
    fn imports_are_embedded_recursively() {
        let registry = registry_with(vec![
            block("a", &["b"]),
            block("b", &["c"]),
            block("c", &[]),
        ]);
        let a = registry.load_block(&"a".into(), &[]).unwrap();
        let b = a.imported().next().unwrap();
        let c = b.imported().next().unwrap();
        assert_eq!(b.id.as_str(), "b");
        assert_eq!(c.id.as_str(), "c");
    }

    #[test]
    fn diamond_imports_load_once() {
        let mut store = MockBlockStore::new();
        store
            .expect_load()
            .withf(|_, path| path == "shared")
            .times(1)
            .returning(|_, _| Ok(Block::new("shared")));

        let registry = BlockRegistry::new(Box::new(store)).with_builtins(vec![
            block("top", &["left", "right"]),
            block("left", &["cache://lib/shared"]),
            block("right", &["cache://lib/shared"]),
        ]);

        let top = registry.load_block(&"top".into(), &[]).unwrap();
        let shared: Vec<&Block> = top.imported().flat_map(|b| b.imported()).collect();
        assert_eq!(shared.len(), 2);
        assert!(shared.iter().all(|b| b.id.as_str() == "cache://lib/shared"));
    }

    #[test]
    fn self_import_is_a_cycle() {
        let registry = registry_with(vec![block("loop", &["loop"])]);
        let err = registry.load_block(&"loop".into(), &[]).unwrap_err();
        match err {
            PaverError::Application(ApplicationError::BlockImportCycle { chain }) => {
                assert_eq!(chain, vec!["loop", "loop"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mutual_import_is_a_cycle() {
        let registry = registry_with(vec![block("a", &["b"]), block("b", &["a"])]);
        let err = registry.load_block(&"a".into(), &[]).unwrap_err();
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn overlapping_triggers_fail_at_load() {
        let mut b = Block::new("routes");
        b.http_mappings = vec![
            TriggerMapping::new(["GET", "HEAD"], TemplateFragment::new("a.tpl")),
            TriggerMapping::new(["HEAD"], TemplateFragment::new("b.tpl")),
        ];
        let registry = registry_with(vec![b]);
        let err = registry.load_block(&"routes".into(), &[]).unwrap_err();
        assert!(matches!(
            err,
            PaverError::Domain(DomainError::OverlappingTriggers { .. })
        ));
    }

    #[test]
    fn function_sets_resolve_at_load() {
        let mut b = Block::new("named");
        b.http_mappings = vec![TriggerMapping::new(
            ["GET"],
            TemplateFragment {
                function_set: Some(FunctionSetRef::Named("stringFunctionMap()".into())),
                ..TemplateFragment::new("a.tpl")
            },
        )];
        let registry = registry_with(vec![b]);
        let loaded = registry.load_block(&"named".into(), &[]).unwrap();
        assert_eq!(
            loaded.http_mappings[0].template.functions().unwrap(),
            Some(FunctionSet::Strings)
        );
    }

    #[test]
    fn labels_are_merged() {
        let mut b = block("core.logger", &[]);
        b.metadata.labels = vec!["logging".into()];
        let registry = registry_with(vec![b]);
        let loaded = registry
            .load_block(&"core.logger".into(), &["logging".into(), "kafka".into()])
            .unwrap();
        assert_eq!(loaded.metadata.labels, vec!["logging", "kafka"]);
    }
}
