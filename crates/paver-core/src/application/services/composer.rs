//! Block Composer - selects fragments by trigger and renders them.
//!
//! Composition walks a loaded block tree. For each requested trigger the
//! first mapping containing it is rendered and appended to the output;
//! imported blocks are then composed with the same triggers, in declaration
//! order. A trigger no mapping contains produces nothing.

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{FragmentRenderer, RenderLocals},
    },
    domain::{Block, GenerationContext, OutputTarget, RenderedFile, TemplateFragment, Trigger},
    error::{PaverError, PaverResult},
};

/// Rendered text plus the import statements its blocks require.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    pub output: String,
    pub imports: Vec<String>,
}

impl Composition {
    fn absorb(&mut self, other: Composition) {
        self.output.push_str(&other.output);
        self.imports.extend(other.imports);
    }
}

pub struct BlockComposer {
    renderer: Box<dyn FragmentRenderer>,
}

impl BlockComposer {
    pub fn new(renderer: Box<dyn FragmentRenderer>) -> Self {
        Self { renderer }
    }

    /// Compose `block` and its imports for the given triggers.
    ///
    /// The first failing imported block aborts composition; its error is
    /// wrapped with the imported block's id.
    #[instrument(skip_all, fields(block = %block.id, triggers = triggers.len()))]
    pub fn generate(
        &self,
        triggers: &[Trigger],
        block: &Block,
        context: &GenerationContext,
        endpoint: Option<&str>,
    ) -> PaverResult<Composition> {
        let mut composition = Composition {
            output: String::new(),
            imports: block.imports.clone(),
        };

        for trigger in triggers {
            let Some(fragment) = block.fragment_for(trigger) else {
                debug!(trigger = %trigger, "No fragment mapped");
                continue;
            };
            let locals = RenderLocals {
                trigger: Some(trigger.to_string()),
                endpoint: endpoint.map(str::to_string),
            };
            let rendered = self.render_fragment(block, fragment, context, &locals)?;
            composition.output.push_str(&rendered);
        }

        for child in block.imported() {
            let nested = self
                .generate(triggers, child, context, endpoint)
                .map_err(|e| wrap_child(child, e))?;
            composition.absorb(nested);
        }

        Ok(composition)
    }

    /// Render every file-producing `template-map` entry of `block` and its
    /// imports.
    #[instrument(skip_all, fields(block = %block.id))]
    pub fn render_files(
        &self,
        block: &Block,
        context: &GenerationContext,
    ) -> PaverResult<Vec<RenderedFile>> {
        let mut files = Vec::new();
        for fragment in block.template_map.iter().filter(|f| f.produces_file()) {
            let content = self.render_fragment(block, fragment, context, &RenderLocals::default())?;
            let target = OutputTarget::new(&block.home_directory, &fragment.output_file_name)
                .executable(fragment.executable);
            files.push(RenderedFile::new(target, content));
        }

        for child in block.imported() {
            let nested = self
                .render_files(child, context)
                .map_err(|e| wrap_child(child, e))?;
            files.extend(nested);
        }

        Ok(files)
    }

    /// Render a single template path (relative to the cache root) with no
    /// function set.
    pub fn render_template(&self, template: &str, context: &GenerationContext) -> PaverResult<String> {
        self.renderer
            .render(template, None, context, &RenderLocals::default())
    }

    fn render_fragment(
        &self,
        block: &Block,
        fragment: &TemplateFragment,
        context: &GenerationContext,
        locals: &RenderLocals,
    ) -> PaverResult<String> {
        let path = block.template_path(fragment);
        let functions = fragment.functions()?;
        debug!(template = %path, ?functions, "Rendering fragment");
        self.renderer.render(&path, functions, context, locals)
    }
}

fn wrap_child(child: &Block, err: PaverError) -> PaverError {
    ApplicationError::BlockGenerationFailed {
        block: child.id.to_string(),
        source: Box::new(err),
    }
    .into()
}
