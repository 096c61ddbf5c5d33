//! Fragment renderer backed by `minijinja`.
//!
//! Templates are read from the cache directory on first use and stay
//! compiled inside the environment for the lifetime of the renderer. Each
//! function set gets its own environment, so a template compiled with the
//! `strings` helpers is never served to a fragment that did not ask for
//! them.
//!
//! Fragments see every field of the generation context at top level, plus
//! `trigger` and `endpoint` for the call.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use minijinja::{AutoEscape, Environment, ErrorKind};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument};

use paver_core::{
    application::{
        ApplicationError,
        ports::{FragmentRenderer, RenderLocals},
    },
    domain::{FunctionSet, GenerationContext},
    error::{PaverError, PaverResult},
};

pub struct MiniJinjaRenderer {
    root: PathBuf,
    environments: Mutex<HashMap<Option<FunctionSet>, Environment<'static>>>,
}

impl MiniJinjaRenderer {
    /// Renderer reading templates relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            environments: Mutex::new(HashMap::new()),
        }
    }

    fn environment(&self, functions: Option<FunctionSet>) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        // Output is source code; `.html` and `.xml` blueprints stay verbatim.
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let root = self.root.clone();
        env.set_loader(move |name| match map_path(&root, name) {
            Some(path) => match fs::read_to_string(&path) {
                Ok(source) => Ok(Some(source)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("could not read template {}", path.display()),
                )
                .with_source(e)),
            },
            None => Ok(None),
        });

        if let Some(set) = functions {
            for &name in set.functions() {
                let apply = move |value: String| set.apply(name, &value).unwrap_or(value);
                env.add_filter(name, apply);
                env.add_function(name, apply);
            }
        }
        env
    }
}

impl FragmentRenderer for MiniJinjaRenderer {
    #[instrument(skip(self, context, locals), fields(functions = ?functions))]
    fn render(
        &self,
        template: &str,
        functions: Option<FunctionSet>,
        context: &GenerationContext,
        locals: &RenderLocals,
    ) -> PaverResult<String> {
        let mut environments = self
            .environments
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let env = environments
            .entry(functions)
            .or_insert_with(|| self.environment(functions));

        let compiled = env
            .get_template(template)
            .map_err(|e| map_render_error(template, &e))?;

        let values = render_values(context, locals)?;
        let output = compiled
            .render(&values)
            .map_err(|e| map_render_error(template, &e))?;

        debug!(template, bytes = output.len(), "Template rendered");
        Ok(output)
    }
}

/// Context fields plus call locals as one JSON object.
fn render_values(context: &GenerationContext, locals: &RenderLocals) -> PaverResult<JsonValue> {
    let to_error = |e: serde_json::Error| {
        PaverError::from(ApplicationError::Serialization {
            reason: e.to_string(),
        })
    };
    let mut values = serde_json::to_value(context).map_err(to_error)?;
    if let (JsonValue::Object(fields), JsonValue::Object(extra)) =
        (&mut values, serde_json::to_value(locals).map_err(to_error)?)
    {
        fields.extend(extra);
    }
    Ok(values)
}

/// Join a template name onto the root, refusing anything but plain segments.
fn map_path(root: &Path, name: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for component in Path::new(name.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(path)
}

fn map_render_error(template: &str, e: &minijinja::Error) -> PaverError {
    if e.kind() == ErrorKind::TemplateNotFound {
        return ApplicationError::TemplateNotFound {
            template: template.to_string(),
        }
        .into();
    }
    ApplicationError::RenderingFailed {
        template: e.name().unwrap_or(template).to_string(),
        line: e.line(),
        reason: e
            .detail()
            .map(str::to_string)
            .unwrap_or_else(|| e.kind().to_string()),
    }
    .into()
}
