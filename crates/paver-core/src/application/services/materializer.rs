//! Materializer - writes rendered content to token-substituted paths.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{GenerationContext, OutputTarget, PathTokens},
    error::PaverResult,
};

/// What happened to one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(PathBuf),
    /// An existing hook file was left untouched.
    Preserved(PathBuf),
}

impl SaveOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(p) | Self::Preserved(p) => p,
        }
    }
}

pub struct Materializer {
    filesystem: Box<dyn Filesystem>,
    root: PathBuf,
}

impl Materializer {
    pub fn new(filesystem: Box<dyn Filesystem>, root: impl Into<PathBuf>) -> Self {
        Self {
            filesystem,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `content` to the target, substituting path tokens from the
    /// context. Existing hook files are never overwritten.
    #[instrument(skip_all, fields(file = %target.file_name))]
    pub fn save(
        &self,
        content: &str,
        target: &OutputTarget,
        context: &GenerationContext,
    ) -> PaverResult<SaveOutcome> {
        let tokens = PathTokens::new(&context.name, &context.organization);
        let path = self.root.join(target.resolve(&tokens));

        if target.is_hook() && self.filesystem.exists(&path) {
            info!(path = %path.display(), "Hook file exists, skipping");
            return Ok(SaveOutcome::Preserved(path));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.filesystem.exists(parent) {
                self.filesystem.create_dir_all(parent)?;
            }
        }

        self.filesystem.write_file(&path, content)?;
        self.filesystem.set_permissions(&path, target.permissions())?;
        debug!(path = %path.display(), bytes = content.len(), "Wrote file");

        Ok(SaveOutcome::Written(path))
    }
}
