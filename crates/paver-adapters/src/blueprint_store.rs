//! Blueprint directories in the local cache.
//!
//! # Directory layout expected
//!
//! ```text
//! <cache root>/blueprints/
//! ├── microservices/          ← top-level domain
//! │   ├── ga/                 ← release stage
//! │   │   └── datamgr/        ← blueprint
//! │   │       ├── definition.yaml      ← sample definition (not rendered)
//! │   │       ├── templateApp.go
//! │   │       └── manifests/
//! │   │           └── organization-deploy.yaml
//! │   └── experimental/
//! ├── crd/
//! └── serverless/
//! ```
//!
//! Every file except the sample definition is a template. Its output path
//! mirrors its path inside the blueprint, before token substitution.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use paver_core::{
    application::{
        ApplicationError,
        ports::{BlueprintFile, BlueprintStore},
    },
    error::{PaverError, PaverResult},
};

use crate::cache::BLUEPRINTS_DIR;

/// Top-level domains searched, in order.
pub const TOP_LEVEL_DOMAINS: [&str; 3] = ["crd", "microservices", "serverless"];

/// Release stages searched, in order.
pub const RELEASE_STAGES: [&str; 3] = ["ga", "experimental", "incubation"];

/// Sample definition shipped with a blueprint.
pub const SAMPLE_DEFINITION: &str = "definition.yaml";

#[derive(Debug, Clone)]
pub struct DirectoryBlueprintStore {
    cache_root: PathBuf,
}

impl DirectoryBlueprintStore {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
        }
    }

    fn blueprints_root(&self) -> PathBuf {
        self.cache_root.join(BLUEPRINTS_DIR)
    }

    /// Directory of the named blueprint.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::BlueprintNotFound`] when no directory matches
    /// - [`ApplicationError::AmbiguousBlueprint`] when a bare name exists
    ///   under more than one domain or stage
    pub fn locate(&self, name: &str) -> PaverResult<PathBuf> {
        let root = self.blueprints_root();
        let not_found = || PaverError::from(ApplicationError::BlueprintNotFound { name: name.into() });
        let Some(relative) = relative_dir(name) else {
            return Err(not_found());
        };

        if relative.components().count() > 1 {
            let dir = root.join(relative);
            return if dir.is_dir() { Ok(dir) } else { Err(not_found()) };
        }

        let mut candidates: Vec<PathBuf> = TOP_LEVEL_DOMAINS
            .iter()
            .flat_map(|tld| RELEASE_STAGES.iter().map(move |stage| (tld, stage)))
            .map(|(tld, stage)| root.join(tld).join(stage).join(&relative))
            .filter(|dir| dir.is_dir())
            .collect();

        match candidates.len() {
            0 => Err(not_found()),
            1 => Ok(candidates.remove(0)),
            _ => Err(ApplicationError::AmbiguousBlueprint {
                name: name.into(),
                candidates,
            }
            .into()),
        }
    }

    /// Path of the blueprint's sample definition, if it ships one.
    pub fn sample_definition(&self, name: &str) -> PaverResult<Option<PathBuf>> {
        let path = self.locate(name)?.join(SAMPLE_DEFINITION);
        Ok(path.is_file().then_some(path))
    }
}

impl BlueprintStore for DirectoryBlueprintStore {
    #[instrument(skip(self), fields(root = %self.cache_root.display()))]
    fn files(&self, name: &str) -> PaverResult<Vec<BlueprintFile>> {
        let dir = self.locate(name)?;
        let mut files = Vec::new();

        for entry in WalkDir::new(&dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: dir.clone(),
                reason: format!("directory walk error: {e}"),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let abs = entry.path();
            let Ok(rel) = abs.strip_prefix(&dir) else {
                continue;
            };
            if rel == Path::new(SAMPLE_DEFINITION) {
                continue;
            }
            let Ok(template) = abs.strip_prefix(&self.cache_root) else {
                continue;
            };

            let file_name = rel
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let directory = rel
                .parent()
                .map(|p| normalize_path(&p.to_string_lossy()))
                .unwrap_or_default();

            files.push(BlueprintFile {
                template: normalize_path(&template.to_string_lossy()),
                directory,
                file_name,
                executable: is_executable(abs),
            });
        }

        if files.is_empty() {
            warn!(blueprint = name, "Blueprint has no template files");
        }
        debug!(blueprint = name, count = files.len(), "Blueprint files discovered");
        Ok(files)
    }

    fn list(&self) -> PaverResult<Vec<String>> {
        let root = self.blueprints_root();
        let mut names = Vec::new();
        for tld in TOP_LEVEL_DOMAINS {
            for stage in RELEASE_STAGES {
                let stage_dir = root.join(tld).join(stage);
                if !stage_dir.is_dir() {
                    continue;
                }
                for entry in WalkDir::new(&stage_dir)
                    .min_depth(1)
                    .max_depth(1)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_dir())
                {
                    names.push(format!("{tld}/{stage}/{}", entry.file_name().to_string_lossy()));
                }
            }
        }
        Ok(names)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}

/// Plain segments of a blueprint name; `None` when it would leave the
/// blueprints directory or names nothing.
fn relative_dir(name: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(name.trim_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!relative.as_os_str().is_empty()).then_some(relative)
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
