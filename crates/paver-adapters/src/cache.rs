//! Location of the local block cache.
//!
//! The cache is a directory of block documents, templates and blueprints
//! that some earlier step (a git clone, an unpacked archive) populated. Paver
//! only reads from it.
//!
//! Precedence, highest first:
//! 1. explicit path (the `--cache-dir` flag)
//! 2. the `PAVER_CACHE_DIR` environment variable
//! 3. `cache.dir` from the configuration file
//! 4. `<user cache dir>/paver/blocks`

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use paver_core::error::{PaverError, PaverResult};

/// Environment variable overriding the cache location.
pub const CACHE_DIR_ENV: &str = "PAVER_CACHE_DIR";

/// Blueprint directory inside the cache.
pub const BLUEPRINTS_DIR: &str = "blueprints";

/// Which precedence level supplied the cache location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    Flag,
    Environment,
    Config,
    Default,
}

impl fmt::Display for CacheSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flag => "--cache-dir",
            Self::Environment => CACHE_DIR_ENV,
            Self::Config => "config file",
            Self::Default => "default",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDirectory {
    root: PathBuf,
    source: CacheSource,
}

impl CacheDirectory {
    /// Use `root` directly.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source: CacheSource::Flag,
        }
    }

    /// Resolve the cache location, reading `PAVER_CACHE_DIR` from the
    /// process environment.
    pub fn resolve(flag: Option<&Path>, configured: Option<&Path>) -> PaverResult<Self> {
        let env = std::env::var(CACHE_DIR_ENV).ok();
        Self::resolve_with(flag, env.as_deref(), configured)
    }

    /// Resolve the cache location from explicit inputs.
    pub fn resolve_with(
        flag: Option<&Path>,
        env: Option<&str>,
        configured: Option<&Path>,
    ) -> PaverResult<Self> {
        let resolved = if let Some(path) = flag {
            Self {
                root: path.to_path_buf(),
                source: CacheSource::Flag,
            }
        } else if let Some(value) = env.map(str::trim).filter(|v| !v.is_empty()) {
            Self {
                root: PathBuf::from(value),
                source: CacheSource::Environment,
            }
        } else if let Some(path) = configured {
            Self {
                root: path.to_path_buf(),
                source: CacheSource::Config,
            }
        } else {
            Self {
                root: default_location()?,
                source: CacheSource::Default,
            }
        };

        debug!(root = %resolved.root.display(), source = %resolved.source, "Cache directory resolved");
        Ok(resolved)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> CacheSource {
        self.source
    }

    pub fn blueprints_dir(&self) -> PathBuf {
        self.root.join(BLUEPRINTS_DIR)
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }
}

/// `<user cache dir>/paver/blocks`.
pub fn default_location() -> PaverResult<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join("paver").join("blocks"))
        .ok_or_else(|| PaverError::Configuration {
            message: format!(
                "cannot determine a user cache directory; set {CACHE_DIR_ENV} or pass --cache-dir"
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_everything() {
        let cache = CacheDirectory::resolve_with(
            Some(Path::new("/flag")),
            Some("/env"),
            Some(Path::new("/config")),
        )
        .unwrap();
        assert_eq!(cache.root(), Path::new("/flag"));
        assert_eq!(cache.source(), CacheSource::Flag);
    }

    #[test]
    fn environment_wins_over_config() {
        let cache =
            CacheDirectory::resolve_with(None, Some("/env"), Some(Path::new("/config"))).unwrap();
        assert_eq!(cache.root(), Path::new("/env"));
        assert_eq!(cache.source(), CacheSource::Environment);
    }

    #[test]
    fn blank_environment_is_ignored() {
        let cache =
            CacheDirectory::resolve_with(None, Some("  "), Some(Path::new("/config"))).unwrap();
        assert_eq!(cache.source(), CacheSource::Config);
    }

    #[test]
    fn blueprints_live_under_the_root() {
        let cache = CacheDirectory::at("/cache");
        assert_eq!(cache.blueprints_dir(), PathBuf::from("/cache/blueprints"));
    }
}
