use crate::{APP_AUTHOR, APP_NAME, APP_QUALIFIER};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-user directories the player and its plugins work out of, derived from
/// the standard base directories at startup.
#[derive(Debug, Clone)]
pub struct AppDirs {
    runtime_dir: PathBuf,
    cache_dir: PathBuf,
    data_dir: PathBuf,
    plugins_dir: PathBuf,
    plugins_cache_dir: PathBuf,
    art_cache_dir: PathBuf,
    log_dir: PathBuf,
}

impl AppDirs {
    pub fn discover() -> Result<Self, DirsError> {
        let dirs = ProjectDirs::from(APP_QUALIFIER, APP_AUTHOR, APP_NAME)
            .ok_or(DirsError::MissingProjectDirs)?;
        let cache_dir = dirs.cache_dir().to_path_buf();
        let data_dir = dirs.data_dir().to_path_buf();
        // Not every platform reports a runtime dir; fall back under cache so
        // the player-link socket path is always derivable.
        let runtime_dir = dirs
            .runtime_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cache_dir.join("runtime"));
        Ok(Self {
            plugins_dir: data_dir.join("plugins"),
            plugins_cache_dir: cache_dir.join("plugins"),
            art_cache_dir: cache_dir.join("arts"),
            log_dir: data_dir.join("logs"),
            runtime_dir,
            cache_dir,
            data_dir,
        })
    }

    pub fn ensure_exists(&self) -> Result<(), DirsError> {
        for dir in [
            &self.runtime_dir,
            &self.cache_dir,
            &self.data_dir,
            &self.plugins_dir,
            &self.plugins_cache_dir,
            &self.art_cache_dir,
            &self.log_dir,
        ] {
            std::fs::create_dir_all(dir).map_err(|source| DirsError::CreateDirectory {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn runtime_dir(&self) -> &Path {
        &self.runtime_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Installed plugins, under the data dir.
    pub fn plugins_dir(&self) -> &Path {
        &self.plugins_dir
    }

    /// Per-plugin scratch space, under the cache dir.
    pub fn plugins_cache_dir(&self) -> &Path {
        &self.plugins_cache_dir
    }

    /// Cached album art, keyed by image cache identity.
    pub fn art_cache_dir(&self) -> &Path {
        &self.art_cache_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

#[derive(Debug, Error)]
pub enum DirsError {
    #[error("unable to determine per-user directories for Vibe")]
    MissingProjectDirs,
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_returns_dirs() {
        let dirs = AppDirs::discover().expect("should build dirs");
        assert!(dirs.cache_dir().ends_with(APP_NAME));
        assert!(dirs.plugins_dir().ends_with("plugins"));
        assert!(dirs.art_cache_dir().ends_with("arts"));
        assert!(dirs.plugins_cache_dir().starts_with(dirs.cache_dir()));
    }
}
