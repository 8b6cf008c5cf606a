use crate::utils::constants::CODE_DIR;
use std::{io, path::PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("invalid artifact key '{0}'")]
    InvalidKey(String),

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
}

/// Source code artifacts on disk, one file per (user, strategy) at
/// `<root>/code/<user_id>/<strategy_id>.<extension>`.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    extension: String,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn path_for(&self, user_id: &str, strategy_id: &str) -> Result<PathBuf, ArtifactError> {
        check_key(user_id)?;
        check_key(strategy_id)?;

        Ok(self
            .root
            .join(CODE_DIR)
            .join(user_id)
            .join(format!("{}.{}", strategy_id, self.extension)))
    }

    /// Writes the source verbatim, replacing any earlier artifact.
    pub async fn write(
        &self,
        user_id: &str,
        strategy_id: &str,
        code: &str,
    ) -> Result<PathBuf, ArtifactError> {
        let path = self.path_for(user_id, strategy_id)?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|source| ArtifactError::Write {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        fs::write(&path, code.as_bytes())
            .await
            .map_err(|source| ArtifactError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }

    /// `Ok(None)` when no artifact has been written yet.
    pub async fn read(
        &self,
        user_id: &str,
        strategy_id: &str,
    ) -> Result<Option<String>, ArtifactError> {
        let path = self.path_for(user_id, strategy_id)?;

        match fs::read_to_string(&path).await {
            Ok(code) => Ok(Some(code)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ArtifactError::Read { path, source }),
        }
    }
}

// Keys become path components.
fn check_key(key: &str) -> Result<(), ArtifactError> {
    let bad = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(|c: char| matches!(c, '/' | '\\' | '\0'));

    if bad {
        return Err(ArtifactError::InvalidKey(key.to_string()));
    }

    Ok(())
}
