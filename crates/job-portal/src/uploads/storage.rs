use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::config::UploadConfig;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("unsupported file type")]
    UnsupportedType,
    #[error("file of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    #[error("invalid file name")]
    InvalidName,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Stores CVs under `{uuid}_{sanitized name}` inside one directory.
#[derive(Debug, Clone)]
pub struct CvStorage {
    root: PathBuf,
    max_bytes: usize,
}

impl CvStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.directory.clone(), config.max_bytes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Writes the file and returns the generated name it is stored under.
    pub async fn store(&self, original_name: &str, contents: &[u8]) -> Result<String, UploadError> {
        let name = sanitize_filename(original_name).ok_or(UploadError::UnsupportedType)?;
        if !has_allowed_extension(&name) {
            return Err(UploadError::UnsupportedType);
        }
        if contents.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: contents.len(),
                limit: self.max_bytes,
            });
        }

        fs::create_dir_all(&self.root).await?;
        let stored = format!("{}_{name}", Uuid::new_v4().simple());
        fs::write(self.root.join(&stored), contents).await?;
        debug!(file = %stored, bytes = contents.len(), "stored upload");
        Ok(stored)
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>, UploadError> {
        let path = self.resolve(name)?;
        Ok(fs::read(path).await?)
    }

    /// Returns false when there was nothing to delete.
    pub async fn remove(&self, name: &str) -> Result<bool, UploadError> {
        let path = self.resolve(name)?;
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, UploadError> {
        let valid = !name.is_empty()
            && !name.contains("..")
            && !name.contains('/')
            && !name.contains('\\');
        if !valid {
            return Err(UploadError::InvalidName);
        }
        Ok(self.root.join(name))
    }
}

/// Keeps the final path component and reduces it to ASCII letters, digits, `.`, `-` and `_`.
/// Whitespace becomes `_`; leading dots and underscores are dropped. `None` when nothing is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '_']);

    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .is_some_and(|extension| ALLOWED_EXTENSIONS.contains(&extension.as_str()))
}
