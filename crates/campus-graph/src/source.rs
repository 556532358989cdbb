//! Dataset sources.
//!
//! A source only fetches bytes. Parsing and validation happen in the
//! store so every source gets identical treatment.

use async_trait::async_trait;
use campus_core::LoadError;
use std::path::{Path, PathBuf};

/// Somewhere a dataset can be fetched from.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable location for diagnostics.
    fn describe(&self) -> String;

    /// Fetches the raw dataset document.
    async fn fetch(&self) -> Result<Vec<u8>, LoadError>;
}

/// A dataset file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Fetch {
                location: self.describe(),
                source,
            })
    }
}

/// A dataset held in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    label: String,
    bytes: Vec<u8>,
}

impl StaticSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: "<memory>".to_string(),
            bytes: bytes.into(),
        }
    }

    /// Builder: set the label reported by `describe`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[async_trait]
impl DataSource for StaticSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        Ok(self.bytes.clone())
    }
}
