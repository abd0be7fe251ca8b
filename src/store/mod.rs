//! Flat-file JSON persistence for the Reef Life backend.
//!
//! Each collection lives in one pretty-printed JSON array file under the data
//! directory. Files are read and rewritten whole on every operation; the
//! repository layer serializes read-modify-write cycles per collection.

pub mod repository;

pub use repository::Repositories;

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppError;

/// Behavior a stored record exposes to the generic repository.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection file stem, e.g. "magazines".
    const COLLECTION: &'static str;
    /// Record kind used in error messages, e.g. "Magazine".
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Handle to the collection files under one data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    fn path<T: Record>(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", T::COLLECTION))
    }

    /// Read the whole collection. A missing file is created as an empty array
    /// so fresh deployments and externally seeded collections behave the same.
    pub async fn load<T: Record>(&self) -> Result<Vec<T>, AppError> {
        let path = self.path::<T>();
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Io(format!(
                    "Malformed collection file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.save::<T>(&[]).await?;
                Ok(Vec::new())
            }
            Err(e) => Err(AppError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Rewrite the whole collection, pretty-printed so the files stay
    /// hand-editable. The write is not atomic; the repository lock keeps
    /// writers from interleaving.
    pub async fn save<T: Record>(&self, records: &[T]) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let json = serde_json::to_vec_pretty(records)?;
        let path = self.path::<T>();
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }
}
