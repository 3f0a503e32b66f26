//! Sled-based storage for generated presentations.

use crate::pipeline::Presentation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    DbError(#[from] sled::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("presentation not found: {0}")]
    NotFound(String),
}

/// A stored presentation with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPresentation {
    /// Storage key
    pub id: String,
    /// When the presentation was created
    pub created_at: DateTime<Utc>,
    /// The prompt it was generated from, if any
    pub prompt: Option<String>,
    /// The presentation itself
    pub presentation: Presentation,
}

impl StoredPresentation {
    /// Create a new stored presentation, keyed by title and creation time
    pub fn new(prompt: Option<String>, presentation: Presentation) -> Self {
        let created_at = Utc::now();
        let id = Self::make_id(&presentation.title, &created_at);
        Self {
            id,
            created_at,
            prompt,
            presentation,
        }
    }

    /// Create a short hex id from the title and timestamp
    fn make_id(title: &str, created_at: &DateTime<Utc>) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        title.hash(&mut hasher);
        created_at.timestamp_nanos_opt().hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}

/// Sled-based storage for presentations.
pub struct Storage {
    db: sled::Db,
}

impl Storage {
    /// Open or create storage at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Store a presentation, returning its id
    pub fn store(
        &self,
        prompt: Option<String>,
        presentation: Presentation,
    ) -> Result<StoredPresentation, StorageError> {
        let stored = StoredPresentation::new(prompt, presentation);
        let value = serde_json::to_vec(&stored)?;
        self.db.insert(stored.id.as_bytes(), value)?;
        self.db.flush()?;
        log::info!("stored presentation {}", stored.id);
        Ok(stored)
    }

    /// Retrieve a presentation by id
    pub fn get(&self, id: &str) -> Result<Option<StoredPresentation>, StorageError> {
        match self.db.get(id.as_bytes())? {
            Some(data) => {
                let stored: StoredPresentation = serde_json::from_slice(&data)?;
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }

    /// Retrieve a presentation by id, failing when it is missing
    pub fn require(&self, id: &str) -> Result<StoredPresentation, StorageError> {
        self.get(id)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    /// List all stored presentations
    pub fn list_all(&self) -> Result<Vec<StoredPresentation>, StorageError> {
        let mut results = Vec::new();
        for item in self.db.iter() {
            let (_key, value) = item?;
            let stored: StoredPresentation = serde_json::from_slice(&value)?;
            results.push(stored);
        }
        // Sort by created_at descending (newest first)
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(results)
    }

    /// Delete a presentation by id
    pub fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let existed = self.db.remove(id.as_bytes())?.is_some();
        self.db.flush()?;
        Ok(existed)
    }

    /// Get the number of stored presentations
    pub fn count(&self) -> usize {
        self.db.len()
    }
}
