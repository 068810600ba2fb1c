use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cadence_core::CadenceResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Metadata for persistence operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    /// Version of the persistence format
    pub format_version: u32,
    /// ID of the instance that performed the save
    pub instance_id: Uuid,
    /// When this data was saved
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(format_version: u32, instance_id: Uuid) -> Self {
        Self {
            format_version,
            instance_id,
            saved_at: Utc::now(),
        }
    }
}

/// Serialized engine state plus metadata, as handed to a store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Raw bytes representing the persisted engine state
    pub data: Vec<u8>,
    /// Metadata about this snapshot
    pub metadata: PersistenceMetadata,
}

/// Trait for abstract storage operations
/// Implementations handle different backend storage (file, database, etc.)
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Save a snapshot to the store
    async fn save(&self, snapshot: StoreSnapshot) -> CadenceResult<PersistenceMetadata>;

    /// Load the current snapshot from the store
    async fn load(&self) -> CadenceResult<(StoreSnapshot, PersistenceMetadata)>;

    /// Check if the store file exists
    async fn exists(&self) -> bool;

    /// Get the path to the store file
    fn path(&self) -> &Path;
}

/// Trait for serialization/deserialization strategies
/// Allows swapping JSON for binary formats, databases, etc.
pub trait Serializer<T: Send + Sync>: Send + Sync {
    /// Serialize data to bytes
    fn serialize(&self, data: &T) -> CadenceResult<Vec<u8>>;

    /// Deserialize data from bytes
    fn deserialize(&self, bytes: &[u8]) -> CadenceResult<T>;
}

/// Resolve a store path relative to a working directory, rejecting
/// relative paths that escape it.
pub fn resolve_store_path(path: &Path, base: &Path) -> CadenceResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let resolved = base.join(path);
    let canonical = resolved.canonicalize().unwrap_or(resolved);
    if !canonical.starts_with(base) {
        return Err(cadence_core::CadenceError::Validation(format!(
            "Path traversal not allowed: '{}' resolves outside {}",
            path.display(),
            base.display()
        )));
    }
    Ok(canonical)
}
