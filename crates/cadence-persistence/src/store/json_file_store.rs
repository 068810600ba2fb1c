use crate::traits::{PersistenceMetadata, PersistenceStore, StoreSnapshot};
use cadence_core::CadenceResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// JSON file-based persistence store.
///
/// Writes go to a temp file in the target directory followed by an atomic
/// rename, so a crash mid-write can never leave a truncated store behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    instance_id: Uuid,
}

/// Wrapper structure for the on-disk JSON format
#[derive(Debug, Serialize, Deserialize)]
struct JsonEnvelope {
    version: u32,
    metadata: PersistenceMetadata,
    data: serde_json::Value,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id: Uuid::new_v4(),
        }
    }

    /// Create a store with a specific instance ID
    /// (useful for testing or coordinating across instances)
    pub fn with_instance_id(path: impl AsRef<Path>, instance_id: Uuid) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id,
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Write bytes to a temp file in the same directory, then rename over
    /// the target. The rename is atomic on POSIX systems.
    async fn write_atomic(path: &Path, data: &[u8]) -> CadenceResult<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let temp_file = tempfile::NamedTempFile::new_in(parent)?;
        let temp_path = temp_file.path().to_path_buf();

        fs::write(&temp_path, data).await?;
        fs::rename(&temp_path, path).await?;

        tracing::debug!("Atomically wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

#[async_trait::async_trait]
impl PersistenceStore for JsonFileStore {
    async fn save(&self, mut snapshot: StoreSnapshot) -> CadenceResult<PersistenceMetadata> {
        // Update metadata with current instance and time
        snapshot.metadata.instance_id = self.instance_id;
        snapshot.metadata.saved_at = chrono::Utc::now();
        snapshot.metadata.format_version = FORMAT_VERSION;

        let data_value: serde_json::Value = serde_json::from_slice(&snapshot.data)
            .map_err(|e| cadence_core::CadenceError::Serialization(e.to_string()))?;
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: snapshot.metadata.clone(),
            data: data_value,
        };

        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| cadence_core::CadenceError::Serialization(e.to_string()))?;

        Self::write_atomic(&self.path, &json_bytes).await?;

        tracing::info!("Saved {} bytes to {}", json_bytes.len(), self.path.display());

        Ok(snapshot.metadata)
    }

    async fn load(&self) -> CadenceResult<(StoreSnapshot, PersistenceMetadata)> {
        let file_bytes = fs::read(&self.path).await?;

        let envelope: JsonEnvelope = serde_json::from_slice(&file_bytes)
            .map_err(|e| cadence_core::CadenceError::Serialization(e.to_string()))?;

        if envelope.version != FORMAT_VERSION {
            return Err(cadence_core::CadenceError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }

        let data = serde_json::to_vec(&envelope.data)
            .map_err(|e| cadence_core::CadenceError::Serialization(e.to_string()))?;
        let snapshot = StoreSnapshot {
            data,
            metadata: envelope.metadata.clone(),
        };

        tracing::info!(
            "Loaded {} bytes from {}",
            file_bytes.len(),
            self.path.display()
        );

        Ok((snapshot, envelope.metadata))
    }

    async fn exists(&self) -> bool {
        self.path.exists()
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
