//! Engine facade: wires the lifecycle manager, snapshot recorder, and
//! metrics queries over one shared state, and handles persistence of the
//! engine-owned rows.

use std::sync::Arc;

use parking_lot::RwLock;

use cadence_core::{CadenceError, CadenceResult};
use cadence_domain::PersistedState;
use cadence_persistence::{PersistenceMetadata, PersistenceStore, StoreSnapshot, FORMAT_VERSION};

use crate::lifecycle::SprintLifecycleManager;
use crate::metrics::MetricsEngine;
use crate::provider::BoardData;
use crate::recorder::SnapshotRecorder;
use crate::state::EngineState;

pub struct SprintEngine {
    state: Arc<RwLock<EngineState>>,
    lifecycle: SprintLifecycleManager,
    recorder: SnapshotRecorder,
    metrics: MetricsEngine,
}

impl SprintEngine {
    pub fn new(data: Arc<dyn BoardData>) -> Self {
        Self::with_state(data, EngineState::new())
    }

    pub fn with_state(data: Arc<dyn BoardData>, state: EngineState) -> Self {
        let state = Arc::new(RwLock::new(state));
        Self {
            lifecycle: SprintLifecycleManager::new(state.clone(), data.clone()),
            recorder: SnapshotRecorder::new(state.clone(), data.clone()),
            metrics: MetricsEngine::new(state.clone(), data),
            state,
        }
    }

    /// Load persisted engine state from a store, starting empty when the
    /// store has no file yet.
    pub async fn load(
        data: Arc<dyn BoardData>,
        store: &dyn PersistenceStore,
    ) -> CadenceResult<Self> {
        if !store.exists().await {
            return Ok(Self::new(data));
        }

        let (snapshot, _metadata) = store.load().await?;
        let persisted: PersistedState = serde_json::from_slice(&snapshot.data)
            .map_err(|e| CadenceError::Serialization(e.to_string()))?;

        Ok(Self::with_state(data, EngineState::from_persisted(persisted)))
    }

    /// Persist the engine-owned rows. The store stamps its own instance
    /// id and save time into the metadata.
    pub async fn save(&self, store: &dyn PersistenceStore) -> CadenceResult<()> {
        let persisted = self.state.read().to_persisted();
        let bytes = serde_json::to_vec_pretty(&persisted)
            .map_err(|e| CadenceError::Serialization(e.to_string()))?;

        store
            .save(StoreSnapshot {
                data: bytes,
                metadata: PersistenceMetadata::new(FORMAT_VERSION, uuid::Uuid::new_v4()),
            })
            .await?;
        Ok(())
    }

    pub fn lifecycle(&self) -> &SprintLifecycleManager {
        &self.lifecycle
    }

    pub fn recorder(&self) -> &SnapshotRecorder {
        &self.recorder
    }

    pub fn metrics(&self) -> &MetricsEngine {
        &self.metrics
    }
}
