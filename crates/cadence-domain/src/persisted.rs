//! Point-in-time capture of the engine-owned rows.
//!
//! `PersistedState` is the serializable representation of everything the
//! sprint engine writes: sprints, membership edges, and metrics snapshots.
//! Card, column, and board data are owned by external services and are
//! never persisted here. All fields use `#[serde(default)]` so older files
//! missing a section still load.

use serde::{Deserialize, Serialize};

use crate::membership::CardSprintMembership;
use crate::metrics_snapshot::MetricsSnapshot;
use crate::sprint::Sprint;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub sprints: Vec<Sprint>,

    #[serde(default)]
    pub memberships: Vec<CardSprintMembership>,

    #[serde(default)]
    pub snapshots: Vec<MetricsSnapshot>,
}

impl PersistedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sprints.is_empty() && self.memberships.is_empty() && self.snapshots.is_empty()
    }
}
