pub mod engine;
pub mod lifecycle;
pub mod metrics;
pub mod provider;
pub mod recorder;
pub mod state;

pub use engine::SprintEngine;
pub use lifecycle::{CreateSprintRequest, SprintLifecycleManager};
pub use metrics::MetricsEngine;
pub use provider::{BoardData, InMemoryBoardData};
pub use recorder::{PassSummary, SnapshotRecorder};
pub use state::EngineState;
