pub mod card;
pub mod charts;
pub mod column;
pub mod membership;
pub mod metrics_snapshot;
pub mod persisted;
pub mod progress;
pub mod sprint;

pub use card::{Card, CardId};
pub use charts::{
    BurndownPoint, BurndownSeries, BurnupPoint, BurnupSeries, ChartMode, CumulativeFlowPoint,
    CumulativeFlowSeries, SprintStats, VelocityEntry, VelocitySeries,
};
pub use column::{BoardId, Column, ColumnId};
pub use membership::{CardSprintMembership, MembershipTable};
pub use metrics_snapshot::MetricsSnapshot;
pub use persisted::PersistedState;
pub use progress::SprintProgress;
pub use sprint::{Sprint, SprintId, SprintStatus, SprintUpdate};
