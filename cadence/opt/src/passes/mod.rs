//! Passes over the whole program.
mod schedule;

pub use schedule::{
    ContextSchedule, NodeTiming, PredPolicy, RegionSchedule, ScopeSchedule,
    Scheduler, SchedulerConfig,
};
