//! Analyses used by the scheduler. They read the IR and never modify it.
mod latency;
mod priority;
mod resource_table;
mod resources;

pub use latency::{CALL_MINIMUM_STEP, LatencyModel, MeasuredLatency, UNIT_STEP};
pub use priority::{PriorityMap, UNSET_PRIORITY};
pub use resource_table::{MAX_FUNC_UNIT, ResourceTable};
pub use resources::{OpClass, Resource, ResourceExtractor};
