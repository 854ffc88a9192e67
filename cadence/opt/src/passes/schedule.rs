use crate::analysis::{
    LatencyModel, MAX_FUNC_UNIT, MeasuredLatency, PriorityMap, ResourceExtractor,
    ResourceTable,
};
use crate::traversal::{Named, RegionTraversal, ScopeTraversal};
use cadence_idx::SecondaryMap;
use cadence_ir::{self as ir, EdgeKind, NodeIdx, OpGraph, RegionIdx, ScopeIdx};
use cadence_utils::{CadenceResult, Error};
use std::collections::BTreeSet;

/// Occupants of a scope's resource table. Regions of one scope share the
/// table so node indices are qualified by their region.
type Occupant = (RegionIdx, NodeIdx);

/// Knobs of the list scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Number of instances of every shared function unit.
    pub max_func_unit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            max_func_unit: MAX_FUNC_UNIT,
        }
    }
}

impl SchedulerConfig {
    pub fn with_max_func_unit(mut self, max_func_unit: usize) -> Self {
        self.max_func_unit = max_func_unit;
        self
    }
}

/// How the earliest start of a node follows from its predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredPolicy {
    /// Wait for the end of the latest predecessor when some predecessor is a
    /// data or sequencing dependency. Otherwise only wait for the latest
    /// predecessor to begin.
    Default,
    /// Always wait for the end of the latest predecessor.
    Testbench,
}

impl PredPolicy {
    pub fn for_scope(scope: &ir::Scope) -> Self {
        if scope.is_testbench() {
            PredPolicy::Testbench
        } else {
            PredPolicy::Default
        }
    }

    /// Earliest cycle `node` may begin given the predecessors scheduled so
    /// far. Sources begin at cycle 0.
    pub fn earliest_start(
        self,
        graph: &OpGraph,
        node: NodeIdx,
        timings: &SecondaryMap<NodeIdx, Option<NodeTiming>>,
    ) -> u64 {
        let scheduled: Vec<NodeTiming> = graph
            .preds_without_back(node)
            .into_iter()
            .filter_map(|p| *timings.get(p))
            .collect();
        let strict = match self {
            PredPolicy::Testbench => true,
            PredPolicy::Default => [EdgeKind::DefUse, EdgeKind::Seq]
                .into_iter()
                .any(|k| !graph.preds_of_kind_without_back(node, k).is_empty()),
        };
        let latest = scheduled.iter().map(|t| if strict { t.end } else { t.begin });
        latest.max().unwrap_or(0)
    }
}

/// The cycles assigned to one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTiming {
    pub begin: u64,
    pub end: u64,
    /// Instance of the shared resource the node uses. Zero when it uses
    /// none.
    pub instance_num: usize,
}

impl NodeTiming {
    pub fn latency(&self) -> u64 {
        self.end - self.begin
    }
}

/// The schedule of one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSchedule {
    pub priorities: PriorityMap,
    timings: SecondaryMap<NodeIdx, Option<NodeTiming>>,
    /// Largest end cycle of the last wave.
    pub latency: u64,
}

impl RegionSchedule {
    pub fn timing(&self, node: NodeIdx) -> Option<NodeTiming> {
        *self.timings.get(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSchedule {
    /// Regions in the order they were scheduled, innermost first.
    pub regions: Vec<(RegionIdx, RegionSchedule)>,
    /// Latency of the last region scheduled, `None` without regions.
    pub latency: Option<u64>,
}

impl ScopeSchedule {
    pub fn region(&self, idx: RegionIdx) -> Option<&RegionSchedule> {
        self.regions
            .iter()
            .find_map(|(r, sched)| (*r == idx).then_some(sched))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextSchedule {
    /// Scopes with at least one region, callees before their callers.
    pub scopes: Vec<(ScopeIdx, ScopeSchedule)>,
}

impl ContextSchedule {
    pub fn scope(&self, idx: ScopeIdx) -> Option<&ScopeSchedule> {
        self.scopes
            .iter()
            .find_map(|(s, sched)| (*s == idx).then_some(sched))
    }
}

/// List scheduler assigning a begin and end cycle to every operation.
///
/// Scopes are scheduled callees first and regions innermost first so that
/// the latency of every call and nested region is known when it is needed.
/// Every scope gets a fresh [ResourceTable].
#[derive(Debug, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
    measured: MeasuredLatency,
}

impl Named for Scheduler {
    fn name() -> &'static str {
        "schedule"
    }

    fn description() -> &'static str {
        "assign clock cycles to the operations of every region"
    }
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Scheduler {
            config,
            measured: MeasuredLatency::default(),
        }
    }

    /// Latencies of the scopes scheduled so far.
    pub fn measured(&self) -> &MeasuredLatency {
        &self.measured
    }

    pub fn schedule_context(
        &mut self,
        ctx: &ir::Context,
    ) -> CadenceResult<ContextSchedule> {
        let mut out = ContextSchedule::default();
        for idx in ScopeTraversal::new(ctx)?.iter() {
            if ctx.scopes[idx].regions.is_empty() {
                continue;
            }
            let sched = self.schedule_scope(ctx, idx)?;
            out.scopes.push((idx, sched));
        }
        Ok(out)
    }

    /// Schedule every region of one scope. Callees must have been scheduled
    /// by this scheduler already, otherwise calls to them are assumed to take
    /// the minimum call latency.
    pub fn schedule_scope(
        &mut self,
        ctx: &ir::Context,
        idx: ScopeIdx,
    ) -> CadenceResult<ScopeSchedule> {
        let scope = &ctx.scopes[idx];
        let policy = PredPolicy::for_scope(scope);
        let mut table = ResourceTable::new(self.config.max_func_unit);
        let mut region_latency = SecondaryMap::new();
        let mut regions = Vec::new();
        let mut latency = None;

        for r in RegionTraversal::new(scope)?.iter() {
            let model =
                LatencyModel::new(ctx, scope, &self.measured, &region_latency);
            let sched = schedule_region(
                &scope.regions[r],
                r,
                &model,
                policy,
                &mut table,
            )
            .map_err(|e| {
                e.with_post_msg(Some(format!(
                    "while scheduling region `{}` of scope `{}`",
                    scope.regions[r].name(),
                    scope.name
                )))
            })?;
            log::info!(
                "region `{}` of `{}`: latency {}",
                scope.regions[r].name(),
                scope.name,
                sched.latency
            );
            region_latency.insert(r, Some(sched.latency));
            latency = Some(sched.latency);
            regions.push((r, sched));
        }

        if let Some(lat) = latency {
            log::info!("scope `{}`: latency {lat}", scope.name);
            self.measured.record_scope(idx, lat);
        }
        Ok(ScopeSchedule { regions, latency })
    }
}

/// List-schedule one region in waves. The first wave holds the nodes with
/// the highest priority and every following wave the successors of the
/// previous one. A node reached again in a later wave is scheduled again,
/// so its final timing comes after all of its predecessors.
fn schedule_region(
    graph: &OpGraph,
    region: RegionIdx,
    model: &LatencyModel,
    policy: PredPolicy,
    table: &mut ResourceTable<Occupant>,
) -> CadenceResult<RegionSchedule> {
    let priorities = PriorityMap::compute(graph)?;
    let mut timings = SecondaryMap::new();
    let mut wave = priorities.highest_priority_nodes(graph);
    let mut latency = 0;

    while !wave.is_empty() {
        wave.sort_by_key(|n| (priorities.get(*n), graph.node(*n).stm_index, *n));
        let mut next = BTreeSet::new();
        latency = 0;
        for n in wave {
            let node = graph.node(n);
            let steps = model.latency(&node.tag)?;
            let mut begin = policy.earliest_start(graph, n, &timings);
            let mut instance_num = 0;
            if let Some(res) = ResourceExtractor::needed_resource(&node.tag)? {
                (begin, instance_num) =
                    table.earliest_free_time((region, n), res, begin, steps)?;
            }
            let end = begin.checked_add(steps).ok_or_else(|| {
                Error::malformed_structure(format!(
                    "node {n} takes {steps} cycles from cycle {begin} which overflows the cycle count"
                ))
            })?;
            let timing = NodeTiming {
                begin,
                end,
                instance_num,
            };
            log::debug!("node {n} of `{}`: {timing:?}", graph.name());
            timings.insert(n, Some(timing));
            latency = latency.max(timing.end);
            next.extend(graph.succs_without_back(n));
        }
        wave = next.into_iter().collect();
    }

    Ok(RegionSchedule {
        priorities,
        timings,
        latency,
    })
}
