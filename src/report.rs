use cadence_idx::IndexRef;
use cadence_ir::{self as ir, GetName, Printer};
use cadence_opt::analysis::ResourceExtractor;
use cadence_opt::passes::{ContextSchedule, RegionSchedule};
use cadence_utils::CadenceResult;
use serde::Serialize;

/// The schedule of a program as handed to the code generator.
#[derive(Serialize)]
pub struct Report<'a> {
    source: String,
    scopes: Vec<ScopeReport<'a>>,
}

#[derive(Serialize)]
struct ScopeReport<'a> {
    name: &'a str,
    latency: Option<u64>,
    regions: Vec<RegionReport<'a>>,
}

#[derive(Serialize)]
struct RegionReport<'a> {
    name: &'a str,
    parent: Option<&'a str>,
    latency: u64,
    nodes: Vec<NodeReport>,
}

#[derive(Serialize)]
struct NodeReport {
    index: usize,
    stm: String,
    priority: i64,
    begin: u64,
    end: u64,
    latency: u64,
    instance_num: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource: Option<String>,
}

impl<'a> Report<'a> {
    pub fn new(
        source: String,
        ctx: &'a ir::Context,
        sched: &ContextSchedule,
    ) -> CadenceResult<Self> {
        let mut scopes = Vec::with_capacity(sched.scopes.len());
        for (idx, scope_sched) in &sched.scopes {
            let scope = &ctx.scopes[*idx];
            let regions = scope_sched
                .regions
                .iter()
                .map(|(r, region_sched)| {
                    region_report(ctx, scope, &scope.regions[*r], region_sched)
                })
                .collect::<CadenceResult<_>>()?;
            scopes.push(ScopeReport {
                name: scope.name().as_str(),
                latency: scope_sched.latency,
                regions,
            });
        }
        Ok(Report { source, scopes })
    }
}

fn region_report<'a>(
    ctx: &'a ir::Context,
    scope: &'a ir::Scope,
    graph: &'a ir::OpGraph,
    sched: &RegionSchedule,
) -> CadenceResult<RegionReport<'a>> {
    let mut nodes = Vec::with_capacity(graph.node_count());
    for n in graph.nodes() {
        // Every node is reachable from a source so every node is timed.
        let Some(timing) = sched.timing(n) else {
            continue;
        };
        let tag = &graph.node(n).tag;
        let resource = ResourceExtractor::needed_resource(tag)?
            .map(|res| res.name(ctx));
        nodes.push(NodeReport {
            index: n.index(),
            stm: Printer::tag_to_str(tag, scope, ctx),
            priority: sched.priorities.get(n),
            begin: timing.begin,
            end: timing.end,
            latency: timing.latency(),
            instance_num: timing.instance_num,
            resource,
        });
    }
    Ok(RegionReport {
        name: graph.name().as_str(),
        parent: graph.parent().map(|p| scope.regions[p].name().as_str()),
        latency: sched.latency,
        nodes,
    })
}
