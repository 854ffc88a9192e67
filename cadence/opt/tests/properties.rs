mod common;

use cadence_ir::{EdgeKind, ScopeKind};
use cadence_opt::analysis::ResourceExtractor;
use cadence_opt::passes::{RegionSchedule, Scheduler, SchedulerConfig};
use common::{Op, Single, single};
use proptest::prelude::*;
use std::collections::HashMap;

type Edges = Vec<(usize, usize, EdgeKind)>;

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Plain), Just(Op::Mult), Just(Op::Add)]
}

fn edge_kind() -> impl Strategy<Value = EdgeKind> {
    prop_oneof![
        3 => Just(EdgeKind::DefUse),
        2 => Just(EdgeKind::Seq),
        2 => Just(EdgeKind::Anti),
        1 => Just(EdgeKind::Back),
    ]
}

/// Random graphs that are acyclic once back edges are removed. Forward
/// edges point from lower to higher indices and back edges the other way.
fn dag(max: usize) -> impl Strategy<Value = (Vec<Op>, Edges)> {
    (1..max).prop_flat_map(|n| {
        (
            prop::collection::vec(op(), n),
            prop::collection::vec((0..n, 0..n, edge_kind()), 0..3 * n),
        )
            .prop_map(|(ops, edges)| {
                let edges = edges
                    .into_iter()
                    .filter(|(a, b, _)| a != b)
                    .map(|(a, b, k)| {
                        if k == EdgeKind::Back {
                            (a.max(b), a.min(b), k)
                        } else {
                            (a.min(b), a.max(b), k)
                        }
                    })
                    .collect();
                (ops, edges)
            })
    })
}

fn run(f: &Single, max_func_unit: usize) -> RegionSchedule {
    let config = SchedulerConfig::default().with_max_func_unit(max_func_unit);
    let sched = Scheduler::new(config).schedule_context(&f.ctx).unwrap();
    sched
        .scope(f.scope)
        .and_then(|s| s.region(f.region))
        .cloned()
        .unwrap()
}

proptest! {
    #[test]
    fn priorities_increase_along_edges((ops, edges) in dag(24)) {
        let f = single(ScopeKind::Function, &ops, &edges);
        let region = run(&f, 10);
        for (a, b, kind) in &edges {
            if *kind != EdgeKind::Back {
                let (pa, pb) = (
                    region.priorities.get(f.nodes[*a]),
                    region.priorities.get(f.nodes[*b]),
                );
                prop_assert!(pb > pa, "{a}->{b}: {pa} !< {pb}");
            }
        }
    }

    #[test]
    fn successors_respect_predecessors(
        (ops, edges) in dag(24),
        units in 1usize..4,
    ) {
        let f = single(ScopeKind::Function, &ops, &edges);
        let region = run(&f, units);
        for (a, b, kind) in &edges {
            let ta = region.timing(f.nodes[*a]).unwrap();
            let tb = region.timing(f.nodes[*b]).unwrap();
            match kind {
                EdgeKind::DefUse | EdgeKind::Seq => prop_assert!(tb.begin >= ta.end),
                EdgeKind::Anti => prop_assert!(tb.begin >= ta.begin),
                EdgeKind::Back => (),
            }
        }
    }

    #[test]
    fn units_are_never_oversubscribed(
        (ops, edges) in dag(24),
        units in 1usize..4,
    ) {
        let f = single(ScopeKind::Function, &ops, &edges);
        let region = run(&f, units);
        let graph = &f.ctx.scopes[f.scope].regions[f.region];
        let mut busy = HashMap::new();
        for n in &f.nodes {
            let Some(res) = ResourceExtractor::needed_resource(&graph.node(*n).tag).unwrap() else {
                continue;
            };
            let t = region.timing(*n).unwrap();
            prop_assert!(t.instance_num < units);
            for cycle in t.begin..t.begin + t.latency().max(1) {
                *busy.entry((res, cycle)).or_insert(0usize) += 1;
            }
        }
        prop_assert!(busy.values().all(|count| *count <= units));
    }

    #[test]
    fn schedules_are_reproducible(
        (ops, edges) in dag(16),
        units in 1usize..4,
    ) {
        let f = single(ScopeKind::Function, &ops, &edges);
        prop_assert_eq!(run(&f, units), run(&f, units));
    }
}
