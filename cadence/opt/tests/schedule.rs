mod common;

use cadence_ir::{
    self as ir, Builder, Builtin, EdgeKind, Expr, RegionIdx, SchedulingMode,
    Scope, ScopeKind, StmKind, Type,
};
use cadence_opt::analysis::{CALL_MINIMUM_STEP, Resource};
use cadence_opt::passes::{Scheduler, SchedulerConfig};
use common::{Op, add_ops, single, stm};

#[test]
fn join_waits_for_all_sources() {
    use EdgeKind::DefUse;
    let f = single(
        ScopeKind::Function,
        &[Op::Plain, Op::Plain, Op::Plain, Op::Plain],
        &[(0, 3, DefUse), (1, 3, DefUse), (2, 3, DefUse)],
    );
    let sched = Scheduler::default().schedule_context(&f.ctx).unwrap();
    let region = sched.scope(f.scope).and_then(|s| s.region(f.region)).unwrap();
    let begins: Vec<_> =
        f.nodes.iter().map(|n| region.timing(*n).unwrap().begin).collect();
    assert_eq!(begins, vec![0, 0, 0, 1]);
    assert_eq!(region.latency, 2);
    assert!(f.nodes.iter().all(|n| region.timing(*n).unwrap().instance_num == 0));
}

#[test]
fn full_unit_pushes_to_next_cycle() {
    let f = single(ScopeKind::Function, &[Op::Mult, Op::Mult, Op::Mult], &[]);
    let config = SchedulerConfig::default().with_max_func_unit(2);
    let sched = Scheduler::new(config).schedule_context(&f.ctx).unwrap();
    let region = sched.scope(f.scope).and_then(|s| s.region(f.region)).unwrap();
    let placed: Vec<_> = f
        .nodes
        .iter()
        .map(|n| {
            let t = region.timing(*n).unwrap();
            (t.begin, t.instance_num)
        })
        .collect();
    assert_eq!(placed, vec![(0, 0), (0, 1), (1, 0)]);
    assert_eq!(region.latency, 2);
}

#[test]
fn different_operators_do_not_contend() {
    let f = single(ScopeKind::Function, &[Op::Mult, Op::Add], &[]);
    let config = SchedulerConfig::default().with_max_func_unit(1);
    let sched = Scheduler::new(config).schedule_context(&f.ctx).unwrap();
    let region = sched.scope(f.scope).and_then(|s| s.region(f.region)).unwrap();
    assert!(f.nodes.iter().all(|n| region.timing(*n).unwrap().begin == 0));
}

/// `main` calls `inner`, whose body is a chain of `len` statements, and
/// uses the result in the following statement.
fn caller_and_callee(len: usize) -> (ir::Context, RegionIdx, Vec<cadence_ir::NodeIdx>) {
    let mut ctx = ir::Context::default();

    let mut inner = Scope::new("inner", ScopeKind::Function);
    let mut b = Builder::new(&mut inner);
    let blk = b.add_block("entry", SchedulingMode::Default);
    let r = b.add_region("inner", None);
    let chain = add_ops(&mut b, r, blk, &vec![Op::Plain; len]);
    for w in chain.windows(2) {
        b.add_edge(r, w[0], w[1], EdgeKind::DefUse);
    }
    // Added first so that its index is lower than the caller's.
    let inner = ctx.add_scope(inner);

    let mut main = Scope::new("main", ScopeKind::Function);
    let mut b = Builder::new(&mut main);
    let blk = b.add_block("entry", SchedulingMode::Default);
    let r = b.add_region("main", None);
    let y = Expr::Temp(b.add_var("y", Type::int(32)));
    let call = b.add_stm(
        r,
        blk,
        StmKind::Move {
            dst: y.clone(),
            src: Expr::call(inner, None, vec![]),
        },
    );
    let kind = stm(&mut b, Op::Plain);
    let after = b.add_stm(r, blk, kind);
    b.add_edge(r, call, after, EdgeKind::DefUse);
    ctx.add_scope(main);
    (ctx, r, vec![call, after])
}

#[test]
fn callee_latency_is_used_at_call_site() {
    let (ctx, r, nodes) = caller_and_callee(4);
    let main = ctx.find_scope("main".into()).unwrap();
    let inner = ctx.find_scope("inner".into()).unwrap();

    let mut scheduler = Scheduler::default();
    let sched = scheduler.schedule_context(&ctx).unwrap();
    assert_eq!(sched.scope(inner).and_then(|s| s.latency), Some(4));

    let region = sched.scope(main).and_then(|s| s.region(r)).unwrap();
    let call = region.timing(nodes[0]).unwrap();
    assert_eq!((call.begin, call.end), (0, 4));
    assert_eq!(region.timing(nodes[1]).unwrap().begin, 4);
    assert_eq!(scheduler.measured().scope(main), Some(5));
}

#[test]
fn unscheduled_callee_costs_the_minimum() {
    let (ctx, r, nodes) = caller_and_callee(4);
    let main = ctx.find_scope("main".into()).unwrap();
    let sched = Scheduler::default().schedule_scope(&ctx, main).unwrap();
    let call = sched.region(r).and_then(|s| s.timing(nodes[0])).unwrap();
    assert_eq!(call.latency(), CALL_MINIMUM_STEP);
}

#[test]
fn call_sites_share_the_callee() {
    let (mut ctx, _, _) = caller_and_callee(1);
    let inner = ctx.find_scope("inner".into()).unwrap();
    let main = ctx.find_scope("main".into()).unwrap();
    let mut b = Builder::new(&mut ctx.scopes[main]);
    let blk = b.scope.blocks.keys().next().unwrap();
    let r = b.scope.regions.keys().next().unwrap();
    let second = b.add_stm(
        r,
        blk,
        StmKind::Expr(Expr::call(inner, None, vec![])),
    );
    assert_eq!(
        cadence_opt::analysis::ResourceExtractor::needed_resource(
            &ctx.scopes[main].regions[r].node(second).tag
        )
        .unwrap(),
        Some(Resource::Call(inner))
    );

    let config = SchedulerConfig::default().with_max_func_unit(1);
    let sched = Scheduler::new(config).schedule_context(&ctx).unwrap();
    let region = sched.scope(main).and_then(|s| s.region(r)).unwrap();
    // The first call holds the only instance during cycle 0.
    assert_eq!(region.timing(second).unwrap().begin, 1);
}

#[test]
fn nested_region_is_scheduled_first() {
    let mut scope = Scope::new("loop", ScopeKind::Function);
    let mut b = Builder::new(&mut scope);
    let blk = b.add_block("entry", SchedulingMode::Default);
    let outer = b.add_region("outer", None);
    let body = b.add_region("body", Some(outer));
    let inner_nodes = add_ops(&mut b, body, blk, &[Op::Plain, Op::Plain, Op::Plain]);
    b.add_edge(body, inner_nodes[0], inner_nodes[1], EdgeKind::Seq);
    b.add_edge(body, inner_nodes[1], inner_nodes[2], EdgeKind::Seq);
    b.add_edge(body, inner_nodes[2], inner_nodes[0], EdgeKind::Back);
    let pre = add_ops(&mut b, outer, blk, &[Op::Plain])[0];
    let nested = b.add_nested(outer, body).unwrap();
    let post = add_ops(&mut b, outer, blk, &[Op::Plain])[0];
    b.add_edge(outer, pre, nested, EdgeKind::Seq);
    b.add_edge(outer, nested, post, EdgeKind::Seq);
    let mut ctx = ir::Context::default();
    let idx = ctx.add_scope(scope);

    let sched = Scheduler::default().schedule_scope(&ctx, idx).unwrap();
    let order: Vec<_> = sched.regions.iter().map(|(r, _)| *r).collect();
    assert_eq!(order, vec![body, outer]);
    let outer_sched = sched.region(outer).unwrap();
    let loop_node = outer_sched.timing(nested).unwrap();
    assert_eq!((loop_node.begin, loop_node.end), (1, 4));
    assert_eq!(outer_sched.timing(post).unwrap().begin, 4);
    assert_eq!(sched.latency, Some(5));
}

#[test]
fn clock_sleep_delays_successors() {
    let mut scope = Scope::new("tb", ScopeKind::Testbench);
    let mut b = Builder::new(&mut scope);
    let blk = b.add_block("entry", SchedulingMode::Timed);
    let r = b.add_region("tb", None);
    let sleep = b.add_stm(
        r,
        blk,
        StmKind::Expr(Expr::SysCall {
            builtin: Builtin::ClkSleep,
            args: vec![Expr::int(7)],
        }),
    );
    let next = add_ops(&mut b, r, blk, &[Op::Plain])[0];
    b.add_edge(r, sleep, next, EdgeKind::Anti);
    let mut ctx = ir::Context::default();
    let idx = ctx.add_scope(scope);

    let sched = Scheduler::default().schedule_scope(&ctx, idx).unwrap();
    let region = sched.region(r).unwrap();
    // Testbenches wait for the end of every predecessor.
    assert_eq!(region.timing(next).unwrap().begin, 7);
    assert_eq!(sched.latency, Some(8));
}

#[test]
fn second_contended_resource_names_the_region() {
    let mut scope = Scope::new("f", ScopeKind::Function);
    let mut b = Builder::new(&mut scope);
    let blk = b.add_block("entry", SchedulingMode::Default);
    let r = b.add_region("body", None);
    let x = Expr::Temp(b.add_var("x", Type::int(32)));
    b.add_stm(
        r,
        blk,
        StmKind::Move {
            dst: x.clone(),
            src: Expr::binop(
                ir::BinaryOp::Add,
                Expr::binop(ir::BinaryOp::Mult, x.clone(), x.clone()),
                x,
            ),
        },
    );
    let mut ctx = ir::Context::default();
    let idx = ctx.add_scope(scope);
    let err = Scheduler::default().schedule_scope(&ctx, idx).unwrap_err();
    assert!(err.to_string().contains("region `body`"), "{err}");
}

#[test]
fn scheduling_is_deterministic() {
    use EdgeKind::*;
    let f = single(
        ScopeKind::Function,
        &[Op::Mult, Op::Add, Op::Mult, Op::Plain, Op::Mult, Op::Add],
        &[(0, 2, DefUse), (1, 2, Anti), (2, 4, Seq), (3, 4, DefUse), (1, 5, DefUse)],
    );
    let config = SchedulerConfig::default().with_max_func_unit(1);
    let first = Scheduler::new(config).schedule_context(&f.ctx).unwrap();
    let second = Scheduler::new(config).schedule_context(&f.ctx).unwrap();
    assert_eq!(first, second);
}
