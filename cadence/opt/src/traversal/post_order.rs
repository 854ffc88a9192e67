use cadence_idx::IndexRef;
use cadence_ir::{self as ir, Expr, NodeTag, RegionIdx, ScopeIdx, StmKind};
use cadence_utils::{CadenceResult, Error};
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};

/// Topologically order `count` items so that for every `(before, after)`
/// edge, `before` comes first. On a cycle, returns an item on it.
fn post_order<K: IndexRef>(
    count: usize,
    edges: impl IntoIterator<Item = (K, K)>,
) -> Result<Vec<K>, K> {
    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(count, 0);
    for _ in 0..count {
        graph.add_node(());
    }
    for (before, after) in edges {
        graph.add_edge(
            NodeIndex::new(before.index()),
            NodeIndex::new(after.index()),
            (),
        );
    }
    algo::toposort(&graph, None)
        .map(|order| order.into_iter().map(|n| K::new(n.index())).collect())
        .map_err(|cycle| K::new(cycle.node_id().index()))
}

/// Order in which scopes are scheduled.
///
/// If scope `B` calls scope `A` then `A` is visited before `B`, so the
/// measured latency of `A` is known when the call in `B` is scheduled.
/// Recursion has no such order and is rejected.
pub struct ScopeTraversal {
    order: Vec<ScopeIdx>,
}

impl ScopeTraversal {
    pub fn new(ctx: &ir::Context) -> CadenceResult<Self> {
        let mut calls = Vec::new();
        for (caller, scope) in ctx.scopes.iter() {
            for (_, region) in scope.regions.iter() {
                for n in region.nodes() {
                    if let NodeTag::Stm(stm) = &region.node(n).tag {
                        for callee in callees_of(&stm.kind) {
                            calls.push((callee, caller));
                        }
                    }
                }
            }
        }
        let order = post_order(ctx.scopes.len(), calls).map_err(|scope| {
            Error::pass_assumption(
                "schedule",
                format!(
                    "scope `{}` is part of a recursive call chain",
                    ctx.scopes[scope].name
                ),
            )
        })?;
        Ok(ScopeTraversal { order })
    }

    pub fn iter(&self) -> impl Iterator<Item = ScopeIdx> + '_ {
        self.order.iter().copied()
    }
}

/// Order in which the regions of a scope are scheduled: every region comes
/// after all regions nested in it.
pub struct RegionTraversal {
    order: Vec<RegionIdx>,
}

impl RegionTraversal {
    pub fn new(scope: &ir::Scope) -> CadenceResult<Self> {
        let nesting = scope
            .regions
            .iter()
            .filter_map(|(idx, r)| r.parent().map(|p| (idx, p)));
        let order = post_order(scope.regions.len(), nesting).map_err(|r| {
            Error::malformed_structure(format!(
                "region `{}` of scope `{}` is nested in itself",
                scope.regions[r].name(),
                scope.name
            ))
        })?;
        Ok(RegionTraversal { order })
    }

    pub fn iter(&self) -> impl Iterator<Item = RegionIdx> + '_ {
        self.order.iter().copied()
    }
}

/// Every scope called from a statement.
fn callees_of(stm: &StmKind) -> Vec<ScopeIdx> {
    fn walk(e: &Expr, out: &mut Vec<ScopeIdx>) {
        match e {
            Expr::Call {
                callee,
                receiver,
                args,
            } => {
                out.push(*callee);
                receiver.iter().for_each(|r| walk(r, out));
                args.iter().for_each(|a| walk(a, out));
            }
            Expr::Attr { base: exp, .. } | Expr::UnOp { exp, .. } => {
                walk(exp, out)
            }
            Expr::BinOp { left, right, .. } | Expr::RelOp { left, right, .. } => {
                walk(left, out);
                walk(right, out);
            }
            Expr::CondOp { cond, left, right } => {
                walk(cond, out);
                walk(left, out);
                walk(right, out);
            }
            Expr::SysCall { args, .. }
            | Expr::New { args, .. }
            | Expr::Array { items: args, .. } => {
                args.iter().for_each(|a| walk(a, out))
            }
            Expr::MRef { mem, offset } => {
                walk(mem, out);
                walk(offset, out);
            }
            Expr::MStore { mem, offset, value } => {
                walk(mem, out);
                walk(offset, out);
                walk(value, out);
            }
            Expr::Const(_) | Expr::Temp(_) => {}
        }
    }

    let mut out = Vec::new();
    match stm {
        StmKind::Move { dst, src } => {
            walk(dst, &mut out);
            walk(src, &mut out);
        }
        StmKind::Expr(e) | StmKind::Ret(e) | StmKind::CJump { cond: e, .. } => {
            walk(e, &mut out)
        }
        StmKind::MCJump { conds, .. } => {
            conds.iter().for_each(|c| walk(c, &mut out))
        }
        StmKind::Phi { var, args } | StmKind::UPhi { var, args } => {
            walk(var, &mut out);
            args.iter().for_each(|a| walk(a, &mut out));
        }
        StmKind::Jump { .. } => {}
    }
    out
}
