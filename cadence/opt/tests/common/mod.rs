#![allow(dead_code)]
use cadence_ir::{
    self as ir, BinaryOp, BlockIdx, Builder, EdgeKind, Expr, NodeIdx,
    RegionIdx, SchedulingMode, Scope, ScopeIdx, ScopeKind, StmKind, Type,
};

/// Shape of a generated statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `x = 1`, one cycle and no shared unit.
    Plain,
    /// `x = x * 3`
    Mult,
    /// `x = x + 1`
    Add,
}

/// A context with one scope holding one region.
pub struct Single {
    pub ctx: ir::Context,
    pub scope: ScopeIdx,
    pub region: RegionIdx,
    pub nodes: Vec<NodeIdx>,
}

pub fn stm(b: &mut Builder, op: Op) -> StmKind {
    let x = Expr::Temp(b.add_var("x", Type::int(32)));
    let src = match op {
        Op::Plain => Expr::int(1),
        Op::Mult => Expr::binop(BinaryOp::Mult, x.clone(), Expr::int(3)),
        Op::Add => Expr::binop(BinaryOp::Add, x.clone(), Expr::int(1)),
    };
    StmKind::Move { dst: x, src }
}

pub fn add_ops(
    b: &mut Builder,
    region: RegionIdx,
    block: BlockIdx,
    ops: &[Op],
) -> Vec<NodeIdx> {
    ops.iter()
        .map(|op| {
            let kind = stm(b, *op);
            b.add_stm(region, block, kind)
        })
        .collect()
}

pub fn single(
    kind: ScopeKind,
    ops: &[Op],
    edges: &[(usize, usize, EdgeKind)],
) -> Single {
    let mut scope = Scope::new("f", kind);
    let mut b = Builder::new(&mut scope);
    let blk = b.add_block("entry", SchedulingMode::Default);
    let region = b.add_region("f", None);
    let nodes = add_ops(&mut b, region, blk, ops);
    for (from, to, kind) in edges {
        b.add_edge(region, nodes[*from], nodes[*to], *kind);
    }
    let mut ctx = ir::Context::default();
    let scope = ctx.add_scope(scope);
    Single {
        ctx,
        scope,
        region,
        nodes,
    }
}
