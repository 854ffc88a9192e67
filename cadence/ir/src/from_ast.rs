use super::{
    BlockIdx, Builder, Builtin, Const, Context, Expr, Id, MemInfo, NodeTag,
    OpGraph, OpNode, RegionIdx, SchedulingMode, Scope, ScopeIdx, Stm, StmKind,
    Symbol, Type,
};
use cadence_frontend::{
    Workspace,
    ast::{self, ConstDef, ExprDef, NodeDef, StmDef, TypeDef},
};
use cadence_idx::IndexRef;
use cadence_utils::{CadenceResult, Error};
use std::collections::HashMap;

/// Names of every scope in the program, resolved before any scope body is
/// built so that calls and types may refer to scopes defined later.
#[derive(Default)]
struct SigCtx {
    scopes: HashMap<Id, ScopeIdx>,
}

impl SigCtx {
    fn scope(&self, name: Id) -> CadenceResult<ScopeIdx> {
        self.scopes
            .get(&name)
            .copied()
            .ok_or_else(|| Error::undefined(name, "scope"))
    }
}

/// Construct an IR representation using a parsed AST.
pub fn ast_to_ir(workspace: Workspace) -> CadenceResult<Context> {
    let mut ctx = Context::default();
    let mut sig_ctx = SigCtx::default();

    for def in &workspace.scopes {
        let mut scope = Scope::new(def.name, def.kind);
        if let Some(orig) = def.orig_name {
            scope = scope.with_orig_name(orig);
        }
        let idx = ctx.add_scope(scope);
        if sig_ctx.scopes.insert(def.name, idx).is_some() {
            return Err(Error::malformed_structure(format!(
                "scope `{}` is defined more than once",
                def.name
            )));
        }
    }

    for (pos, def) in workspace.scopes.into_iter().enumerate() {
        let name = def.name;
        let scope = &mut ctx.scopes[ScopeIdx::new(pos)];
        build_scope(def, &sig_ctx, scope).map_err(|err| {
            err.with_post_msg(Some(format!("while lowering scope `{name}`")))
        })?;
    }

    ctx.entry = workspace
        .entry
        .map(|name| sig_ctx.scope(name))
        .transpose()?;

    log::debug!("lowered {} scope(s)", ctx.scopes.len());
    Ok(ctx)
}

fn build_scope(
    def: ast::ScopeDef,
    sig_ctx: &SigCtx,
    scope: &mut Scope,
) -> CadenceResult<()> {
    scope.parent = def.parent.map(|p| sig_ctx.scope(p)).transpose()?;

    let mut builder = Builder::new(scope);
    for sym in def.symbols {
        if builder.scope.find_symbol(sym.name).is_some() {
            return Err(Error::malformed_structure(format!(
                "symbol `{}` is defined more than once",
                sym.name
            )));
        }
        let mut symbol = Symbol::new(sym.name, build_type(sym.typ, sig_ctx)?);
        symbol.alias = sym.alias;
        symbol.param = sym.param;
        builder.add_symbol(symbol);
    }

    for block in def.blocks {
        if builder.scope.find_block(block.name).is_some() {
            return Err(Error::malformed_structure(format!(
                "block `{}` is defined more than once",
                block.name
            )));
        }
        let mode = block
            .scheduling
            .as_deref()
            .map(str::parse::<SchedulingMode>)
            .transpose()
            .map_err(|err| {
                err.with_post_msg(Some(format!("in block `{}`", block.name)))
            })?
            .unwrap_or_default();
        builder.add_block(block.name, mode);
    }

    // Region indices follow definition order, so parents can be resolved by
    // position before any graph exists.
    let positions: HashMap<Id, RegionIdx> = def
        .regions
        .iter()
        .enumerate()
        .map(|(pos, r)| (r.name, RegionIdx::new(pos)))
        .collect();
    if positions.len() != def.regions.len() {
        return Err(Error::malformed_structure(
            "region names are not unique",
        ));
    }
    for region in &def.regions {
        let parent = region
            .parent
            .map(|p| {
                positions
                    .get(&p)
                    .copied()
                    .ok_or_else(|| Error::undefined(p, "region"))
            })
            .transpose()?;
        builder.scope.regions.push(OpGraph::new(region.name, parent));
    }
    for (pos, region) in def.regions.iter().enumerate() {
        if let Some(parent) = region.parent.and_then(|p| positions.get(&p)) {
            builder.scope.regions[*parent].add_child(RegionIdx::new(pos));
        }
    }

    for (pos, region) in def.regions.into_iter().enumerate() {
        let idx = RegionIdx::new(pos);
        let name = region.name;
        build_region(region, idx, sig_ctx, &mut builder).map_err(|err| {
            err.with_post_msg(Some(format!("in region `{name}`")))
        })?;
    }
    Ok(())
}

fn build_region(
    region: ast::RegionDef,
    idx: RegionIdx,
    sig_ctx: &SigCtx,
    builder: &mut Builder,
) -> CadenceResult<()> {
    let node_count = region.nodes.len();
    let mut nodes = Vec::with_capacity(node_count);
    for (pos, node) in region.nodes.into_iter().enumerate() {
        let op_node = match node {
            NodeDef::Stm { block, index, op } => {
                let block = builder
                    .scope
                    .find_block(block)
                    .ok_or_else(|| Error::undefined(block, "block"))?;
                let kind = build_stm(op, &*builder.scope, sig_ctx)?;
                OpNode {
                    tag: NodeTag::Stm(Stm::new(kind, block)),
                    stm_index: index.unwrap_or(pos as u32),
                }
            }
            NodeDef::Region(child) => {
                let child_idx = builder
                    .scope
                    .find_region(child)
                    .ok_or_else(|| Error::undefined(child, "region"))?;
                if builder.scope.regions[child_idx].parent() != Some(idx) {
                    return Err(Error::malformed_structure(format!(
                        "region `{child}` is used as a node outside of its parent"
                    )));
                }
                OpNode {
                    tag: NodeTag::Region(child_idx),
                    stm_index: pos as u32,
                }
            }
        };
        nodes.push(builder.scope.regions[idx].add_node(op_node));
    }

    for edge in region.edges {
        let (Some(from), Some(to)) = (nodes.get(edge.from), nodes.get(edge.to))
        else {
            return Err(Error::malformed_structure(format!(
                "edge {} -> {} refers to a node outside of the {node_count} node(s) of the region",
                edge.from, edge.to
            )));
        };
        builder.add_edge(idx, *from, *to, edge.kind);
    }
    Ok(())
}

fn build_type(typ: TypeDef, sig_ctx: &SigCtx) -> CadenceResult<Type> {
    Ok(match typ {
        TypeDef::Int { width, signed } => Type::Int { width, signed },
        TypeDef::Bool => Type::Bool,
        TypeDef::Seq { len, mem } => Type::Seq {
            len,
            mem: MemInfo {
                can_be_reg: mem.can_be_reg,
                immutable: mem.immutable,
                writable: mem.writable,
            },
        },
        TypeDef::Port {
            protocol,
            direction,
        } => Type::Port {
            protocol,
            direction,
        },
        TypeDef::Object(class) => {
            Type::Object(class.map(|c| sig_ctx.scope(c)).transpose()?)
        }
        TypeDef::Function(f) => Type::Function(sig_ctx.scope(f)?),
        TypeDef::None => Type::None,
        TypeDef::Undef => Type::Undef,
    })
}

fn build_block_ref(name: Id, scope: &Scope) -> CadenceResult<BlockIdx> {
    scope
        .find_block(name)
        .ok_or_else(|| Error::undefined(name, "block"))
}

fn build_stm(
    stm: StmDef,
    scope: &Scope,
    sig_ctx: &SigCtx,
) -> CadenceResult<StmKind> {
    let expr = |e: ExprDef| build_expr(e, scope, sig_ctx);
    let exprs = |es: Vec<ExprDef>| {
        es.into_iter()
            .map(|e| build_expr(e, scope, sig_ctx))
            .collect::<CadenceResult<Vec<_>>>()
    };
    Ok(match stm {
        StmDef::Move { dst, src } => StmKind::Move {
            dst: expr(dst)?,
            src: expr(src)?,
        },
        StmDef::Expr(e) => StmKind::Expr(expr(e)?),
        StmDef::CJump {
            cond,
            true_target,
            false_target,
        } => StmKind::CJump {
            cond: expr(cond)?,
            true_target: build_block_ref(true_target, scope)?,
            false_target: build_block_ref(false_target, scope)?,
        },
        StmDef::MCJump { conds, targets } => {
            if conds.len() != targets.len() {
                return Err(Error::malformed_structure(format!(
                    "mcjump has {} condition(s) but {} target(s)",
                    conds.len(),
                    targets.len()
                )));
            }
            StmKind::MCJump {
                conds: exprs(conds)?,
                targets: targets
                    .into_iter()
                    .map(|t| build_block_ref(t, scope))
                    .collect::<CadenceResult<_>>()?,
            }
        }
        StmDef::Jump { target, kind } => StmKind::Jump {
            target: build_block_ref(target, scope)?,
            kind,
        },
        StmDef::Ret(e) => StmKind::Ret(expr(e)?),
        StmDef::Phi { var, args } => StmKind::Phi {
            var: expr(var)?,
            args: exprs(args)?,
        },
        StmDef::UPhi { var, args } => StmKind::UPhi {
            var: expr(var)?,
            args: exprs(args)?,
        },
    })
}

fn build_expr(
    expr: ExprDef,
    scope: &Scope,
    sig_ctx: &SigCtx,
) -> CadenceResult<Expr> {
    let sub = |e: Box<ExprDef>| -> CadenceResult<Box<Expr>> {
        Ok(Box::new(build_expr(*e, scope, sig_ctx)?))
    };
    let list = |es: Vec<ExprDef>| {
        es.into_iter()
            .map(|e| build_expr(e, scope, sig_ctx))
            .collect::<CadenceResult<Vec<_>>>()
    };
    let symbol = |name: Id| {
        scope
            .find_symbol(name)
            .ok_or_else(|| Error::undefined(name, "symbol"))
    };
    Ok(match expr {
        ExprDef::Const(c) => Expr::Const(match c {
            ConstDef::Bool(b) => Const::Bool(b),
            ConstDef::Int(i) => Const::Int(i),
            ConstDef::Str(s) => Const::Str(Id::new(s)),
        }),
        ExprDef::Temp(name) => Expr::Temp(symbol(name)?),
        ExprDef::Attr { base, attr } => Expr::Attr {
            base: sub(base)?,
            attr: symbol(attr)?,
        },
        ExprDef::UnOp { op, exp } => Expr::UnOp { op, exp: sub(exp)? },
        ExprDef::BinOp { op, left, right } => Expr::BinOp {
            op,
            left: sub(left)?,
            right: sub(right)?,
        },
        ExprDef::RelOp { op, left, right } => Expr::RelOp {
            op,
            left: sub(left)?,
            right: sub(right)?,
        },
        ExprDef::CondOp { cond, left, right } => Expr::CondOp {
            cond: sub(cond)?,
            left: sub(left)?,
            right: sub(right)?,
        },
        ExprDef::Call {
            callee,
            receiver,
            args,
        } => Expr::Call {
            callee: sig_ctx.scope(callee)?,
            receiver: receiver.map(sub).transpose()?,
            args: list(args)?,
        },
        ExprDef::SysCall { name, args } => Expr::SysCall {
            builtin: Builtin::from_name(name.as_str()),
            args: list(args)?,
        },
        ExprDef::New { scope: class, args } => Expr::New {
            scope: sig_ctx.scope(class)?,
            args: list(args)?,
        },
        ExprDef::MRef { mem, offset } => Expr::MRef {
            mem: sub(mem)?,
            offset: sub(offset)?,
        },
        ExprDef::MStore { mem, offset, value } => Expr::MStore {
            mem: sub(mem)?,
            offset: sub(offset)?,
            value: sub(value)?,
        },
        ExprDef::Array { items, repeat } => Expr::Array {
            items: list(items)?,
            repeat,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::ast_to_ir;
    use crate::{CalleeKind, Expr, NodeTag, SchedulingMode, StmKind, Type};
    use cadence_frontend::Workspace;
    use cadence_utils::ErrorKind;

    fn lower(src: &str) -> cadence_utils::CadenceResult<crate::Context> {
        let ws: Workspace = src.parse()?;
        ast_to_ir(ws)
    }

    const PROGRAM: &str = r#"{
        "entry": "main",
        "scopes": [
            {"name": "main", "kind": "function",
             "symbols": [
                {"name": "x", "type": {"int": {"width": 8}}},
                {"name": "q", "type": {"object": "Queue"}}
             ],
             "blocks": [{"name": "b0", "scheduling": "pipeline"}, {"name": "b1"}],
             "regions": [
                {"name": "body", "parent": "top",
                 "nodes": [
                    {"stm": {"block": "b0", "op": {"move": {
                        "dst": {"temp": "x"},
                        "src": {"call": {"callee": "Queue.rd", "receiver": {"temp": "q"}}}}}}}
                 ]},
                {"name": "top",
                 "nodes": [
                    {"region": "body"},
                    {"stm": {"block": "b1", "index": 7, "op": {"ret": {"temp": "x"}}}}
                 ],
                 "edges": [{"from": 0, "to": 1, "kind": "def_use"}]}
             ]},
            {"name": "Queue", "kind": "queue_class"},
            {"name": "Queue.rd", "orig_name": "rd", "kind": "method", "parent": "Queue"}
        ]
    }"#;

    #[test]
    fn lowers_names_to_indices() {
        let ctx = lower(PROGRAM).unwrap();
        let main = &ctx.scopes[ctx.entry.unwrap()];
        let queue = ctx.find_scope("Queue".into()).unwrap();
        let q = main.find_symbol("q".into()).unwrap();
        assert_eq!(main.symbols[q].typ, Type::Object(Some(queue)));
        let b0 = main.find_block("b0".into()).unwrap();
        assert_eq!(main.blocks[b0].mode, SchedulingMode::Pipeline);

        let body = main.find_region("body".into()).unwrap();
        let top = main.find_region("top".into()).unwrap();
        assert_eq!(main.regions[body].parent(), Some(top));
        assert_eq!(main.regions[top].children(), &[body]);

        let graph = &main.regions[body];
        let node = graph.node(graph.nodes().next().unwrap());
        let NodeTag::Stm(stm) = &node.tag else {
            panic!("expected a statement node")
        };
        let StmKind::Move {
            src: Expr::Call { callee, .. },
            ..
        } = &stm.kind
        else {
            panic!("expected a call")
        };
        assert_eq!(ctx.callee_kind(*callee), CalleeKind::QueueRead);

        let outer = &main.regions[top];
        let ret = outer.nodes().nth(1).unwrap();
        assert_eq!(outer.node(ret).stm_index, 7);
        assert_eq!(outer.preds_without_back(ret).len(), 1);
    }

    #[test]
    fn unknown_scheduling_mode_is_fatal() {
        let src = PROGRAM.replace("\"pipeline\"", "\"eager\"");
        let err = lower(&src).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UnknownSchedulingMode("eager".to_string())
        );
    }

    #[test]
    fn undefined_symbol_is_reported() {
        let src = PROGRAM.replace("{\"temp\": \"q\"}", "{\"temp\": \"r\"}");
        let err = lower(&src).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Undefined { .. }));
    }

    #[test]
    fn dangling_edge_is_malformed() {
        let src = PROGRAM.replace("\"to\": 1", "\"to\": 5");
        let err = lower(&src).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MalformedStructure(_)));
    }
}
