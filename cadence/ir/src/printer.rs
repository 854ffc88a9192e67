//! Implements a formatter for the in-memory representation of a program.
use crate::{BlockIdx, Const, Context, Expr, NodeTag, Scope, Stm, StmKind};
use itertools::Itertools;
use std::io;

/// Printer for the IR.
pub struct Printer;

impl Printer {
    /// Format an expression, naming symbols and scopes.
    pub fn expr_to_str(expr: &Expr, scope: &Scope, ctx: &Context) -> String {
        let e = |e: &Expr| Self::expr_to_str(e, scope, ctx);
        let list = |es: &[Expr]| es.iter().map(e).join(", ");
        match expr {
            Expr::Const(Const::Int(v)) => v.to_string(),
            Expr::Const(Const::Bool(v)) => v.to_string(),
            Expr::Const(Const::Str(v)) => format!("{:?}", v.as_str()),
            Expr::Temp(sym) => scope.symbols[*sym].name.to_string(),
            Expr::Attr { base, attr } => {
                format!("{}.{}", e(base), scope.symbols[*attr].name)
            }
            Expr::UnOp { op, exp } => format!("{}{}", op.symbol(), e(exp)),
            Expr::BinOp { op, left, right } => {
                format!("({} {} {})", e(left), op.symbol(), e(right))
            }
            Expr::RelOp { op, left, right } => {
                format!("({} {} {})", e(left), op.symbol(), e(right))
            }
            Expr::CondOp { cond, left, right } => {
                format!("({} ? {} : {})", e(cond), e(left), e(right))
            }
            Expr::Call {
                callee,
                receiver,
                args,
            } => {
                let callee = &ctx.scopes[*callee];
                match receiver {
                    Some(r) => {
                        format!("{}.{}({})", e(r), callee.orig_name, list(args))
                    }
                    None => format!("{}({})", callee.name, list(args)),
                }
            }
            Expr::SysCall { builtin, args } => {
                format!("!{}({})", builtin.as_str(), list(args))
            }
            Expr::New { scope: class, args } => {
                format!("new {}({})", ctx.scopes[*class].name, list(args))
            }
            Expr::MRef { mem, offset } => format!("{}[{}]", e(mem), e(offset)),
            Expr::MStore { mem, offset, value } => {
                format!("mstore({}[{}], {})", e(mem), e(offset), e(value))
            }
            Expr::Array { items, repeat } => {
                if *repeat == 1 {
                    format!("[{}]", list(items))
                } else {
                    format!("[{}] * {repeat}", list(items))
                }
            }
        }
    }

    /// Format a statement on one line.
    pub fn stm_to_str(stm: &Stm, scope: &Scope, ctx: &Context) -> String {
        let e = |e: &Expr| Self::expr_to_str(e, scope, ctx);
        let block = |b: BlockIdx| scope.blocks[b].name;
        match &stm.kind {
            StmKind::Move { dst, src } => format!("{} = {}", e(dst), e(src)),
            StmKind::Expr(exp) => e(exp),
            StmKind::CJump {
                cond,
                true_target,
                false_target,
            } => format!(
                "cjump {} ? {} : {}",
                e(cond),
                block(*true_target),
                block(*false_target)
            ),
            StmKind::MCJump { conds, targets } => format!(
                "mcjump {}",
                conds
                    .iter()
                    .zip(targets)
                    .map(|(c, t)| format!("{} ? {}", e(c), block(*t)))
                    .join(", ")
            ),
            StmKind::Jump { target, kind } => {
                format!("jump {} ({kind:?})", block(*target))
            }
            StmKind::Ret(exp) => format!("return {}", e(exp)),
            StmKind::Phi { var, args } => {
                format!("{} = phi({})", e(var), args.iter().map(e).join(", "))
            }
            StmKind::UPhi { var, args } => {
                format!("{} = uphi({})", e(var), args.iter().map(e).join(", "))
            }
        }
    }

    /// Format the tag of a graph node.
    pub fn tag_to_str(tag: &NodeTag, scope: &Scope, ctx: &Context) -> String {
        match tag {
            NodeTag::Stm(stm) => Self::stm_to_str(stm, scope, ctx),
            NodeTag::Region(r) => format!("region {}", scope.regions[*r].name()),
        }
    }

    /// Write every scope with its regions, nodes and edges.
    pub fn write_context<F: io::Write>(ctx: &Context, f: &mut F) -> io::Result<()> {
        for (_, scope) in ctx.scopes.iter() {
            Self::write_scope(scope, ctx, f)?;
            writeln!(f)?;
        }
        Ok(())
    }

    pub fn write_scope<F: io::Write>(
        scope: &Scope,
        ctx: &Context,
        f: &mut F,
    ) -> io::Result<()> {
        write!(f, "{:?} {}", scope.kind, scope.name)?;
        if let Some(p) = scope.parent {
            write!(f, " in {}", ctx.scopes[p].name)?;
        }
        writeln!(f, " {{")?;
        for (_, sym) in scope.symbols.iter() {
            let flags = [(sym.alias, " alias"), (sym.param, " param")]
                .iter()
                .filter(|(set, _)| *set)
                .map(|(_, s)| *s)
                .join("");
            writeln!(f, "  {}: {}{flags};", sym.name, sym.typ)?;
        }
        for (_, block) in scope.blocks.iter() {
            writeln!(f, "  block {} ({});", block.name, block.mode)?;
        }
        for (_, region) in scope.regions.iter() {
            write!(f, "  region {}", region.name())?;
            if let Some(p) = region.parent() {
                write!(f, " in {}", scope.regions[p].name())?;
            }
            writeln!(f, " {{")?;
            for n in region.nodes() {
                let node = region.node(n);
                writeln!(
                    f,
                    "    {n}: {}",
                    Self::tag_to_str(&node.tag, scope, ctx)
                )?;
            }
            for (from, to, kind) in region.edges() {
                writeln!(f, "    {from} -> {to} [{kind}];")?;
            }
            writeln!(f, "  }}")?;
        }
        writeln!(f, "}}")
    }
}
