use cadence_ir::{
    self as ir, BinaryOp, Expr, NodeTag, RelOp, ScopeIdx, Stm, StmKind,
};
use cadence_utils::{CadenceResult, Error};

/// Class of operator that is implemented by a shared function unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpClass {
    Binary(BinaryOp),
    Relational(RelOp),
}

/// A contended hardware resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Operator(OpClass),
    /// The sub-module implementing a called scope. Every call site of the
    /// same scope competes for its instances.
    Call(ScopeIdx),
}

impl Resource {
    /// Name of the resource as shown in reports.
    pub fn name(&self, ctx: &ir::Context) -> String {
        match self {
            Resource::Operator(OpClass::Binary(op)) => op.symbol().to_string(),
            Resource::Operator(OpClass::Relational(op)) => {
                op.symbol().to_string()
            }
            Resource::Call(scope) => ctx.scopes[*scope].name.to_string(),
        }
    }
}

/// Collects the resources a statement uses.
#[derive(Default)]
pub struct ResourceExtractor {
    results: Vec<Resource>,
}

impl ResourceExtractor {
    /// The single resource a node needs, if any. Needing more than one
    /// resource is not supported.
    pub fn needed_resource(tag: &NodeTag) -> CadenceResult<Option<Resource>> {
        let NodeTag::Stm(stm) = tag else {
            return Ok(None);
        };
        let mut extractor = ResourceExtractor::default();
        extractor.visit_stm(stm);
        match extractor.results.as_slice() {
            [] => Ok(None),
            [res] => Ok(Some(*res)),
            many => Err(Error::malformed_structure(format!(
                "operation needs {} shared resources, at most one is supported",
                many.len()
            ))),
        }
    }

    pub fn results(&self) -> &[Resource] {
        &self.results
    }

    pub fn visit_stm(&mut self, stm: &Stm) {
        match &stm.kind {
            StmKind::Move { dst, src } => {
                self.visit_expr(src);
                self.visit_expr(dst);
            }
            StmKind::Expr(e) | StmKind::CJump { cond: e, .. } => {
                self.visit_expr(e)
            }
            StmKind::MCJump { conds, .. } => {
                conds.iter().for_each(|c| self.visit_expr(c))
            }
            StmKind::Jump { .. }
            | StmKind::Ret(_)
            | StmKind::Phi { .. }
            | StmKind::UPhi { .. } => (),
        }
    }

    pub fn visit_expr(&mut self, e: &Expr) {
        match e {
            Expr::UnOp { exp, .. } => self.visit_expr(exp),
            Expr::BinOp { op, left, right } => {
                self.visit_expr(left);
                self.visit_expr(right);
                self.results.push(Resource::Operator(OpClass::Binary(*op)));
            }
            Expr::RelOp { op, left, right } => {
                self.visit_expr(left);
                self.visit_expr(right);
                self.results
                    .push(Resource::Operator(OpClass::Relational(*op)));
            }
            Expr::CondOp { cond, left, right } => {
                self.visit_expr(cond);
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Call { callee, args, .. } => {
                self.results.push(Resource::Call(*callee));
                args.iter().for_each(|a| self.visit_expr(a));
            }
            Expr::SysCall { args, .. } | Expr::New { args, .. } => {
                args.iter().for_each(|a| self.visit_expr(a))
            }
            // Memory accesses, arrays and plain values need no operator.
            Expr::Const(_)
            | Expr::Temp(_)
            | Expr::Attr { .. }
            | Expr::MRef { .. }
            | Expr::MStore { .. }
            | Expr::Array { .. } => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_idx::IndexRef;
    use cadence_ir::{BlockIdx, SymIdx};

    fn needed(kind: StmKind) -> CadenceResult<Option<Resource>> {
        ResourceExtractor::needed_resource(&NodeTag::Stm(Stm::new(
            kind,
            BlockIdx::new(0),
        )))
    }

    fn var(i: usize) -> Expr {
        Expr::Temp(SymIdx::new(i))
    }

    #[test]
    fn binary_operator_is_a_resource() {
        let res = needed(StmKind::Move {
            dst: var(0),
            src: Expr::binop(BinaryOp::Mult, var(1), var(2)),
        });
        assert_eq!(
            res.unwrap(),
            Some(Resource::Operator(OpClass::Binary(BinaryOp::Mult)))
        );
    }

    #[test]
    fn call_target_is_a_resource() {
        let callee = ScopeIdx::new(3);
        let res = needed(StmKind::Expr(Expr::call(callee, None, vec![var(1)])));
        assert_eq!(res.unwrap(), Some(Resource::Call(callee)));
    }

    #[test]
    fn plain_moves_need_nothing() {
        let res = needed(StmKind::Move {
            dst: var(0),
            src: Expr::mref(var(1), Expr::int(0)),
        });
        assert_eq!(res.unwrap(), None);
        let res = needed(StmKind::Ret(Expr::binop(BinaryOp::Add, var(0), var(1))));
        assert_eq!(res.unwrap(), None);
        assert_eq!(
            ResourceExtractor::needed_resource(&NodeTag::Region(0u32.into())).unwrap(),
            None
        );
    }

    #[test]
    fn two_resources_are_rejected() {
        let res = needed(StmKind::CJump {
            cond: Expr::relop(
                RelOp::Lt,
                Expr::binop(BinaryOp::Add, var(0), var(1)),
                var(2),
            ),
            true_target: BlockIdx::new(1),
            false_target: BlockIdx::new(2),
        });
        assert!(res.is_err());
    }

    #[test]
    fn resources_are_named_for_reports() {
        let mut ctx = ir::Context::default();
        let mac = ctx.add_scope(ir::Scope::new("mac", ir::ScopeKind::Function));
        let names: Vec<_> = [
            Resource::Operator(OpClass::Binary(BinaryOp::Mult)),
            Resource::Operator(OpClass::Relational(RelOp::LtE)),
            Resource::Call(mac),
        ]
        .iter()
        .map(|res| res.name(&ctx))
        .collect();
        assert_eq!(names, vec!["*", "<=", "mac"]);
    }
}
