use cadence_idx::SecondaryMap;
use cadence_ir::{
    self as ir, Builtin, CalleeKind, Expr, MemInfo, NodeTag, Protocol,
    RegionIdx, SchedulingMode, ScopeIdx, Stm, StmKind,
};
use cadence_utils::{CadenceResult, Error};

/// Cost of a single state transition.
pub const UNIT_STEP: u64 = 1;
/// Cost assumed for a call into a scope whose latency is not known.
pub const CALL_MINIMUM_STEP: u64 = 5;

/// Latencies measured by earlier scheduling runs, one per scope.
#[derive(Debug, Clone, Default)]
pub struct MeasuredLatency {
    scopes: SecondaryMap<ScopeIdx, Option<u64>>,
}

impl MeasuredLatency {
    pub fn scope(&self, idx: ScopeIdx) -> Option<u64> {
        *self.scopes.get(idx)
    }

    pub fn record_scope(&mut self, idx: ScopeIdx, latency: u64) {
        self.scopes.insert(idx, Some(latency));
    }
}

/// Number of cycles each operation of a scope takes.
///
/// The model is read-only: callee and nested-region latencies come from
/// runs that have already finished.
pub struct LatencyModel<'a> {
    ctx: &'a ir::Context,
    scope: &'a ir::Scope,
    measured: &'a MeasuredLatency,
    regions: &'a SecondaryMap<RegionIdx, Option<u64>>,
}

impl<'a> LatencyModel<'a> {
    pub fn new(
        ctx: &'a ir::Context,
        scope: &'a ir::Scope,
        measured: &'a MeasuredLatency,
        regions: &'a SecondaryMap<RegionIdx, Option<u64>>,
    ) -> Self {
        LatencyModel {
            ctx,
            scope,
            measured,
            regions,
        }
    }

    pub fn latency(&self, tag: &NodeTag) -> CadenceResult<u64> {
        match tag {
            NodeTag::Stm(stm) => self.stm_latency(stm),
            NodeTag::Region(r) => Ok(self.regions.get(*r).unwrap_or_else(|| {
                log::warn!(
                    "region `{}` has no measured latency, assuming {CALL_MINIMUM_STEP}",
                    self.scope.regions[*r].name()
                );
                UNIT_STEP * CALL_MINIMUM_STEP
            })),
        }
    }

    fn stm_latency(&self, stm: &Stm) -> CadenceResult<u64> {
        let block = self.scope.blocks.get(stm.block).ok_or_else(|| {
            Error::malformed_structure(format!(
                "statement refers to block #{} which does not exist",
                stm.block
            ))
        })?;
        let pipelined = block.mode == SchedulingMode::Pipeline;
        match &stm.kind {
            StmKind::Move { dst, src } => self.move_latency(dst, src, pipelined),
            StmKind::Expr(Expr::Call {
                callee, receiver, ..
            }) => self.call_latency(*callee, receiver.as_deref(), pipelined, true),
            StmKind::Expr(Expr::SysCall { builtin, args }) => {
                syscall_latency(builtin, args)
            }
            StmKind::Phi { var, .. } => {
                if self.is_alias(var) || self.is_unregistered_seq(var) {
                    Ok(0)
                } else {
                    Ok(UNIT_STEP)
                }
            }
            StmKind::UPhi { var, .. } => {
                Ok(if self.is_alias(var) { 0 } else { UNIT_STEP })
            }
            _ => Ok(UNIT_STEP),
        }
    }

    fn move_latency(
        &self,
        dst: &Expr,
        src: &Expr,
        pipelined: bool,
    ) -> CadenceResult<u64> {
        match src {
            Expr::Call {
                callee, receiver, ..
            } => {
                return self.call_latency(
                    *callee,
                    receiver.as_deref(),
                    pipelined,
                    false,
                );
            }
            Expr::New { .. } => return Ok(0),
            _ => (),
        }
        if self.is_port(src) || self.is_port(dst) {
            return Ok(0);
        }
        if let Expr::Temp(d) = dst {
            let dst_sym = &self.scope.symbols[*d];
            if dst_sym.alias {
                return Ok(0);
            }
            if let Expr::Temp(s) = src {
                if dst_sym.typ.is_seq() && self.scope.symbols[*s].param {
                    let reg = dst_sym.typ.mem().is_some_and(|m| m.can_be_reg);
                    return Ok(if reg { UNIT_STEP } else { 0 });
                }
            }
        }
        if let Expr::Attr { .. } = dst {
            return Ok(UNIT_STEP * 2);
        }
        Ok(match src {
            Expr::Array { items, repeat } => {
                if self.mem_of(dst).is_some_and(|m| m.can_be_reg) {
                    1
                } else {
                    (items.len() as u64)
                        .checked_mul(*repeat)
                        .and_then(|n| n.checked_mul(UNIT_STEP))
                        .ok_or_else(|| {
                            Error::malformed_structure(format!(
                                "array of {} items repeated {repeat} times does not fit in a cycle count",
                                items.len()
                            ))
                        })?
                }
            }
            Expr::MRef { mem, .. } => match self.mem_of(mem) {
                Some(m) if m.immutable || !m.writable || m.can_be_reg => 1,
                Some(_) => UNIT_STEP * 3,
                None => {
                    log::warn!(
                        "memory load from a value that is not a sequence, treating it as block memory"
                    );
                    UNIT_STEP * 3
                }
            },
            Expr::MStore { .. } => UNIT_STEP,
            _ => UNIT_STEP,
        })
    }

    /// `dummy_read` is set when the result of the call is discarded.
    fn call_latency(
        &self,
        callee: ScopeIdx,
        receiver: Option<&Expr>,
        pipelined: bool,
        dummy_read: bool,
    ) -> CadenceResult<u64> {
        let steps = match self.ctx.callee_kind(callee) {
            CalleeKind::QueueRead => {
                if pipelined {
                    2
                } else {
                    3
                }
            }
            CalleeKind::QueueWrite => {
                if pipelined {
                    1
                } else {
                    3
                }
            }
            CalleeKind::PortRead => {
                match self.receiver_protocol(callee, receiver)? {
                    Protocol::ReadyValid if pipelined => 2,
                    Protocol::ReadyValid => 3,
                    Protocol::Valid if pipelined || dummy_read => 1,
                    Protocol::Valid => 2,
                    Protocol::None if dummy_read => 0,
                    Protocol::None => 1,
                }
            }
            CalleeKind::PortWrite => {
                match self.receiver_protocol(callee, receiver)? {
                    Protocol::ReadyValid if pipelined => 1,
                    Protocol::ReadyValid => 3,
                    Protocol::Valid if pipelined => 1,
                    Protocol::Valid => 2,
                    Protocol::None => 1,
                }
            }
            CalleeKind::PortOther => 1,
            CalleeKind::Routine => match self.measured.scope(callee) {
                Some(latency) => return Ok(latency),
                None => {
                    log::warn!(
                        "call to `{}` has no measured latency, assuming {CALL_MINIMUM_STEP}",
                        self.ctx.scopes[callee].name
                    );
                    CALL_MINIMUM_STEP
                }
            },
        };
        Ok(UNIT_STEP * steps)
    }

    /// Protocol of the port a port accessor is called on.
    fn receiver_protocol(
        &self,
        callee: ScopeIdx,
        receiver: Option<&Expr>,
    ) -> CadenceResult<Protocol> {
        receiver
            .and_then(Expr::symbol)
            .and_then(|sym| self.scope.symbols[sym].typ.protocol())
            .ok_or_else(|| {
                Error::malformed_structure(format!(
                    "port accessor `{}` is not called on a port",
                    self.ctx.scopes[callee].name
                ))
            })
    }

    fn sym_typ(&self, e: &Expr) -> Option<&ir::Type> {
        e.symbol().map(|s| &self.scope.symbols[s].typ)
    }

    fn is_port(&self, e: &Expr) -> bool {
        matches!(e, Expr::Temp(_)) && self.sym_typ(e).is_some_and(|t| t.is_port())
    }

    fn is_alias(&self, e: &Expr) -> bool {
        e.symbol().is_some_and(|s| self.scope.symbols[s].alias)
    }

    fn mem_of(&self, e: &Expr) -> Option<&MemInfo> {
        self.sym_typ(e).and_then(|t| t.mem())
    }

    /// A sequence kept in block memory.
    fn is_unregistered_seq(&self, e: &Expr) -> bool {
        self.mem_of(e).is_some_and(|m| !m.can_be_reg)
    }
}

fn syscall_latency(builtin: &Builtin, args: &[Expr]) -> CadenceResult<u64> {
    match builtin {
        Builtin::ClkSleep => match args.first().and_then(Expr::as_int) {
            Some(cycles) if cycles >= 0 => Ok(cycles as u64),
            _ => Err(Error::malformed_structure(
                "clksleep expects a non-negative constant cycle count",
            )),
        },
        Builtin::WaitRising
        | Builtin::WaitFalling
        | Builtin::WaitEdge
        | Builtin::WaitValue
        | Builtin::Other(_) => Ok(UNIT_STEP),
    }
}
