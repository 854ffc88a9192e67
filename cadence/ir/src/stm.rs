use crate::{Expr, Id, JumpKind};
use cadence_idx::impl_index;
use cadence_utils::{CadenceResult, Error};
use std::str::FromStr;

/// Index of a [Block] within its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockIdx(u32);
impl_index!(BlockIdx);

/// How the statements of a block may be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchedulingMode {
    #[default]
    Default,
    /// Iterations overlap. Protocol handshakes are amortized.
    Pipeline,
    Parallel,
    Timed,
}

impl FromStr for SchedulingMode {
    type Err = Error;

    fn from_str(s: &str) -> CadenceResult<Self> {
        match s {
            "default" => Ok(SchedulingMode::Default),
            "pipeline" => Ok(SchedulingMode::Pipeline),
            "parallel" => Ok(SchedulingMode::Parallel),
            "timed" => Ok(SchedulingMode::Timed),
            _ => Err(Error::unknown_scheduling_mode(s)),
        }
    }
}

impl std::fmt::Display for SchedulingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SchedulingMode::Default => "default",
            SchedulingMode::Pipeline => "pipeline",
            SchedulingMode::Parallel => "parallel",
            SchedulingMode::Timed => "timed",
        };
        f.write_str(s)
    }
}

/// A basic block. Statements only refer to it for its scheduling mode and
/// as jump targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: Id,
    pub mode: SchedulingMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmKind {
    Move {
        dst: Expr,
        src: Expr,
    },
    /// An expression evaluated for its side effect.
    Expr(Expr),
    CJump {
        cond: Expr,
        true_target: BlockIdx,
        false_target: BlockIdx,
    },
    MCJump {
        conds: Vec<Expr>,
        targets: Vec<BlockIdx>,
    },
    Jump {
        target: BlockIdx,
        kind: JumpKind,
    },
    Ret(Expr),
    Phi {
        var: Expr,
        args: Vec<Expr>,
    },
    /// Phi without a selecting predicate.
    UPhi {
        var: Expr,
        args: Vec<Expr>,
    },
}

/// A statement together with the block it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stm {
    pub kind: StmKind,
    pub block: BlockIdx,
}

impl Stm {
    pub fn new(kind: StmKind, block: BlockIdx) -> Self {
        Stm { kind, block }
    }

    pub fn mv(dst: Expr, src: Expr, block: BlockIdx) -> Self {
        Stm::new(StmKind::Move { dst, src }, block)
    }

    pub fn expr(exp: Expr, block: BlockIdx) -> Self {
        Stm::new(StmKind::Expr(exp), block)
    }
}
