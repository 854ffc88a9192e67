//! Abstract syntax of a lowered program.
//!
//! The AST mirrors the IR but refers to everything by name. Resolving names
//! into arena indices happens when the AST is turned into IR.
use crate::common::{
    BinaryOp, EdgeKind, JumpKind, PortDirection, Protocol, RelOp, ScopeKind,
    UnaryOp,
};
use cadence_utils::Id;
use serde::{Deserialize, Serialize};

/// A complete program: every scope that takes part in scheduling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    /// Name of the top-level scope, if there is one.
    #[serde(default)]
    pub entry: Option<Id>,
    #[serde(default)]
    pub scopes: Vec<ScopeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeDef {
    /// Fully qualified name of the scope.
    pub name: Id,
    /// Unqualified name as written in the source program. Defaults to
    /// `name`.
    #[serde(default)]
    pub orig_name: Option<Id>,
    pub kind: ScopeKind,
    /// Enclosing scope, e.g. the class of a method.
    #[serde(default)]
    pub parent: Option<Id>,
    #[serde(default)]
    pub symbols: Vec<SymbolDef>,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub regions: Vec<RegionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDef {
    pub name: Id,
    #[serde(rename = "type")]
    pub typ: TypeDef,
    #[serde(default)]
    pub alias: bool,
    #[serde(default)]
    pub param: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDef {
    Int {
        width: u32,
        #[serde(default)]
        signed: bool,
    },
    Bool,
    Seq {
        #[serde(default)]
        len: Option<u64>,
        #[serde(default)]
        mem: MemDef,
    },
    Port {
        #[serde(default)]
        protocol: Protocol,
        #[serde(default)]
        direction: PortDirection,
    },
    /// Instance of a class scope.
    Object(Option<Id>),
    Function(Id),
    None,
    Undef,
}

/// Backing store of a sequence-typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemDef {
    pub can_be_reg: bool,
    pub immutable: bool,
    pub writable: bool,
}

impl Default for MemDef {
    fn default() -> Self {
        MemDef {
            can_be_reg: false,
            immutable: false,
            writable: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDef {
    pub name: Id,
    /// One of `pipeline`, `parallel`, `timed` or `default`. Absent means
    /// `default`.
    #[serde(default)]
    pub scheduling: Option<String>,
}

/// A structural region and its operation graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDef {
    pub name: Id,
    /// Enclosing region. Regions without a parent are outermost.
    #[serde(default)]
    pub parent: Option<Id>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    /// Edges refer to nodes by their position in `nodes`.
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeDef {
    Stm {
        block: Id,
        /// Program-order index. Defaults to the position in the region.
        #[serde(default)]
        index: Option<u32>,
        op: StmDef,
    },
    /// A nested region, summarized as one node.
    Region(Id),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EdgeDef {
    pub from: usize,
    pub to: usize,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StmDef {
    Move {
        dst: ExprDef,
        src: ExprDef,
    },
    Expr(ExprDef),
    #[serde(rename = "cjump")]
    CJump {
        cond: ExprDef,
        true_target: Id,
        false_target: Id,
    },
    #[serde(rename = "mcjump")]
    MCJump {
        conds: Vec<ExprDef>,
        targets: Vec<Id>,
    },
    Jump {
        target: Id,
        #[serde(default)]
        kind: JumpKind,
    },
    Ret(ExprDef),
    Phi {
        var: ExprDef,
        #[serde(default)]
        args: Vec<ExprDef>,
    },
    #[serde(rename = "uphi")]
    UPhi {
        var: ExprDef,
        #[serde(default)]
        args: Vec<ExprDef>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprDef {
    Const(ConstDef),
    Temp(Id),
    Attr {
        base: Box<ExprDef>,
        attr: Id,
    },
    #[serde(rename = "unop")]
    UnOp {
        op: UnaryOp,
        exp: Box<ExprDef>,
    },
    #[serde(rename = "binop")]
    BinOp {
        op: BinaryOp,
        left: Box<ExprDef>,
        right: Box<ExprDef>,
    },
    #[serde(rename = "relop")]
    RelOp {
        op: RelOp,
        left: Box<ExprDef>,
        right: Box<ExprDef>,
    },
    #[serde(rename = "condop")]
    CondOp {
        cond: Box<ExprDef>,
        left: Box<ExprDef>,
        right: Box<ExprDef>,
    },
    Call {
        /// Scope being called.
        callee: Id,
        /// Object the method is invoked on.
        #[serde(default)]
        receiver: Option<Box<ExprDef>>,
        #[serde(default)]
        args: Vec<ExprDef>,
    },
    #[serde(rename = "syscall")]
    SysCall {
        name: Id,
        #[serde(default)]
        args: Vec<ExprDef>,
    },
    New {
        scope: Id,
        #[serde(default)]
        args: Vec<ExprDef>,
    },
    #[serde(rename = "mref")]
    MRef {
        mem: Box<ExprDef>,
        offset: Box<ExprDef>,
    },
    #[serde(rename = "mstore")]
    MStore {
        mem: Box<ExprDef>,
        offset: Box<ExprDef>,
        value: Box<ExprDef>,
    },
    Array {
        items: Vec<ExprDef>,
        #[serde(default = "one")]
        repeat: u64,
    },
}

fn one() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstDef {
    Bool(bool),
    Int(i64),
    Str(String),
}
