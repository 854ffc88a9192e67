use crate::{BinaryOp, Id, RelOp, ScopeIdx, SymIdx, UnaryOp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Const {
    Int(i64),
    Bool(bool),
    Str(Id),
}

/// Timing primitives and other built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Wait for exactly the given number of cycles.
    ClkSleep,
    WaitRising,
    WaitFalling,
    WaitEdge,
    WaitValue,
    Other(Id),
}

impl Builtin {
    pub fn as_str(&self) -> &str {
        match self {
            Builtin::ClkSleep => "clksleep",
            Builtin::WaitRising => "wait_rising",
            Builtin::WaitFalling => "wait_falling",
            Builtin::WaitEdge => "wait_edge",
            Builtin::WaitValue => "wait_value",
            Builtin::Other(name) => name.as_str(),
        }
    }

    /// Builtins may be given with their module path, e.g.
    /// `timing.clksleep`. Only the last segment is significant.
    pub fn from_name(name: &str) -> Self {
        let short = name.rsplit('.').next().unwrap_or(name);
        match short {
            "clksleep" => Builtin::ClkSleep,
            "wait_rising" => Builtin::WaitRising,
            "wait_falling" => Builtin::WaitFalling,
            "wait_edge" => Builtin::WaitEdge,
            "wait_value" => Builtin::WaitValue,
            _ => Builtin::Other(Id::new(name)),
        }
    }
}

/// An expression of the IR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Const(Const),
    Temp(SymIdx),
    /// Field `attr` of the object `base`.
    Attr {
        base: Box<Expr>,
        attr: SymIdx,
    },
    UnOp {
        op: UnaryOp,
        exp: Box<Expr>,
    },
    BinOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    RelOp {
        op: RelOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    CondOp {
        cond: Box<Expr>,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Call of the scope `callee`, on `receiver` when it is a method.
    Call {
        callee: ScopeIdx,
        receiver: Option<Box<Expr>>,
        args: Vec<Expr>,
    },
    SysCall {
        builtin: Builtin,
        args: Vec<Expr>,
    },
    /// Construct a new instance of a class scope.
    New {
        scope: ScopeIdx,
        args: Vec<Expr>,
    },
    /// Memory load.
    MRef {
        mem: Box<Expr>,
        offset: Box<Expr>,
    },
    /// Memory store.
    MStore {
        mem: Box<Expr>,
        offset: Box<Expr>,
        value: Box<Expr>,
    },
    /// Literal array, `items` repeated `repeat` times.
    Array {
        items: Vec<Expr>,
        repeat: u64,
    },
}

impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::Const(Const::Int(value))
    }

    pub fn binop(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn relop(op: RelOp, left: Expr, right: Expr) -> Self {
        Expr::RelOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(callee: ScopeIdx, receiver: Option<Expr>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee,
            receiver: receiver.map(Box::new),
            args,
        }
    }

    pub fn mref(mem: Expr, offset: Expr) -> Self {
        Expr::MRef {
            mem: Box::new(mem),
            offset: Box::new(offset),
        }
    }

    /// The symbol this expression names: the variable of a `Temp` or the
    /// field of an `Attr`.
    pub fn symbol(&self) -> Option<SymIdx> {
        match self {
            Expr::Temp(sym) => Some(*sym),
            Expr::Attr { attr, .. } => Some(*attr),
            _ => None,
        }
    }

    /// The constant integer value, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::Const(Const::Int(v)) => Some(*v),
            _ => None,
        }
    }
}
